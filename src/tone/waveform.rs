//! Synthetic waveform generation.
//!
//! Fills a fixed 4096-sample buffer with a coarse stepped approximation of
//! a tone at the requested frequency: one waveform period tiled across the
//! buffer at the fixed sample rate. Samples are unsigned 8-bit, mono,
//! resting at the midpoint.

/// Samples per buffer.
pub const SAMPLE_CAPACITY: usize = 4096;

/// Fixed synthesis sample rate in hertz.
pub const SAMPLE_RATE: u32 = 44_100;

/// Resting sample value (silence).
const MIDPOINT: u8 = 0x7f;

/// Number of samples in one waveform period, rounded down.
///
/// Returns 0 when the frequency is zero or exceeds the sample rate; callers
/// must treat a zero period as "no renderable waveform".
pub fn period_len(frequency_hz: u32, sample_rate: u32) -> usize {
    if frequency_hz == 0 {
        return 0;
    }
    (sample_rate / frequency_hz) as usize
}

/// An owned, fixed-capacity buffer of unsigned 8-bit samples.
///
/// Returned by value from [`SampleBuffer::render`], so repeated or
/// concurrent renders can never observe a previous fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    samples: [u8; SAMPLE_CAPACITY],
}

impl SampleBuffer {
    /// A buffer resting at the midpoint.
    pub fn silence() -> Self {
        Self {
            samples: [MIDPOINT; SAMPLE_CAPACITY],
        }
    }

    /// Renders one buffer of the stepped waveform for `frequency_hz`.
    ///
    /// Each period-length segment is filled with three linear ramps in
    /// steps of two (midpoint to top, top to bottom, bottom back to the
    /// midpoint), truncated at the segment end. A frequency of zero or
    /// above the sample rate yields a zero-length period and the silent
    /// buffer is returned unchanged.
    pub fn render(frequency_hz: u32, sample_rate: u32) -> Self {
        let mut buffer = Self::silence();
        let period = period_len(frequency_hz, sample_rate);
        if period == 0 {
            tracing::debug!("no whole sample per period at {frequency_hz}Hz, staying silent");
            return buffer;
        }
        tracing::debug!("freq / wavelen: {sample_rate}/{period}");

        let mut start = 0;
        while start < SAMPLE_CAPACITY {
            let end = usize::min(start + period, SAMPLE_CAPACITY);
            for (slot, value) in buffer.samples[start..end].iter_mut().zip(ramp()) {
                *slot = value;
            }
            start += period;
        }
        buffer
    }

    /// The raw samples, ready to write to a device.
    pub fn as_bytes(&self) -> &[u8] {
        &self.samples
    }

    /// Always [`SAMPLE_CAPACITY`].
    pub const fn len(&self) -> usize {
        SAMPLE_CAPACITY
    }

    /// Never true; present for clippy's `len` convention.
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::silence()
    }
}

/// One period of the stepped wave: midpoint up to the top, down across the
/// full range, and back up to the midpoint, in steps of two.
fn ramp() -> impl Iterator<Item = u8> {
    let up = (MIDPOINT..=u8::MAX).step_by(2);
    let down = (u8::MIN..=u8::MAX).rev().step_by(2);
    let back = (u8::MIN..=MIDPOINT).step_by(2);
    up.chain(down).chain(back)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod period_tests {
        use super::*;

        #[test]
        fn test_period_is_floor_of_rate_over_frequency() {
            assert_eq!(period_len(440, SAMPLE_RATE), 100);
            assert_eq!(period_len(441, SAMPLE_RATE), 100);
            assert_eq!(period_len(1000, SAMPLE_RATE), 44);
            assert_eq!(period_len(44_100, SAMPLE_RATE), 1);
        }

        #[test]
        fn test_period_zero_above_sample_rate() {
            assert_eq!(period_len(44_101, SAMPLE_RATE), 0);
            assert_eq!(period_len(u32::MAX, SAMPLE_RATE), 0);
        }

        #[test]
        fn test_period_zero_frequency() {
            assert_eq!(period_len(0, SAMPLE_RATE), 0);
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_buffer_is_fixed_capacity() {
            for frequency in [1, 100, 440, 880, 44_100, 100_000] {
                let buffer = SampleBuffer::render(frequency, SAMPLE_RATE);
                assert_eq!(buffer.as_bytes().len(), SAMPLE_CAPACITY);
                assert_eq!(buffer.len(), SAMPLE_CAPACITY);
                assert!(!buffer.is_empty());
            }
        }

        #[test]
        fn test_frequency_above_sample_rate_stays_silent() {
            let buffer = SampleBuffer::render(88_200, SAMPLE_RATE);
            assert_eq!(buffer, SampleBuffer::silence());
        }

        #[test]
        fn test_zero_frequency_stays_silent() {
            let buffer = SampleBuffer::render(0, SAMPLE_RATE);
            assert_eq!(buffer, SampleBuffer::silence());
        }

        #[test]
        fn test_period_starts_at_midpoint_and_ramps_up() {
            let buffer = SampleBuffer::render(440, SAMPLE_RATE);
            let samples = buffer.as_bytes();
            // 44100/440 floors to 100; every segment restarts the ramp.
            assert_eq!(samples[0], 0x7f);
            assert_eq!(samples[1], 0x81);
            assert_eq!(samples[100], 0x7f);
            assert_eq!(samples[200], 0x7f);
        }

        #[test]
        fn test_render_is_not_all_silence_for_audible_frequency() {
            let buffer = SampleBuffer::render(440, SAMPLE_RATE);
            assert_ne!(buffer, SampleBuffer::silence());
        }

        #[test]
        fn test_render_is_deterministic() {
            let a = SampleBuffer::render(880, SAMPLE_RATE);
            let b = SampleBuffer::render(880, SAMPLE_RATE);
            assert_eq!(a, b);
        }

        #[test]
        fn test_one_sample_period_does_not_loop_forever() {
            // 44100Hz gives a period of exactly one sample.
            let buffer = SampleBuffer::render(44_100, SAMPLE_RATE);
            assert!(buffer.as_bytes().iter().all(|&s| s == 0x7f));
        }

        #[test]
        fn test_long_period_truncates_at_buffer_end() {
            // 10Hz gives a 4410-sample period, longer than the buffer.
            let buffer = SampleBuffer::render(10, SAMPLE_RATE);
            assert_eq!(buffer.as_bytes().len(), SAMPLE_CAPACITY);
            assert_eq!(buffer.as_bytes()[0], 0x7f);
        }
    }

    mod ramp_tests {
        use super::*;

        #[test]
        fn test_ramp_shape() {
            let values: Vec<u8> = ramp().collect();
            assert_eq!(values.first(), Some(&0x7f));
            assert_eq!(values.last(), Some(&0x7e));
            assert!(values.contains(&u8::MAX));
            assert!(values.contains(&u8::MIN));
        }

        #[test]
        fn test_ramp_steps_by_two() {
            let values: Vec<u8> = ramp().collect();
            for pair in values.windows(2) {
                let delta = i16::from(pair[0]) - i16::from(pair[1]);
                assert!(delta.abs() <= 2, "step too large: {pair:?}");
            }
        }
    }
}
