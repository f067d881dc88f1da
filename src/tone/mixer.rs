//! Optional audio mixer backend (rodio).
//!
//! Plays synthesized buffers through the OS audio mixer instead of poking
//! kernel devices, so it works without elevated privilege wherever an audio
//! output exists. Compiled in with the `mixer` feature.

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::tone::waveform::{SampleBuffer, SAMPLE_CAPACITY, SAMPLE_RATE};
use crate::tone::{ToneEmitter, ToneError};
use crate::types::ToneRequest;

/// Melody played by `--beep`, in hertz.
pub const BEEP_MELODY: [u32; 4] = [440, 880, 1024, 1648];

/// Melody played by `--error`, in hertz.
pub const ERROR_MELODY: [u32; 4] = [1080, 882, 624, 440];

// ============================================================================
// AudioMixer
// ============================================================================

/// Mixer-backed tone emitter.
pub struct AudioMixer {
    // The stream must stay alive for the handle to keep playing.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioMixer {
    /// Opens the default audio output.
    ///
    /// # Errors
    ///
    /// Returns [`ToneError::Mixer`] when no output device is available;
    /// callers report this and continue (exit 0).
    pub fn new() -> Result<Self, ToneError> {
        let (_stream, handle) =
            OutputStream::try_default().map_err(|e| ToneError::Mixer(e.to_string()))?;
        Ok(Self { _stream, handle })
    }

    /// Plays each note of `melody` for `note_ms` milliseconds, in order,
    /// blocking until the last note finishes.
    pub fn play_melody(&self, melody: &[u32], note_ms: u64) -> Result<(), ToneError> {
        let sink = Sink::try_new(&self.handle).map_err(|e| ToneError::Mixer(e.to_string()))?;
        for &frequency in melody {
            Self::queue_note(&sink, frequency, note_ms);
        }
        sink.sleep_until_end();
        Ok(())
    }

    /// Appends enough rendered buffers to hold `frequency` for `note_ms`.
    fn queue_note(sink: &Sink, frequency: u32, note_ms: u64) {
        let rendered = SampleBuffer::render(frequency, SAMPLE_RATE);
        let samples: Vec<f32> = rendered
            .as_bytes()
            .iter()
            .map(|&s| (f32::from(s) - 127.0) / 128.0)
            .collect();

        let total = note_ms * u64::from(SAMPLE_RATE) / 1000;
        let buffers = total.div_ceil(SAMPLE_CAPACITY as u64).max(1);
        for _ in 0..buffers {
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.clone()));
        }
    }
}

impl ToneEmitter for AudioMixer {
    fn emit(&self, request: &ToneRequest) -> Result<(), ToneError> {
        self.play_melody(
            &[request.frequency_hz()],
            request.duration().as_millis() as u64,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
