//! Tone synthesis and delivery backends.
//!
//! The portable core of beepr:
//!
//! - `waveform`: fills a fixed 4096-sample buffer with a stepped tone
//! - `console`: `KIOCSOUND` ioctl tones on `/dev/console`
//! - `dsp`: raw sample writes to `/dev/dsp`
//! - `mixer`: rodio-backed playback (feature `mixer`)
//!
//! Backends are selected through the [`ToneEmitter`] trait so callers (the
//! CLI dispatch, the daemon loop, tests) never hard-wire a device.

pub mod console;
pub mod dsp;
pub mod error;
#[cfg(feature = "mixer")]
pub mod mixer;
pub mod waveform;

pub use console::{divisor, ConsoleTone, CONSOLE_PATH, PIT_TICK_RATE};
pub use dsp::{RawDevice, DEMO_SEQUENCE, DSP_PATH};
pub use error::ToneError;
#[cfg(feature = "mixer")]
pub use mixer::{AudioMixer, BEEP_MELODY, ERROR_MELODY};
pub use waveform::{period_len, SampleBuffer, SAMPLE_CAPACITY, SAMPLE_RATE};

use crate::types::ToneRequest;

/// Capability interface for beep delivery backends.
///
/// Implementations block for the hold duration where the backend has one
/// (the console tone), or return once the samples are handed off.
pub trait ToneEmitter {
    /// Emits one tone for the given request.
    ///
    /// # Errors
    ///
    /// Returns a [`ToneError`] when the device cannot be opened or driven.
    fn emit(&self, request: &ToneRequest) -> Result<(), ToneError>;
}

/// Recording emitter for tests.
#[derive(Debug, Default)]
pub struct MockToneEmitter {
    requests: std::sync::Mutex<Vec<ToneRequest>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockToneEmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn emit_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    #[must_use]
    pub fn requests(&self) -> Vec<ToneRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ToneEmitter for MockToneEmitter {
    fn emit(&self, request: &ToneRequest) -> Result<(), ToneError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(ToneError::DeviceOpen {
                path: "mock".to_string(),
                source: std::io::Error::other("mock failure"),
            });
        }
        self.requests.lock().unwrap().push(*request);
        Ok(())
    }
}
