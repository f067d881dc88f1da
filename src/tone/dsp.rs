//! Raw audio device backend.
//!
//! Streams synthesized sample buffers straight to `/dev/dsp` (OSS-style
//! unsigned 8-bit mono at the fixed synthesis rate). Unlike the console
//! backend, failing to open the device here is fatal: writing to it is the
//! only thing this mode does.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::tone::waveform::{SampleBuffer, SAMPLE_CAPACITY, SAMPLE_RATE};
use crate::tone::{ToneEmitter, ToneError};
use crate::types::ToneRequest;

/// Raw audio device written by default.
pub const DSP_PATH: &str = "/dev/dsp";

/// The fixed self-test sequence played by `--dsp`, in hertz.
pub const DEMO_SEQUENCE: [u32; 4] = [440, 2840, 1640, 440];

// ============================================================================
// RawDevice
// ============================================================================

/// An open raw audio device.
#[derive(Debug)]
pub struct RawDevice {
    device: File,
    path: PathBuf,
}

impl RawDevice {
    /// Opens the default raw audio device.
    ///
    /// # Errors
    ///
    /// Returns [`ToneError::DeviceOpen`]; callers exit with status 1.
    pub fn open() -> Result<Self, ToneError> {
        Self::open_path(DSP_PATH)
    }

    /// Opens a raw audio device at a custom path.
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self, ToneError> {
        let path = path.into();
        tracing::debug!("opening {}", path.display());
        let device = OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|source| ToneError::DeviceOpen {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self { device, path })
    }

    /// Plays the fixed demo sequence, one full buffer per note, in order.
    ///
    /// The frequency and length settings are not honored here; the
    /// sequence is a fixed self-test pattern. The device closes when the
    /// sink is dropped.
    pub fn play_demo(&self) -> Result<(), ToneError> {
        for frequency in DEMO_SEQUENCE {
            self.write_buffer(&SampleBuffer::render(frequency, SAMPLE_RATE))?;
        }
        Ok(())
    }

    /// The device path this sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_buffer(&self, buffer: &SampleBuffer) -> Result<(), ToneError> {
        (&self.device)
            .write_all(buffer.as_bytes())
            .map_err(|source| ToneError::DeviceWrite {
                path: self.path.display().to_string(),
                source,
            })
    }
}

impl ToneEmitter for RawDevice {
    /// Renders the requested frequency and writes enough buffers to cover
    /// the requested duration (at least one).
    fn emit(&self, request: &ToneRequest) -> Result<(), ToneError> {
        let buffer = SampleBuffer::render(request.frequency_hz(), SAMPLE_RATE);
        let samples =
            request.duration().as_millis() as u64 * u64::from(SAMPLE_RATE) / 1000;
        let buffers = samples.div_ceil(SAMPLE_CAPACITY as u64).max(1);
        for _ in 0..buffers {
            self.write_buffer(&buffer)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
