//! Console tone backend.
//!
//! Drives the kernel tone generator through the `KIOCSOUND` ioctl on
//! `/dev/console`: program a divisor of the PIT tick rate, hold for the
//! requested duration, then program zero to stop.

use std::fs::OpenOptions;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::thread;

use nix::libc::c_int;

use crate::tone::{ToneEmitter, ToneError};
use crate::types::ToneRequest;

// ============================================================================
// Constants
// ============================================================================

/// Console device driven by default.
pub const CONSOLE_PATH: &str = "/dev/console";

/// PIT base oscillator frequency in hertz; the divisor programmed into the
/// tone generator is derived from it.
pub const PIT_TICK_RATE: u32 = 1_193_180;

/// `linux/kd.h` start/stop tone ioctl.
const KIOCSOUND: u32 = 0x4B2F;

nix::ioctl_write_int_bad!(kiocsound, KIOCSOUND);

/// Divisor programmed into the tone generator for `frequency_hz`.
///
/// Rounded integer division of the PIT tick rate: `divisor(440) == 2712`.
/// The frequency must be nonzero; [`ToneRequest`] guarantees this for every
/// value that reaches a backend.
pub fn divisor(frequency_hz: u32) -> u32 {
    (PIT_TICK_RATE + frequency_hz / 2) / frequency_hz
}

// ============================================================================
// ConsoleTone
// ============================================================================

/// Console tone emitter.
#[derive(Debug, Clone)]
pub struct ConsoleTone {
    path: PathBuf,
}

impl ConsoleTone {
    /// Emitter for the default console device.
    pub fn new() -> Self {
        Self::with_path(CONSOLE_PATH)
    }

    /// Emitter for a custom device path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The device path this emitter opens.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConsoleTone {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneEmitter for ConsoleTone {
    /// Opens the console, starts the tone, blocks for the hold duration,
    /// and stops the tone. The handle is released on every path past a
    /// successful open.
    ///
    /// # Errors
    ///
    /// [`ToneError::DeviceOpen`] when the console cannot be opened (callers
    /// treat this as recoverable), [`ToneError::ToneIoctl`] when the device
    /// rejects the tone command.
    fn emit(&self, request: &ToneRequest) -> Result<(), ToneError> {
        tracing::debug!("opening {}", self.path.display());
        let console = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|source| ToneError::DeviceOpen {
                path: self.path.display().to_string(),
                source,
            })?;

        let divisor = divisor(request.frequency_hz());
        tracing::debug!(
            "ioctl on {} @ {}Hz (divisor {divisor})",
            self.path.display(),
            request.frequency_hz()
        );

        let fd = console.as_raw_fd();
        self.tone(fd, divisor as c_int)?;
        thread::sleep(request.duration());
        self.tone(fd, 0)
    }
}

impl ConsoleTone {
    fn tone(&self, fd: c_int, divisor: c_int) -> Result<(), ToneError> {
        // Safety: fd comes from a File handle that outlives the call.
        unsafe { kiocsound(fd, divisor) }
            .map(drop)
            .map_err(|source| ToneError::ToneIoctl {
                path: self.path.display().to_string(),
                source,
            })
    }
}

// ============================================================================
// Tests
// ============================================================================
