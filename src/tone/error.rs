//! Tone backend error types.

use std::io;

use thiserror::Error;

/// Errors that can occur while delivering a tone.
#[derive(Debug, Error)]
pub enum ToneError {
    /// A device path could not be opened.
    ///
    /// Recoverable for one-shot console beeps; fatal for the raw device,
    /// whose whole purpose is the write.
    #[error("cannot open {path}: {source}")]
    DeviceOpen {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The tone ioctl was rejected by the device.
    #[error("tone ioctl on {path} failed: {source}")]
    ToneIoctl {
        path: String,
        #[source]
        source: nix::Error,
    },

    /// A sample buffer could not be written to the device.
    #[error("write to {path} failed: {source}")]
    DeviceWrite {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The audio mixer backend is unavailable or failed mid-playback.
    #[cfg(feature = "mixer")]
    #[error("audio mixer unavailable: {0}")]
    Mixer(String),
}

impl ToneError {
    /// True when the failure happened at device open time.
    #[must_use]
    pub fn is_open_error(&self) -> bool {
        matches!(self, Self::DeviceOpen { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ToneError::DeviceOpen {
            path: "/dev/console".to_string(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/dev/console"));
        assert!(err.to_string().starts_with("cannot open"));

        let err = ToneError::DeviceWrite {
            path: "/dev/dsp".to_string(),
            source: io::Error::from(io::ErrorKind::BrokenPipe),
        };
        assert!(err.to_string().contains("/dev/dsp"));
    }

    #[test]
    fn test_is_open_error() {
        let open = ToneError::DeviceOpen {
            path: "x".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(open.is_open_error());

        let write = ToneError::DeviceWrite {
            path: "x".to_string(),
            source: io::Error::from(io::ErrorKind::Other),
        };
        assert!(!write.is_open_error());
    }
}
