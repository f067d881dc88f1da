//! Pipe writer client.
//!
//! Posts one frequency token to the daemon's command pipe. The writer never
//! creates the pipe; a missing daemon shows up as an open error, which
//! callers report without failing the process.

use crate::daemon::{CommandChannel, DaemonError};
use crate::types::CommandToken;

/// One-shot client for the beep daemon's command pipe.
#[derive(Debug, Clone)]
pub struct PipeClient {
    channel: CommandChannel,
}

impl PipeClient {
    /// Client for the well-known pipe path.
    pub fn new() -> Self {
        Self::with_channel(CommandChannel::at_default_path())
    }

    /// Client over a custom channel (used by tests).
    pub fn with_channel(channel: CommandChannel) -> Self {
        Self { channel }
    }

    /// Posts one frequency token, newline-terminated.
    ///
    /// Blocks until the daemon opens the read side, per FIFO semantics.
    ///
    /// # Errors
    ///
    /// Returns a [`DaemonError`] when the frequency is invalid or the pipe
    /// cannot be opened or written.
    pub fn send_frequency(&self, frequency_hz: u32) -> Result<(), DaemonError> {
        let token = CommandToken::new(frequency_hz)?;
        tracing::debug!(
            "posting {token}Hz to {}",
            self.channel.path().display()
        );
        self.channel.send(&token)
    }
}

impl Default for PipeClient {
    fn default() -> Self {
        Self::new()
    }
}
