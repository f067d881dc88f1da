//! Command pipe transport.
//!
//! A single named pipe (FIFO) at a fixed, well-known path carries one-line
//! frequency tokens from any writer process to the daemon. The kernel's
//! FIFO semantics provide the only synchronization: a blocking open on one
//! side waits for the other side to arrive.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use nix::sys::stat::Mode;

use crate::daemon::DaemonError;
use crate::types::CommandToken;

/// Well-known pipe path, shared by writers and the daemon.
pub const DEFAULT_PIPE_PATH: &str = "/run/beepr-cmd";

/// Creation mode for the pipe: world readable and writable, so any process
/// can request a beep.
const PIPE_MODE: Mode = Mode::from_bits_truncate(0o666);

// ============================================================================
// CommandChannel
// ============================================================================

/// One named pipe used as a cross-process command channel.
#[derive(Debug, Clone)]
pub struct CommandChannel {
    path: PathBuf,
}

impl CommandChannel {
    /// Channel over a custom pipe path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Channel over the well-known pipe path.
    pub fn at_default_path() -> Self {
        Self::new(DEFAULT_PIPE_PATH)
    }

    /// The pipe path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the FIFO if nothing exists at the path. The pipe persists
    /// across daemon restarts and is never removed by beepr.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError::PipeCreate`]; the daemon treats this as fatal.
    pub fn ensure_exists(&self) -> Result<(), DaemonError> {
        if self.path.exists() {
            return Ok(());
        }
        tracing::debug!("creating command pipe {}", self.path.display());
        nix::unistd::mkfifo(&self.path, PIPE_MODE).map_err(|source| DaemonError::PipeCreate {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Posts one command token, newline-terminated.
    ///
    /// The writer never creates the pipe; creation is owned by the daemon,
    /// so a missing daemon surfaces as an open error here. Blocks until a
    /// reader has the other end open, per FIFO semantics.
    ///
    /// # Errors
    ///
    /// Open and write failures are reported by callers without failing the
    /// process (exit 0).
    pub fn send(&self, token: &CommandToken) -> Result<(), DaemonError> {
        let mut pipe = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|source| DaemonError::PipeOpen {
                path: self.path.display().to_string(),
                source,
            })?;
        writeln!(pipe, "{token}").map_err(|source| DaemonError::PipeWrite {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Reads one line, blocking until a writer opens the pipe and sends it.
    ///
    /// The handle closes on return, so the next call is a fresh rendezvous.
    pub fn read_request(&self) -> Result<String, DaemonError> {
        let pipe = File::open(&self.path).map_err(|source| DaemonError::PipeOpen {
            path: self.path.display().to_string(),
            source,
        })?;
        let mut line = String::new();
        BufReader::new(pipe)
            .read_line(&mut line)
            .map_err(|source| DaemonError::PipeRead {
                path: self.path.display().to_string(),
                source,
            })?;
        Ok(line)
    }

    /// Unblocks a reader stuck in [`read_request`](Self::read_request) by
    /// briefly opening the write side without blocking. Used during
    /// shutdown; failures are ignored (no reader means nothing to unblock).
    pub fn unblock_reader(&self) {
        let _ = OpenOptions::new()
            .write(true)
            .custom_flags(nix::libc::O_NONBLOCK)
            .open(&self.path);
    }
}

// ============================================================================
// Tests
// ============================================================================
