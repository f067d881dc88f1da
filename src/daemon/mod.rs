//! Daemon module for beepr.
//!
//! The daemon is the sole privileged producer of console tones: any process
//! posts a frequency line to the command pipe, and the daemon services the
//! requests one at a time.
//!
//! - `pipe`: the named-pipe command channel
//! - `server`: the daemon state machine and run loop

pub mod pipe;
pub mod server;

pub use pipe::{CommandChannel, DEFAULT_PIPE_PATH};
pub use server::{BeepDaemon, DaemonState, EffectiveUid, FixedPrivilege, PrivilegeCheck};

use std::io;

use thiserror::Error;

use crate::types::TokenError;

/// Daemon-side error types.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The daemon was started without elevated privilege.
    #[error("the beepr daemon must be run as root")]
    NotRoot,

    /// The command pipe could not be created.
    #[error("cannot create command pipe {path}: {source}")]
    PipeCreate {
        path: String,
        #[source]
        source: nix::Error,
    },

    /// The command pipe could not be opened.
    #[error("cannot open command pipe {path}: {source}")]
    PipeOpen {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Reading a line from the pipe failed after a successful open.
    #[error("cannot read from command pipe {path}: {source}")]
    PipeRead {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Writing a token into the pipe failed after a successful open.
    #[error("cannot write to command pipe {path}: {source}")]
    PipeWrite {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A pipe line did not carry a usable frequency. The daemon reports
    /// and skips these rather than crashing the loop.
    #[error("malformed command token: {0}")]
    MalformedToken(#[from] TokenError),

    /// The blocking serve task could not be joined.
    #[error("daemon task failed: {0}")]
    Task(String),
}
