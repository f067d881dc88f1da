//! beepr library
//!
//! Core functionality for the beepr CLI:
//! - Synthetic waveform generation into fixed sample buffers
//! - Tone delivery backends (console ioctl, raw device, optional mixer)
//!   behind the `ToneEmitter` trait
//! - The named command pipe and the privileged beep daemon that reads it
//! - CLI parsing, the pipe writer client, and display utilities

pub mod cli;
pub mod daemon;
pub mod tone;
pub mod types;

// Re-export commonly used types for convenience
pub use cli::{Action, Cli, Display, PipeClient};
pub use daemon::{
    BeepDaemon, CommandChannel, DaemonError, DaemonState, EffectiveUid, FixedPrivilege,
    PrivilegeCheck, DEFAULT_PIPE_PATH,
};
pub use tone::{
    divisor, ConsoleTone, MockToneEmitter, RawDevice, SampleBuffer, ToneEmitter, ToneError,
    CONSOLE_PATH, DEMO_SEQUENCE, DSP_PATH, PIT_TICK_RATE, SAMPLE_CAPACITY, SAMPLE_RATE,
};
pub use types::{BeepConfig, CommandToken, ToneRequest, DEFAULT_FREQUENCY_HZ, DEFAULT_LENGTH_MS};

#[cfg(feature = "mixer")]
pub use tone::{AudioMixer, BEEP_MELODY, ERROR_MELODY};
