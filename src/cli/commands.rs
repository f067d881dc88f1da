//! Command definitions for the beepr CLI.
//!
//! Uses clap derive macro for argument parsing. beepr takes flags rather
//! than subcommands: at most one mode flag selects the backend, and the
//! frequency/length/verbosity flags configure it.

use clap::Parser;

use crate::types::{BeepConfig, DEFAULT_FREQUENCY_HZ, DEFAULT_LENGTH_MS};

// ============================================================================
// CLI Structure
// ============================================================================

/// beepr - emit an audible beep through one of several backends
#[derive(Parser, Debug)]
#[command(
    name = "beepr",
    version,
    about = "Emit an audible beep through the console tone generator, a raw audio device, or a command pipe",
    long_about = "A small audio-signaling utility. One-shot modes play a beep and exit;\n\
                  daemon mode listens on the command pipe and beeps on behalf of any\n\
                  process that posts a frequency there."
)]
pub struct Cli {
    /// Show more information for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Set beep frequency in HZ
    #[arg(
        short,
        long,
        value_name = "HZ",
        default_value_t = DEFAULT_FREQUENCY_HZ,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub frequency: u32,

    /// Beep duration in milliseconds
    #[arg(
        short = 'l',
        long,
        value_name = "MS",
        default_value_t = DEFAULT_LENGTH_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub length: u64,

    /// Use ioctl() on /dev/console (the default action)
    #[arg(short, long, group = "mode")]
    pub ioctl: bool,

    /// Write data on /dev/dsp
    #[arg(short = 'D', long, group = "mode")]
    pub dsp: bool,

    /// Write to /run/beepr-cmd
    #[arg(short, long, group = "mode")]
    pub pipe: bool,

    /// Run in the background and listen to FIFO /run/beepr-cmd
    #[arg(short = 'd', long, group = "mode")]
    pub daemon: bool,

    /// Play a simple beep
    #[cfg(feature = "mixer")]
    #[arg(short, long, group = "mode")]
    pub beep: bool,

    /// Play a simple error beep
    #[cfg(feature = "mixer")]
    #[arg(short, long, group = "mode")]
    pub error: bool,
}

// ============================================================================
// Action
// ============================================================================

/// The single backend action selected by the mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// One console tone, then exit.
    Ioctl,
    /// The fixed raw-device demo sequence, then exit.
    Dsp,
    /// Post one command token to the pipe, then exit.
    Pipe,
    /// Run the daemon until terminated.
    Daemon,
    /// Play the beep melody through the mixer.
    #[cfg(feature = "mixer")]
    Beep,
    /// Play the error melody through the mixer.
    #[cfg(feature = "mixer")]
    Error,
}

impl Cli {
    /// Resolved backend action; the console tone is the default when no
    /// mode flag is given.
    pub fn action(&self) -> Action {
        #[cfg(feature = "mixer")]
        {
            if self.beep {
                return Action::Beep;
            }
            if self.error {
                return Action::Error;
            }
        }
        if self.dsp {
            Action::Dsp
        } else if self.pipe {
            Action::Pipe
        } else if self.daemon {
            Action::Daemon
        } else {
            Action::Ioctl
        }
    }

    /// Immutable runtime configuration derived from the parsed flags.
    pub fn config(&self) -> BeepConfig {
        BeepConfig {
            frequency_hz: self.frequency,
            length_ms: self.length,
            verbose: self.verbose,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
