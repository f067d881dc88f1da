//! Core type definitions for beepr.
//!
//! This module defines the values passed between the CLI layer and the
//! tone backends:
//! - `BeepConfig`: immutable runtime configuration built from parsed args
//! - `ToneRequest`: a single validated beep request
//! - `CommandToken`: one line of the command-pipe wire format

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Default beep frequency in hertz.
pub const DEFAULT_FREQUENCY_HZ: u32 = 440;

/// Default beep duration in milliseconds.
pub const DEFAULT_LENGTH_MS: u64 = 125;

// ============================================================================
// Errors
// ============================================================================

/// A zero frequency where a positive one is required.
///
/// Both the tone divisor and the waveform period divide by the frequency,
/// so zero is rejected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("frequency must be greater than zero")]
pub struct ZeroFrequency;

/// Errors parsing a command token read from the pipe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The line is not a decimal integer.
    #[error("not a decimal frequency: {0:?}")]
    NotANumber(String),

    /// The line parsed, but the frequency is not positive.
    #[error("frequency must be greater than zero")]
    NonPositive,
}

// ============================================================================
// BeepConfig
// ============================================================================

/// Immutable runtime configuration.
///
/// Built once from the parsed command line and passed into each backend
/// call; nothing mutates it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeepConfig {
    /// Beep frequency in hertz (ioctl and pipe modes).
    pub frequency_hz: u32,
    /// Beep duration in milliseconds.
    pub length_ms: u64,
    /// Show more information for debugging.
    pub verbose: bool,
}

impl Default for BeepConfig {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            length_ms: DEFAULT_LENGTH_MS,
            verbose: false,
        }
    }
}

// ============================================================================
// ToneRequest
// ============================================================================

/// A single validated beep request: frequency plus hold duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneRequest {
    frequency_hz: u32,
    duration: Duration,
}

impl ToneRequest {
    /// Creates a request, rejecting a zero frequency.
    ///
    /// # Errors
    ///
    /// Returns [`ZeroFrequency`] when `frequency_hz` is 0.
    pub fn new(frequency_hz: u32, length_ms: u64) -> Result<Self, ZeroFrequency> {
        if frequency_hz == 0 {
            return Err(ZeroFrequency);
        }
        Ok(Self {
            frequency_hz,
            duration: Duration::from_millis(length_ms),
        })
    }

    /// Requested frequency in hertz; always positive.
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// How long the tone is held.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

// ============================================================================
// CommandToken
// ============================================================================

/// One line of the pipe wire format: a decimal frequency in hertz.
///
/// Created by a writer, consumed exactly once by the daemon's read loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandToken(u32);

impl CommandToken {
    /// Creates a token, rejecting a zero frequency.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::NonPositive`] when `frequency_hz` is 0.
    pub fn new(frequency_hz: u32) -> Result<Self, TokenError> {
        if frequency_hz == 0 {
            return Err(TokenError::NonPositive);
        }
        Ok(Self(frequency_hz))
    }

    /// Frequency carried by the token, in hertz.
    pub fn frequency_hz(self) -> u32 {
        self.0
    }
}

impl FromStr for CommandToken {
    type Err = TokenError;

    /// Parses one pipe line. Surrounding whitespace (including the trailing
    /// newline) is tolerated; everything else must be a positive decimal
    /// integer.
    fn from_str(s: &str) -> Result<Self, TokenError> {
        let trimmed = s.trim();
        let value: u32 = trimmed
            .parse()
            .map_err(|_| TokenError::NotANumber(trimmed.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for CommandToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
