//! Display utilities for the beepr CLI.
//!
//! Diagnostic messages go to the error stream; verbose detail flows through
//! `tracing` instead and only surfaces when `--verbose` raises the filter.

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows an error message on the diagnostic stream.
    pub fn show_error(message: &str) {
        eprintln!("beepr: {message}");
    }

    /// Shows a recoverable failure: the action did not happen, but the
    /// process still exits successfully.
    pub fn show_skipped(message: &str) {
        eprintln!("beepr: {message} (nothing played)");
    }
}
