//! CLI module for beepr.
//!
//! - `commands`: flag definitions using clap derive
//! - `client`: pipe writer for the one-shot `--pipe` action
//! - `display`: output formatting

pub mod client;
pub mod commands;
pub mod display;

pub use client::PipeClient;
pub use commands::{Action, Cli};
pub use display::Display;
