//! beepr - a small Linux beep utility.
//!
//! Emits a beep through one of several backends:
//! - the console tone generator (`KIOCSOUND` ioctl, the default)
//! - a raw audio device (`/dev/dsp`)
//! - the OS audio mixer (optional `mixer` feature)
//! - a named command pipe read by a privileged daemon

use anyhow::Result;
use clap::Parser;

use beepr::cli::{Action, Cli, Display, PipeClient};
use beepr::daemon::{BeepDaemon, CommandChannel, EffectiveUid};
use beepr::tone::{ConsoleTone, RawDevice, ToneEmitter};
use beepr::types::ToneRequest;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `--verbose` drops the default filter to debug; otherwise only warnings
/// surface. `RUST_LOG` overrides both.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "beepr=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the selected backend action.
///
/// Errors returned from here are fatal (exit 1): daemon preconditions and
/// the raw device open. Recoverable device trouble on the one-shot paths is
/// reported and swallowed so the process still exits 0.
async fn execute(cli: Cli) -> Result<()> {
    let config = cli.config();

    match cli.action() {
        Action::Ioctl => {
            let request = ToneRequest::new(config.frequency_hz, config.length_ms)?;
            if let Err(e) = ConsoleTone::new().emit(&request) {
                Display::show_skipped(&e.to_string());
            }
        }
        Action::Dsp => {
            let device = RawDevice::open()?;
            device.play_demo()?;
        }
        Action::Pipe => {
            let client = PipeClient::new();
            if let Err(e) = client.send_frequency(config.frequency_hz) {
                Display::show_skipped(&e.to_string());
            }
        }
        Action::Daemon => {
            let daemon = BeepDaemon::new(
                ConsoleTone::new(),
                EffectiveUid,
                CommandChannel::at_default_path(),
                config,
            );
            daemon.run(shutdown_signal()).await?;
        }
        #[cfg(feature = "mixer")]
        Action::Beep => play_melody(&beepr::tone::BEEP_MELODY, config.length_ms),
        #[cfg(feature = "mixer")]
        Action::Error => play_melody(&beepr::tone::ERROR_MELODY, config.length_ms),
    }

    Ok(())
}

/// Watch channel that flips once SIGINT arrives.
fn shutdown_signal() -> tokio::sync::watch::Receiver<bool> {
    let (tx, rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(true);
        }
    });
    rx
}

/// Plays a fixed melody through the mixer; mixer trouble is recoverable.
#[cfg(feature = "mixer")]
fn play_melody(melody: &[u32], note_ms: u64) {
    use beepr::tone::AudioMixer;

    match AudioMixer::new() {
        Ok(mixer) => {
            if let Err(e) = mixer.play_melody(melody, note_ms) {
                Display::show_skipped(&e.to_string());
            }
        }
        Err(e) => Display::show_skipped(&e.to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================
