//! The beep daemon.
//!
//! Listens on the command pipe for frequency tokens and forwards each one
//! to a tone emitter with the configured duration, one request at a time in
//! arrival order, until shut down.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task;

use crate::daemon::pipe::CommandChannel;
use crate::daemon::DaemonError;
use crate::tone::ToneEmitter;
use crate::types::{BeepConfig, CommandToken, ToneRequest};

/// How often shutdown re-prods a reader that had not opened the pipe yet.
const UNBLOCK_RETRY: Duration = Duration::from_millis(10);

// ============================================================================
// PrivilegeCheck
// ============================================================================

/// Privilege check seam, injectable so tests can simulate either answer.
pub trait PrivilegeCheck {
    /// True when the process may drive the console tone generator.
    fn is_root(&self) -> bool;
}

/// Real check against the effective UID.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectiveUid;

impl PrivilegeCheck for EffectiveUid {
    fn is_root(&self) -> bool {
        nix::unistd::geteuid().is_root()
    }
}

/// Fixed-answer check for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedPrivilege(pub bool);

impl PrivilegeCheck for FixedPrivilege {
    fn is_root(&self) -> bool {
        self.0
    }
}

// ============================================================================
// DaemonState
// ============================================================================

/// Daemon lifecycle states. There is no terminal state short of shutdown:
/// every served request circles back to `WaitingForOpen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonState {
    /// Privilege and pipe checks in progress.
    Initializing,
    /// Blocked opening the pipe for read, waiting for a writer.
    WaitingForOpen,
    /// A writer arrived; one line is being read and parsed.
    ReadingLine,
    /// A parsed request is being forwarded to the tone emitter.
    EmittingTone,
}

// ============================================================================
// BeepDaemon
// ============================================================================

/// The long-running pipe reader that turns command tokens into tones.
pub struct BeepDaemon<E, P> {
    emitter: E,
    privilege: P,
    channel: CommandChannel,
    config: BeepConfig,
    state: Mutex<DaemonState>,
}

impl<E, P> BeepDaemon<E, P>
where
    E: ToneEmitter + Send + Sync + 'static,
    P: PrivilegeCheck + Send + Sync + 'static,
{
    pub fn new(emitter: E, privilege: P, channel: CommandChannel, config: BeepConfig) -> Self {
        Self {
            emitter,
            privilege,
            channel,
            config,
            state: Mutex::new(DaemonState::Initializing),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DaemonState {
        *self.state.lock().unwrap()
    }

    /// Validates the fatal preconditions and creates the pipe if absent.
    ///
    /// The privilege check runs first, so an unprivileged invocation
    /// refuses to start without leaving a pipe behind.
    ///
    /// # Errors
    ///
    /// [`DaemonError::NotRoot`] or [`DaemonError::PipeCreate`]; both map to
    /// exit status 1.
    pub fn initialize(&self) -> Result<(), DaemonError> {
        if !self.privilege.is_root() {
            return Err(DaemonError::NotRoot);
        }
        self.channel.ensure_exists()?;
        self.set_state(DaemonState::WaitingForOpen);
        Ok(())
    }

    /// Runs the daemon until `shutdown` fires.
    ///
    /// Each serve cycle runs on the blocking pool (the FIFO open blocks
    /// until a writer arrives) and is raced against the shutdown signal.
    /// On shutdown the daemon unblocks its own reader with a transient
    /// non-blocking write-side open and waits for the cycle to drain.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<(), DaemonError> {
        self.initialize()?;
        tracing::info!("listening on {}", self.channel.path().display());

        let daemon = Arc::new(self);
        loop {
            let mut cycle = {
                let daemon = Arc::clone(&daemon);
                task::spawn_blocking(move || daemon.serve_one())
            };

            tokio::select! {
                joined = &mut cycle => match joined {
                    Ok(Ok(frequency)) => tracing::debug!("served {frequency}Hz request"),
                    Ok(Err(DaemonError::MalformedToken(e))) => {
                        tracing::warn!("ignoring pipe line: {e}");
                    }
                    Ok(Err(e)) => return Err(e),
                    Err(e) => return Err(DaemonError::Task(e.to_string())),
                },
                _ = shutdown.changed() => {
                    tracing::info!("shutdown requested");
                    daemon.drain_cycle(cycle).await;
                    break;
                }
            }
        }
        Ok(())
    }

    /// One full WaitingForOpen -> ReadingLine -> EmittingTone cycle.
    ///
    /// Malformed tokens surface as [`DaemonError::MalformedToken`]; emitter
    /// trouble is logged and swallowed so the loop survives a busy or
    /// missing console.
    fn serve_one(&self) -> Result<u32, DaemonError> {
        self.set_state(DaemonState::WaitingForOpen);
        let line = self.channel.read_request()?;

        self.set_state(DaemonState::ReadingLine);
        let token: CommandToken = line.parse()?;

        self.set_state(DaemonState::EmittingTone);
        self.emit(token.frequency_hz());
        Ok(token.frequency_hz())
    }

    fn emit(&self, frequency_hz: u32) {
        let request = match ToneRequest::new(frequency_hz, self.config.length_ms) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("dropping request: {e}");
                return;
            }
        };
        if let Err(e) = self.emitter.emit(&request) {
            tracing::warn!("tone emitter failed: {e}");
        }
    }

    /// Lets an in-flight cycle finish after shutdown. The reader may still
    /// be blocked before its open; keep prodding until it returns.
    async fn drain_cycle(&self, mut cycle: task::JoinHandle<Result<u32, DaemonError>>) {
        loop {
            self.channel.unblock_reader();
            tokio::select! {
                _ = &mut cycle => break,
                _ = tokio::time::sleep(UNBLOCK_RETRY) => {}
            }
        }
    }

    fn set_state(&self, next: DaemonState) {
        tracing::trace!("daemon state: {next:?}");
        *self.state.lock().unwrap() = next;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    use crate::tone::{divisor, MockToneEmitter};

    fn temp_daemon(
        privileged: bool,
    ) -> (BeepDaemon<MockToneEmitter, FixedPrivilege>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let channel = CommandChannel::new(dir.path().join("beepr-cmd"));
        let daemon = BeepDaemon::new(
            MockToneEmitter::new(),
            FixedPrivilege(privileged),
            channel,
            BeepConfig::default(),
        );
        (daemon, dir)
    }

    fn write_line(daemon: &BeepDaemon<MockToneEmitter, FixedPrivilege>, line: &'static str) {
        let path = daemon.channel.path().to_path_buf();
        thread::spawn(move || {
            use std::io::Write;
            let mut pipe = std::fs::OpenOptions::new().write(true).open(path).unwrap();
            pipe.write_all(line.as_bytes()).unwrap();
        });
    }

    mod initialize_tests {
        use super::*;

        #[test]
        fn test_refuses_to_start_without_privilege() {
            let (daemon, _dir) = temp_daemon(false);

            let err = daemon.initialize().unwrap_err();
            assert!(matches!(err, DaemonError::NotRoot));
            // No pipe side effects on the refusal path.
            assert!(!daemon.channel.path().exists());
            assert_eq!(daemon.state(), DaemonState::Initializing);
        }

        #[test]
        fn test_creates_pipe_when_privileged() {
            let (daemon, _dir) = temp_daemon(true);

            daemon.initialize().unwrap();
            assert!(daemon.channel.path().exists());
            assert_eq!(daemon.state(), DaemonState::WaitingForOpen);
        }

        #[test]
        fn test_pipe_creation_failure_is_fatal() {
            let daemon = BeepDaemon::new(
                MockToneEmitter::new(),
                FixedPrivilege(true),
                CommandChannel::new("/nonexistent/dir/beepr-cmd"),
                BeepConfig::default(),
            );

            let err = daemon.initialize().unwrap_err();
            assert!(matches!(err, DaemonError::PipeCreate { .. }));
        }
    }

    mod serve_tests {
        use super::*;

        #[test]
        fn test_serves_a_frequency_token() {
            let (daemon, _dir) = temp_daemon(true);
            daemon.initialize().unwrap();

            write_line(&daemon, "440\n");
            let served = daemon.serve_one().unwrap();

            assert_eq!(served, 440);
            let requests = daemon.emitter.requests();
            assert_eq!(requests.len(), 1);
            assert_eq!(requests[0].frequency_hz(), 440);
            assert_eq!(requests[0].duration(), Duration::from_millis(125));
        }

        #[test]
        fn test_malformed_token_is_skipped_without_emitting() {
            let (daemon, _dir) = temp_daemon(true);
            daemon.initialize().unwrap();

            write_line(&daemon, "not-a-number\n");
            let err = daemon.serve_one().unwrap_err();

            assert!(matches!(err, DaemonError::MalformedToken(_)));
            assert_eq!(daemon.emitter.emit_count(), 0);
        }

        #[test]
        fn test_zero_frequency_token_is_rejected() {
            let (daemon, _dir) = temp_daemon(true);
            daemon.initialize().unwrap();

            write_line(&daemon, "0\n");
            let err = daemon.serve_one().unwrap_err();

            assert!(matches!(err, DaemonError::MalformedToken(_)));
            assert_eq!(daemon.emitter.emit_count(), 0);
        }

        #[test]
        fn test_emitter_failure_does_not_kill_the_cycle() {
            let (daemon, _dir) = temp_daemon(true);
            daemon.initialize().unwrap();
            daemon.emitter.set_should_fail(true);

            write_line(&daemon, "440\n");
            let served = daemon.serve_one().unwrap();

            assert_eq!(served, 440);
            assert_eq!(daemon.emitter.emit_count(), 0);
        }

        #[test]
        fn test_end_to_end_request_is_emitted_exactly_once() {
            let (daemon, _dir) = temp_daemon(true);
            daemon.initialize().unwrap();

            write_line(&daemon, "880\n");
            let served = daemon.serve_one().unwrap();

            assert_eq!(served, 880);
            assert_eq!(divisor(served), 1356);
            assert_eq!(daemon.emitter.emit_count(), 1);
            assert_eq!(daemon.state(), DaemonState::EmittingTone);
        }

        #[test]
        fn test_requests_are_served_in_arrival_order() {
            let (daemon, _dir) = temp_daemon(true);
            daemon.initialize().unwrap();

            write_line(&daemon, "440\n");
            daemon.serve_one().unwrap();
            write_line(&daemon, "880\n");
            daemon.serve_one().unwrap();

            let frequencies: Vec<u32> = daemon
                .emitter
                .requests()
                .iter()
                .map(|r| r.frequency_hz())
                .collect();
            assert_eq!(frequencies, [440, 880]);
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_run_fails_fast_without_privilege() {
            let (daemon, _dir) = temp_daemon(false);
            let (_tx, rx) = watch::channel(false);

            let err = daemon.run(rx).await.unwrap_err();
            assert!(matches!(err, DaemonError::NotRoot));
        }

        #[tokio::test]
        async fn test_run_serves_then_shuts_down() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("beepr-cmd");
            let daemon = BeepDaemon::new(
                MockToneEmitter::new(),
                FixedPrivilege(true),
                CommandChannel::new(&path),
                BeepConfig::default(),
            );
            let (tx, rx) = watch::channel(false);

            let handle = tokio::spawn(daemon.run(rx));

            // Wait for the pipe, post one request, then stop the daemon.
            while !path.exists() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            let writer_path = path.clone();
            task::spawn_blocking(move || {
                CommandChannel::new(writer_path)
                    .send(&CommandToken::new(880).unwrap())
                    .unwrap();
            })
            .await
            .unwrap();

            tx.send(true).unwrap();
            let result = tokio::time::timeout(Duration::from_secs(5), handle)
                .await
                .unwrap()
                .unwrap();
            assert!(result.is_ok());
        }

        #[tokio::test]
        async fn test_shutdown_while_waiting_for_writer() {
            let dir = tempfile::tempdir().unwrap();
            let daemon = BeepDaemon::new(
                MockToneEmitter::new(),
                FixedPrivilege(true),
                CommandChannel::new(dir.path().join("beepr-cmd")),
                BeepConfig::default(),
            );
            let (tx, rx) = watch::channel(false);

            let handle = tokio::spawn(daemon.run(rx));
            tokio::time::sleep(Duration::from_millis(50)).await;
            tx.send(true).unwrap();

            let result = tokio::time::timeout(Duration::from_secs(5), handle)
                .await
                .unwrap()
                .unwrap();
            assert!(result.is_ok());
        }
    }
}
