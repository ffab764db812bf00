//! Lifecycle supervision of the spawned server process.
//!
//! The supervisor is a pass-through wrapper: spawn with inherited stdio,
//! relay the interrupt signal, block until exit. No restarts, no health
//! checks, no output capture.
//!
//! The interrupt handler and the main thread share exactly one value, the
//! optional child handle. The main thread is its only writer (at spawn time)
//! and the signal thread its only reader, so a plain mutex around an Option
//! is sufficient; the handler must tolerate firing before the child exists.

mod child;

pub use child::{ChildControl, PidHandle};

use crate::error::{LaunchError, Result};
use crate::platform::{self, PlatformKind};
use crate::runtime::RuntimeLocation;
use signal_hook::consts::signal::SIGINT;
use signal_hook::flag;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const INTERRUPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shared, possibly-not-yet-assigned child handle.
#[derive(Clone, Default)]
pub struct ChildCell {
    inner: Arc<Mutex<CellState>>,
}

#[derive(Default)]
struct CellState {
    handle: Option<Box<dyn ChildControl>>,
    terminated: bool,
}

impl ChildCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a spawned child. Called once by the main thread.
    pub fn assign(&self, handle: Box<dyn ChildControl>) {
        let mut state = self.inner.lock().expect("child cell poisoned");
        state.handle = Some(handle);
    }

    /// Handle an interrupt: print the shutdown notice and ask the tracked
    /// child to terminate. At most one termination is ever issued, and a
    /// cell with no child yet is a tolerated no-op.
    pub fn request_shutdown(&self) {
        println!("SIGINT received. Shutting down RabbitMQ server");
        let mut state = self.inner.lock().expect("child cell poisoned");
        if state.terminated {
            return;
        }
        let CellState { handle, terminated } = &mut *state;
        if let Some(handle) = handle.as_mut() {
            *terminated = true;
            if let Err(e) = handle.terminate() {
                log::warn!("Failed to terminate server process: {e}");
            }
        }
    }

    #[cfg(test)]
    fn is_terminated(&self) -> bool {
        self.inner.lock().unwrap().terminated
    }
}

/// Supervisor for the bundled server process.
pub struct Supervisor {
    platform: PlatformKind,
    cell: ChildCell,
}

impl Supervisor {
    pub fn new(platform: PlatformKind) -> Self {
        Self {
            platform,
            cell: ChildCell::new(),
        }
    }

    /// Register the interrupt handler. Done before spawning so an early
    /// Ctrl-C is never lost; the cell tolerates the missing handle.
    ///
    /// The signal handler itself only flips an atomic flag; a watcher
    /// thread observes the flag and performs the actual shutdown request,
    /// keeping the handler async-signal-safe.
    pub fn install_interrupt_handler(&self) -> Result<()> {
        let interrupted = Arc::new(AtomicBool::new(false));
        flag::register(SIGINT, interrupted.clone())
            .map_err(|e| LaunchError::SystemError(format!("Failed to register SIGINT: {e}")))?;

        let cell = self.cell.clone();
        thread::Builder::new()
            .name("signal-watcher".to_string())
            .spawn(move || {
                loop {
                    if interrupted.swap(false, Ordering::SeqCst) {
                        cell.request_shutdown();
                    }
                    thread::sleep(INTERRUPT_POLL_INTERVAL);
                }
            })
            .map_err(|e| {
                LaunchError::SystemError(format!("Failed to spawn signal thread: {e}"))
            })?;
        Ok(())
    }

    /// Spawn the server with inherited stdio, then block until it exits.
    pub fn run(
        &self,
        server_sbin_dir: &Path,
        node_name: Option<&str>,
        runtime: &RuntimeLocation,
    ) -> Result<()> {
        let server_path = server_sbin_dir.join(platform::server_script_name(self.platform));
        log::info!("Starting server: {}", server_path.display());

        let mut command = Command::new(&server_path);
        command
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(node) = node_name {
            command.env("RABBITMQ_NODENAME", node);
        }

        let mut process = command.spawn().map_err(|e| {
            LaunchError::SystemError(format!(
                "Failed to start server {}: {e}",
                server_path.display()
            ))
        })?;

        self.cell.assign(Box::new(PidHandle::new(process.id())));

        let status = process.wait()?;
        log::debug!("Server exited with {status}");

        if self.platform.is_windows() {
            kill_epmd(self.platform, &runtime.erts_bin_dir)?;
        }

        println!("RabbitMQ server shutdown. Goodbye!");
        Ok(())
    }
}

/// Auxiliary cleanup after the server exits: the Erlang port mapper daemon
/// outlives the node on Windows and would hold its listen port across runs.
fn kill_epmd(platform: PlatformKind, erts_bin_dir: &Path) -> Result<()> {
    let epmd: PathBuf = erts_bin_dir.join(platform::epmd_binary_name(platform));
    log::info!("Stopping epmd via {}", epmd.display());

    let status = Command::new(&epmd).arg("-kill").status().map_err(|e| {
        LaunchError::SystemError(format!("Failed to run {}: {e}", epmd.display()))
    })?;

    if !status.success() {
        return Err(LaunchError::SystemError(format!(
            "{} -kill exited with status {status}",
            epmd.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingChild {
        terminations: Arc<AtomicUsize>,
    }

    impl ChildControl for CountingChild {
        fn terminate(&mut self) -> Result<()> {
            self.terminations.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingChild;

    impl ChildControl for FailingChild {
        fn terminate(&mut self) -> Result<()> {
            Err(LaunchError::SystemError("no such process".to_string()))
        }
    }

    #[test]
    fn test_shutdown_before_assignment_does_not_panic() {
        let cell = ChildCell::new();
        cell.request_shutdown();
        assert!(!cell.is_terminated());
    }

    #[test]
    fn test_shutdown_terminates_exactly_once() {
        let terminations = Arc::new(AtomicUsize::new(0));
        let cell = ChildCell::new();
        cell.assign(Box::new(CountingChild {
            terminations: terminations.clone(),
        }));

        cell.request_shutdown();
        cell.request_shutdown();
        cell.request_shutdown();

        assert_eq!(terminations.load(Ordering::SeqCst), 1);
        assert!(cell.is_terminated());
    }

    #[test]
    fn test_shutdown_survives_termination_failure() {
        let cell = ChildCell::new();
        cell.assign(Box::new(FailingChild));
        cell.request_shutdown();
        assert!(cell.is_terminated());
    }

    #[test]
    fn test_cell_shared_across_clones() {
        let terminations = Arc::new(AtomicUsize::new(0));
        let cell = ChildCell::new();
        let reader = cell.clone();

        cell.assign(Box::new(CountingChild {
            terminations: terminations.clone(),
        }));
        reader.request_shutdown();

        assert_eq!(terminations.load(Ordering::SeqCst), 1);
    }
}
