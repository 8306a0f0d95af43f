//! Debounced folder watch with a self-healing backend.
//!
//! notify delivers raw filesystem events on its own thread; qualifying
//! events are forwarded as signals into a worker that owns both the
//! debounce deadline and the watcher handle. A backend fault tears the
//! watcher down and recreates it in place -- the watch never terminates
//! on error.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{info, warn};

use super::SCHEDULE_EXTENSIONS;
use crate::error::Result;

/// Quiet period after the last qualifying event before a change fires.
/// Atomic file replaces show up as a burst of OS-level events; this
/// collapses each burst into one notification.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Pause between attempts to recreate a faulted watch backend.
const RECREATE_PAUSE: Duration = Duration::from_secs(1);

enum WatchSignal {
    /// A qualifying filesystem event touched the folder.
    Qualifying,
    /// The watch backend itself reported an error.
    Fault(notify::Error),
    /// `stop_watching` was called.
    Stop,
}

/// A running watch: the signal channel plus the worker draining it.
pub(super) struct WatchHandle {
    signal_tx: Sender<WatchSignal>,
    worker: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Create the backend watcher and start the debounce worker.
    /// Fails only if the initial watcher cannot be created; later backend
    /// faults are absorbed by the worker.
    pub(super) fn spawn<F>(folder: PathBuf, on_change: F) -> Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let (signal_tx, signal_rx) = mpsc::channel();
        let watcher = create_watcher(&folder, signal_tx.clone())?;
        let worker_tx = signal_tx.clone();
        let worker =
            thread::spawn(move || run(folder, watcher, worker_tx, signal_rx, on_change));
        Ok(Self {
            signal_tx,
            worker: Some(worker),
        })
    }

    /// Cancel any pending debounce and join the worker.
    pub(super) fn stop(mut self) {
        let _ = self.signal_tx.send(WatchSignal::Stop);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Worker loop: restart the debounce deadline on every qualifying signal,
/// fire `on_change` once the deadline passes uninterrupted, and swap in a
/// fresh backend watcher whenever the current one faults.
fn run<F: Fn()>(
    folder: PathBuf,
    mut watcher: RecommendedWatcher,
    signal_tx: Sender<WatchSignal>,
    signal_rx: Receiver<WatchSignal>,
    on_change: F,
) {
    let mut deadline: Option<Instant> = None;
    loop {
        let signal = match deadline {
            Some(due) => {
                match signal_rx.recv_timeout(due.saturating_duration_since(Instant::now())) {
                    Ok(signal) => signal,
                    Err(RecvTimeoutError::Timeout) => {
                        deadline = None;
                        on_change();
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match signal_rx.recv() {
                Ok(signal) => signal,
                Err(_) => break,
            },
        };

        match signal {
            WatchSignal::Qualifying => deadline = Some(Instant::now() + DEBOUNCE_WINDOW),
            WatchSignal::Fault(error) => {
                warn!(error = %error, "schedule watch backend failed, restarting");
                drop(watcher);
                watcher = recreate_watcher(&folder, &signal_tx);
            }
            WatchSignal::Stop => break,
        }
    }
}

/// Recreate the backend watcher, retrying until it sticks. The retry is
/// unconditional and unbounded: a persistently failing watch target is
/// re-attempted forever rather than giving up.
fn recreate_watcher(folder: &Path, signal_tx: &Sender<WatchSignal>) -> RecommendedWatcher {
    loop {
        match create_watcher(folder, signal_tx.clone()) {
            Ok(watcher) => {
                info!(path = %folder.display(), "schedule watch restarted");
                return watcher;
            }
            Err(error) => {
                warn!(error = %error, "failed to restart schedule watch, retrying");
                thread::sleep(RECREATE_PAUSE);
            }
        }
    }
}

fn create_watcher(folder: &Path, signal_tx: Sender<WatchSignal>) -> Result<RecommendedWatcher> {
    let mut watcher = notify::recommended_watcher(
        move |res: std::result::Result<Event, notify::Error>| match res {
            Ok(event) => {
                if event.paths.iter().any(|path| is_qualifying(path)) {
                    let _ = signal_tx.send(WatchSignal::Qualifying);
                }
            }
            Err(error) => {
                let _ = signal_tx.send(WatchSignal::Fault(error));
            }
        },
    )?;
    watcher.watch(folder, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Only events naming a schedule file restart the debounce timer.
/// Dotfiles (atomic-replace temp files included) are ignored.
fn is_qualifying(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if name.starts_with('.') {
            return false;
        }
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SCHEDULE_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}
