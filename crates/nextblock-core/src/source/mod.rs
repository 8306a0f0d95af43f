//! Schedule folder discovery and the live watch.
//!
//! A [`ScheduleSource`] owns one persistent folder of candidate schedule
//! files. The most recently modified candidate is authoritative; the
//! watch half (see [`watcher`]) collapses bursts of filesystem events
//! into single change notifications.

mod watcher;

pub use watcher::DEBOUNCE_WINDOW;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{CoreError, Result};
use crate::schedule::ScheduleDocument;
use watcher::WatchHandle;

/// File extensions recognized as schedule documents.
pub const SCHEDULE_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Owns the persistent schedule folder and the live watch on it.
pub struct ScheduleSource {
    folder: PathBuf,
    watch: Option<WatchHandle>,
}

impl ScheduleSource {
    pub fn new(folder: PathBuf) -> Self {
        Self {
            folder,
            watch: None,
        }
    }

    /// The default per-user schedule folder:
    /// `~/.config/nextblock/schedules`, or `nextblock-dev` when
    /// `NEXTBLOCK_ENV=dev`.
    pub fn default_folder() -> PathBuf {
        let base = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");

        let env = std::env::var("NEXTBLOCK_ENV").unwrap_or_else(|_| "production".to_string());

        let dir = if env == "dev" {
            base.join("nextblock-dev")
        } else {
            base.join("nextblock")
        };
        dir.join("schedules")
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Create the schedule folder if it does not exist. Idempotent.
    pub fn ensure_folder(&self) -> Result<()> {
        fs::create_dir_all(&self.folder)?;
        Ok(())
    }

    /// The most recently modified candidate file, or `None` when the
    /// folder is empty or missing.
    pub fn most_recent_candidate(&self) -> Result<Option<PathBuf>> {
        let entries = match fs::read_dir(&self.folder) {
            Ok(entries) => entries,
            Err(_) => return Ok(None),
        };

        let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !is_candidate_name(&path) {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            if newest.as_ref().map(|(at, _)| modified > *at).unwrap_or(true) {
                newest = Some((modified, path));
            }
        }
        Ok(newest.map(|(_, path)| path))
    }

    pub fn has_candidate(&self) -> bool {
        matches!(self.most_recent_candidate(), Ok(Some(_)))
    }

    /// Read and parse the authoritative schedule file.
    ///
    /// Fails with [`CoreError::MissingSource`] when the folder holds no
    /// candidate, so a host can run its first-time setup flow.
    pub fn load(&self) -> Result<ScheduleDocument> {
        let path = self
            .most_recent_candidate()?
            .ok_or_else(|| CoreError::MissingSource(self.folder.clone()))?;
        let contents = fs::read_to_string(&path)?;
        let doc = ScheduleDocument::from_yaml_str(&contents)?;
        info!(path = %path.display(), "loaded schedule document");
        Ok(doc)
    }

    /// Begin watching the folder. `on_change` fires at most once per
    /// quiet period after a burst of qualifying events; non-schedule
    /// files never trigger it. Restarts the watch if one is already
    /// running.
    pub fn watch<F>(&mut self, on_change: F) -> Result<()>
    where
        F: Fn() + Send + 'static,
    {
        self.stop_watching();
        self.watch = Some(WatchHandle::spawn(self.folder.clone(), on_change)?);
        info!(path = %self.folder.display(), "watching schedule folder");
        Ok(())
    }

    /// Stop watching and drop any pending debounce. Idempotent.
    pub fn stop_watching(&mut self) {
        if let Some(handle) = self.watch.take() {
            handle.stop();
        }
    }
}

impl Drop for ScheduleSource {
    fn drop(&mut self) {
        self.stop_watching();
    }
}

/// A filename qualifies when it carries a schedule extension and contains
/// no path-traversal sequences or separators.
fn is_candidate_name(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SCHEDULE_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}
