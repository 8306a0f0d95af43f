//! Engine + source wiring.
//!
//! [`ScheduleService`] keeps an [`Engine`]'s active document in step with
//! the newest candidate file in the schedule folder: pull queries go to
//! the engine, debounced change notifications from the source trigger a
//! reload that swaps the document wholesale.

use std::sync::Arc;

use tracing::{info, warn};

use crate::engine::Engine;
use crate::error::Result;
use crate::source::ScheduleSource;

/// Owns an engine and its schedule source.
pub struct ScheduleService {
    engine: Arc<Engine>,
    source: ScheduleSource,
}

impl ScheduleService {
    pub fn new(source: ScheduleSource) -> Self {
        Self {
            engine: Arc::new(Engine::new()),
            source,
        }
    }

    /// Handle to the query engine; safe to share with other threads.
    pub fn engine(&self) -> Arc<Engine> {
        Arc::clone(&self.engine)
    }

    pub fn source(&self) -> &ScheduleSource {
        &self.source
    }

    /// Load the newest candidate file and install it. On failure the
    /// previously active document stays in effect untouched.
    pub fn reload(&self) -> Result<()> {
        let doc = self.source.load()?;
        self.engine.replace(doc);
        Ok(())
    }

    /// Start the live watch. `on_reloaded` fires only after a debounced
    /// reload completes successfully; a failed reload keeps the previous
    /// document and is logged, not surfaced.
    pub fn watch_with<F>(&mut self, on_reloaded: F) -> Result<()>
    where
        F: Fn() + Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        let reader = ScheduleSource::new(self.source.folder().to_path_buf());
        self.source.watch(move || match reader.load() {
            Ok(doc) => {
                engine.replace(doc);
                info!("schedule reloaded");
                on_reloaded();
            }
            Err(error) => {
                warn!(error = %error, "schedule reload failed, keeping previous document");
            }
        })
    }

    /// Stop the live watch. Idempotent.
    pub fn stop_watching(&mut self) {
        self.source.stop_watching();
    }
}
