//! # nextblock core library
//!
//! Answers "what is happening right now, and what is next?" against a
//! weekly, day-keyed schedule of time blocks, and keeps that answer live
//! as the schedule file on disk changes.
//!
//! ## Architecture
//!
//! - **Engine**: pull-model queries (current/next block, display summary,
//!   rendered details) over an immutable document that reloads swap in
//!   wholesale
//! - **Source**: persistent-folder discovery plus a debounced,
//!   self-healing filesystem watch
//! - **Service**: the reload wiring between the two
//!
//! The engine is tick-driven: the host re-queries on its own cadence
//! (nominally once a second). Nothing here spawns timers on the host's
//! behalf; the only background thread is the watch worker.
//!
//! ## Key Components
//!
//! - [`Engine`]: schedule queries against the active document
//! - [`ScheduleDocument`]: one load generation of config + weekday block
//!   lists
//! - [`ScheduleSource`]: candidate-file discovery and the live watch
//! - [`ScheduleService`]: reload-on-change composition of the two

pub mod clock;
pub mod engine;
pub mod error;
pub mod schedule;
pub mod service;
pub mod source;
pub mod template;

pub use engine::{BlockDetails, Engine};
pub use error::{CoreError, Result};
pub use schedule::{Block, ScheduleConfig, ScheduleDocument};
pub use service::ScheduleService;
pub use source::ScheduleSource;
