//! Paced, cancellable runtime for the auto-battle engine.
//!
//! This crate wraps the pure rules of `battle-core` in tokio tasks: each tick
//! waits a speed-scaled interval, every committed snapshot is published, and
//! a run moves through its encounters until it is cleared, lost or
//! cancelled. Hosts embed [`RunOrchestrator`] to start a run and steer it
//! through [`RunHandle`].
//!
//! Modules are organized by responsibility:
//! - [`orchestrator`] hosts the run loop and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`pacing`] owns cancellation, pause/resume and speed control
//! - `workers` keeps the battle session and publisher internal to the crate
pub mod api;
pub mod events;
pub mod orchestrator;
pub mod pacing;

mod workers;

pub use api::{Result, RunHandle, RunResultSink, RuntimeError, TracingSink};
pub use events::{Event, EventBus, RunEvent, Topic};
pub use orchestrator::{RunBuilder, RunOrchestrator, RuntimeConfig};
pub use pacing::CancelToken;
