//! Topic-based event bus for runtime events.
//!
//! Sessions publish every committed tick as actions, log entries and a full
//! snapshot; the orchestrator publishes run lifecycle events. Consumers
//! subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::RunEvent;
