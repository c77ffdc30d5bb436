//! Background pieces driven by the orchestrator task.

mod publisher;
mod session;

pub(crate) use publisher::Publisher;
pub(crate) use session::{BattleSession, SessionEnd};
