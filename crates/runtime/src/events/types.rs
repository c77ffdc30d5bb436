//! Event types for different topics.

use battle_core::{BattleOutcome, BattleSpeed, RunResult};
use serde::{Deserialize, Serialize};

/// Run-level lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    /// A new encounter was spawned and its session is starting.
    EncounterStarted {
        index: u32,
        label: String,
        /// Enemy display names in slot order.
        enemies: Vec<String>,
    },

    /// The active session reached a terminal outcome.
    EncounterFinished { index: u32, outcome: BattleOutcome },

    SpeedChanged { speed: BattleSpeed },

    Paused,

    Resumed,

    /// Final result; published once, after the last encounter.
    Completed(Box<RunResult>),
}
