//! Error types surfaced by battle-core.
//!
//! Configuration problems abort encounter setup and are reported to the host
//! as a distinguishable run outcome. Invariant violations inside a running
//! battle are never errors: the engine clamps or ignores them and logs a
//! diagnostic instead.

use crate::state::MAX_ENEMIES;

/// Malformed or incomplete content that prevents an encounter from starting.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigError {
    #[error("monster template '{0}' not found in catalog")]
    UnknownMonster(String),

    #[error("run plan '{plan}' has an empty monster pool")]
    EmptyMonsterPool { plan: String },

    #[error("run plan '{plan}' defines no encounters")]
    NoEncounters { plan: String },

    #[error("encounter {index} of '{plan}' spawns {count} enemies (expected 1..={max})", max = MAX_ENEMIES)]
    InvalidEnemyCount { plan: String, index: u32, count: usize },

    #[error("run plan '{plan}' has a boss interval of zero")]
    ZeroBossInterval { plan: String },

    #[error("run plan '{plan}' schedules a boss encounter but names no boss")]
    MissingBoss { plan: String },

    #[error("player stats are invalid: {0}")]
    InvalidPlayer(String),
}

/// Speed multiplier outside the supported 1x/2x/3x range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("speed multiplier {0} is not supported (expected 1, 2 or 3)")]
pub struct InvalidSpeed(pub u8);
