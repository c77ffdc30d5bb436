//! Battle log: the ordered, append-only record consumed by UI and sound layers.
//!
//! Entries are observability only. Combat logic never reads them back; the
//! run tracker folds them into statistics after the fact.

use crate::combat::BattleAction;

use super::{CombatantId, SpecialAbility};

/// Coarse category of a log entry.
///
/// Sound and animation collaborators map these tags to effects; the engine
/// does not care whether they succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum LogKind {
    Start,
    Attack,
    Critical,
    Miss,
    Heal,
    Status,
    Skip,
    EnemyDefeated,
    Victory,
    Defeat,
    Gold,
    Item,
}

/// Structured payload of a log entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum LogEvent {
    BattleStarted {
        combatants: Vec<CombatantId>,
    },
    Action {
        action: BattleAction,
    },
    /// A frozen combatant lost its turn.
    Skipped {
        combatant: CombatantId,
    },
    /// A status ability landed on `target`.
    StatusApplied {
        target: CombatantId,
        ability: SpecialAbility,
    },
    PoisonTick {
        target: CombatantId,
        damage: u32,
    },
    Healed {
        target: CombatantId,
        amount: u32,
    },
    EnemyDefeated {
        enemy: CombatantId,
        template: Option<String>,
        #[cfg_attr(feature = "serde", serde(default))]
        boss: bool,
    },
    GoldFound {
        source: CombatantId,
        amount: u32,
    },
    ItemFound {
        source: CombatantId,
        item: String,
    },
    Victory,
    Defeat,
}

impl LogEvent {
    pub fn kind(&self) -> LogKind {
        match self {
            Self::BattleStarted { .. } => LogKind::Start,
            Self::Action { action } if action.missed => LogKind::Miss,
            Self::Action { action } if action.critical => LogKind::Critical,
            Self::Action { .. } => LogKind::Attack,
            Self::Skipped { .. } => LogKind::Skip,
            Self::StatusApplied { .. } | Self::PoisonTick { .. } => LogKind::Status,
            Self::Healed { .. } => LogKind::Heal,
            Self::EnemyDefeated { .. } => LogKind::EnemyDefeated,
            Self::GoldFound { .. } => LogKind::Gold,
            Self::ItemFound { .. } => LogKind::Item,
            Self::Victory => LogKind::Victory,
            Self::Defeat => LogKind::Defeat,
        }
    }

    /// The resolved attack carried by this entry, if any.
    pub fn action(&self) -> Option<&BattleAction> {
        match self {
            Self::Action { action } => Some(action),
            _ => None,
        }
    }
}

/// One record in the battle log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleLogEntry {
    /// Strictly increasing sequence number within the encounter.
    pub seq: u64,
    /// Tick that produced the entry (0 for the start entry).
    pub tick: u64,
    /// Battle clock at 1x speed, in milliseconds.
    pub clock_ms: u64,
    pub kind: LogKind,
    pub event: LogEvent,
    pub message: String,
}
