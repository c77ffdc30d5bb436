//! Deterministic auto-battle rules shared by the runtime and offline tools.
//!
//! `battle-core` defines the canonical combat model (combatants, actions, log
//! entries), the pure attack resolver, turn cadence math, the per-tick battle
//! state machine, and run-level planning and bookkeeping. Nothing here
//! suspends or performs I/O; pacing and cancellation live in the runtime crate.
//! Every tick produces a fresh [`BattleState`] snapshot through
//! [`engine::BattleEngine`], so callers never alias mutable battle data.
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod rng;
pub mod run;
pub mod schedule;
pub mod state;

pub use combat::{AttackResolution, BattleAction, StatusDelta, resolve_attack};
pub use config::CombatTables;
pub use engine::{BattleEngine, TickReport};
pub use error::{ConfigError, InvalidSpeed};
pub use rng::{BattleRng, seeded_rng};
pub use run::{
    DungeonPlan, EncounterSize, EncounterSpec, FloorSpec, InfinitePlan, MonsterCatalog,
    MonsterOracle, MonsterTemplate, Objective, ObjectiveKind, RunEnd, RunPhase, RunPlan,
    RunResult, RunStatistics, RunTracker, StagePlan, WaveSpec,
};
pub use schedule::{Cadence, TickRole};
pub use state::{
    BattleLogEntry, BattleOutcome, BattleSpeed, BattleState, Bounty, Combatant, CombatantId,
    CombatantStats, LogEvent, LogKind, MAX_ENEMIES, SpecialAbility, StatusFlags,
};
