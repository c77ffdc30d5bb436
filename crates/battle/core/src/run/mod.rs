//! Run-level planning and bookkeeping.
//!
//! A run is one full attempt at a stage, dungeon or infinite tower. The
//! runtime orchestrator drives the phases; [`RunTracker`] owns everything it
//! folds along the way (statistics, objectives, encounter count) and turns it
//! into a [`RunResult`] for the reward collaborator.

mod catalog;
mod objective;
mod plan;
mod stats;

pub use catalog::{MonsterCatalog, MonsterOracle, MonsterTemplate};
pub use objective::{Objective, ObjectiveKind};
pub use plan::{
    DungeonPlan, EncounterSize, EncounterSpec, FloorSpec, InfinitePlan, RunPlan, StagePlan, WaveSpec,
};
pub use stats::RunStatistics;

use crate::engine::TickReport;
use crate::error::ConfigError;
use crate::state::{BattleOutcome, BattleState};

/// Orchestrator state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum RunPhase {
    #[default]
    Initializing,
    SpawnEncounter,
    RunningBattle,
    Victory,
    Defeat,
    RunComplete,
}

/// Why a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "reason", content = "detail", rename_all = "snake_case"))]
pub enum RunEnd {
    /// Every encounter of the plan was won.
    Cleared,
    /// The player fell.
    Defeated,
    /// The host cancelled the run.
    Cancelled,
    /// Content could not produce an encounter.
    InvalidConfiguration(ConfigError),
}

impl RunEnd {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Cleared)
    }
}

/// Terminal result handed to the reward collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    pub plan: String,
    pub success: bool,
    pub end: RunEnd,
    pub statistics: RunStatistics,
    pub objectives: Vec<Objective>,
    /// Encounters started, including the one that ended the run.
    pub encounters: u32,
}

/// Folds sessions into run-level state.
#[derive(Clone, Debug)]
pub struct RunTracker {
    plan: String,
    phase: RunPhase,
    statistics: RunStatistics,
    objectives: Vec<Objective>,
    encounters: u32,
}

impl RunTracker {
    pub fn new(plan: impl Into<String>, objectives: Vec<Objective>) -> Self {
        Self {
            plan: plan.into(),
            phase: RunPhase::Initializing,
            statistics: RunStatistics::default(),
            objectives,
            encounters: 0,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn encounters(&self) -> u32 {
        self.encounters
    }

    fn transition(&mut self, next: RunPhase) {
        tracing::debug!(
            target: "battle::run",
            plan = %self.plan,
            from = %self.phase,
            to = %next,
            "Run phase transition"
        );
        self.phase = next;
    }

    /// Enters `SpawnEncounter` for the next encounter.
    pub fn spawn_next(&mut self) {
        self.transition(RunPhase::SpawnEncounter);
    }

    /// Enters `RunningBattle`.
    pub fn begin_encounter(&mut self) {
        self.encounters += 1;
        self.transition(RunPhase::RunningBattle);
    }

    /// Folds every action and log entry of one tick.
    pub fn record_tick(&mut self, report: &TickReport) {
        for action in &report.actions {
            self.statistics.record_action(action);
            for objective in &mut self.objectives {
                objective.record_action(action);
            }
        }
        for entry in &report.entries {
            self.statistics.record_entry(entry);
            for objective in &mut self.objectives {
                objective.record_entry(entry);
            }
        }
    }

    /// Records the final snapshot of an encounter and moves to `Victory` or
    /// `Defeat`. An unfinished battle leaves the phase unchanged.
    pub fn finish_encounter(&mut self, state: &BattleState) -> RunPhase {
        self.statistics.finish_encounter(state);
        match state.outcome {
            BattleOutcome::Victory => self.transition(RunPhase::Victory),
            BattleOutcome::Defeat => self.transition(RunPhase::Defeat),
            BattleOutcome::Active => {}
        }
        self.phase
    }

    /// Completes the run.
    pub fn complete(mut self, end: RunEnd) -> RunResult {
        self.transition(RunPhase::RunComplete);
        tracing::info!(
            target: "battle::run",
            plan = %self.plan,
            success = end.is_success(),
            encounters = self.encounters,
            monsters_defeated = self.statistics.monsters_defeated,
            "Run complete"
        );
        RunResult {
            plan: self.plan,
            success: end.is_success(),
            end,
            statistics: self.statistics,
            objectives: self.objectives,
            encounters: self.encounters,
        }
    }
}
