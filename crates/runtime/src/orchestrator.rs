//! Run orchestration: encounters in sequence until clear, defeat or cancel.
//!
//! [`RunOrchestrator`] owns the run task and wires up the control channel,
//! event bus and state watch. [`RunHandle`] provides the cloneable façade
//! hosts use to observe and steer the run.

use std::sync::Arc;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use battle_core::{
    BattleOutcome, BattleRng, BattleSpeed, BattleState, Cadence, Combatant, CombatTables,
    ConfigError, MonsterOracle, Objective, RunEnd, RunPlan, RunResult, RunTracker,
    seeded_rng,
};

use crate::api::{Result, RunHandle, RunResultSink, RuntimeError};
use crate::events::{EventBus, RunEvent};
use crate::pacing::{CancelToken, Pacer, WaitOutcome};
use crate::workers::{BattleSession, Publisher, SessionEnd};

/// Runtime configuration shared by the orchestrator and its session.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    pub cadence: Cadence,
    /// Pause between encounters at 1x speed.
    pub transition_delay_ms: u64,
    pub initial_speed: BattleSpeed,
    /// Seed for every random draw of the run; `None` picks one at start.
    pub seed: Option<u64>,
    /// Carry the player's health from one encounter to the next instead of
    /// restoring it.
    pub carry_player_health: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 256,
            command_buffer_size: 32,
            cadence: Cadence::default(),
            transition_delay_ms: 1_500,
            initial_speed: BattleSpeed::Normal,
            seed: None,
            carry_player_health: true,
        }
    }
}

/// A started run.
///
/// Dropping it does not stop the run; use [`RunHandle::cancel`].
pub struct RunOrchestrator {
    handle: RunHandle,
    task: JoinHandle<RunResult>,
}

impl RunOrchestrator {
    /// Create a new run builder
    pub fn builder() -> RunBuilder {
        RunBuilder::new()
    }

    /// Get a cloneable handle to this run
    pub fn handle(&self) -> RunHandle {
        self.handle.clone()
    }

    /// Waits for the run to finish and returns its result.
    pub async fn join(self) -> Result<RunResult> {
        self.task.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`RunOrchestrator`].
pub struct RunBuilder {
    config: RuntimeConfig,
    tables: CombatTables,
    catalog: Option<Arc<dyn MonsterOracle>>,
    plan: Option<RunPlan>,
    objectives: Vec<Objective>,
    player: Option<Combatant>,
    sink: Option<Arc<dyn RunResultSink>>,
}

impl RunBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            tables: CombatTables::default(),
            catalog: None,
            plan: None,
            objectives: Vec::new(),
            player: None,
            sink: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override combat probabilities and multipliers
    pub fn tables(mut self, tables: CombatTables) -> Self {
        self.tables = tables;
        self
    }

    /// Set the required monster catalog
    pub fn catalog(mut self, catalog: Arc<dyn MonsterOracle>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Set the required run plan
    pub fn plan(mut self, plan: RunPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    pub fn objectives(mut self, objectives: Vec<Objective>) -> Self {
        self.objectives = objectives;
        self
    }

    /// Set the required player combatant
    pub fn player(mut self, player: Combatant) -> Self {
        self.player = Some(player);
        self
    }

    /// Set the reward collaborator that receives the final result (optional)
    pub fn result_sink(mut self, sink: Arc<dyn RunResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Spawns the run on the current tokio runtime.
    pub fn build(self) -> Result<RunOrchestrator> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;
        let plan = self.plan.ok_or(RuntimeError::MissingPlan)?;
        let player = self.player.ok_or(RuntimeError::MissingPlayer)?;

        let bus = EventBus::with_capacity(self.config.event_buffer_size);
        let (control_tx, control_rx) = mpsc::channel(self.config.command_buffer_size.max(1));
        let (publisher, state_rx) = Publisher::new(bus.clone());
        let cancel = CancelToken::new();

        let seed = self.config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
        tracing::info!(target: "battle::run", plan = %plan.id(), kind = plan.kind(), seed, "Starting run");

        let pacer = Pacer::new(control_rx, cancel.clone(), publisher.clone(), self.config.initial_speed);
        let run = Run {
            config: self.config,
            tables: self.tables,
            catalog,
            plan,
            player,
            publisher,
            sink: self.sink,
            rng: seeded_rng(seed),
        };
        let objectives = self.objectives;
        let task = tokio::spawn(async move { run.drive(pacer, objectives).await });

        Ok(RunOrchestrator {
            handle: RunHandle::new(control_tx, bus, state_rx, cancel),
            task,
        })
    }
}

/// State owned by the run task.
struct Run {
    config: RuntimeConfig,
    tables: CombatTables,
    catalog: Arc<dyn MonsterOracle>,
    plan: RunPlan,
    player: Combatant,
    publisher: Publisher,
    sink: Option<Arc<dyn RunResultSink>>,
    rng: BattleRng,
}

impl Run {
    async fn drive(mut self, mut pacer: Pacer, objectives: Vec<Objective>) -> RunResult {
        let mut tracker = RunTracker::new(self.plan.id(), objectives);
        let end = self.encounters(&mut pacer, &mut tracker).await;

        let result = tracker.complete(end);
        self.publisher
            .publish_run(RunEvent::Completed(Box::new(result.clone())));
        if let Some(sink) = &self.sink {
            if let Err(error) = sink.deliver(&result).await {
                tracing::warn!(target: "battle::run", plan = %result.plan, %error, "Result sink failed");
            }
        }
        result
    }

    async fn encounters(&mut self, pacer: &mut Pacer, tracker: &mut RunTracker) -> RunEnd {
        if let Err(error) = self.plan.validate(self.catalog.as_ref()) {
            tracing::warn!(target: "battle::run", plan = %self.plan.id(), %error, "Run plan rejected");
            return RunEnd::InvalidConfiguration(error);
        }

        let mut player = self.player.clone();
        let mut index = 0;
        loop {
            if pacer.cancel_token().is_cancelled() {
                return RunEnd::Cancelled;
            }
            tracker.spawn_next();
            let state = match self.spawn(index, player.clone()) {
                Ok(Some(state)) => {
                    tracker.begin_encounter();
                    state
                }
                Ok(None) => return RunEnd::Cleared,
                Err(error) => {
                    tracing::warn!(target: "battle::run", plan = %self.plan.id(), index, %error, "Encounter could not be spawned");
                    return RunEnd::InvalidConfiguration(error);
                }
            };

            let session = BattleSession::new(&self.tables, &self.config.cadence, &self.publisher);
            let end = session
                .run(state, pacer, &mut self.rng, |report| tracker.record_tick(report))
                .await;

            let state = match end {
                SessionEnd::Finished(state) => state,
                SessionEnd::Cancelled(state) => {
                    tracker.finish_encounter(&state);
                    return RunEnd::Cancelled;
                }
            };

            tracker.finish_encounter(&state);
            self.publisher.publish_run(RunEvent::EncounterFinished {
                index,
                outcome: state.outcome,
            });
            if state.outcome == BattleOutcome::Defeat {
                return RunEnd::Defeated;
            }

            index += 1;
            if self.plan.encounter_limit().is_some_and(|limit| index >= limit) {
                return RunEnd::Cleared;
            }

            player = state.player;
            player.clear_status();
            if !self.config.carry_player_health {
                player.set_health(player.max_health());
            }

            let delay = Cadence::transition_delay(self.config.transition_delay_ms, pacer.speed());
            if pacer.wait(delay).await == WaitOutcome::Cancelled {
                return RunEnd::Cancelled;
            }
        }
    }

    /// Builds the battle state for encounter `index`, or `None` past the
    /// end of the plan.
    fn spawn(
        &mut self,
        index: u32,
        player: Combatant,
    ) -> std::result::Result<Option<BattleState>, ConfigError> {
        let Some(spec) = self.plan.encounter(index, &mut self.rng) else {
            return Ok(None);
        };
        let enemies = spec.spawn(self.catalog.as_ref())?;
        let state = BattleState::new(player, enemies).map_err(|error| match error {
            ConfigError::InvalidEnemyCount { count, .. } => ConfigError::InvalidEnemyCount {
                plan: self.plan.id().to_string(),
                index,
                count,
            },
            other => other,
        })?;

        tracing::info!(
            target: "battle::run",
            plan = %self.plan.id(),
            index,
            label = %spec.label,
            enemies = state.enemies.len(),
            boss = spec.boss.as_deref().unwrap_or("-"),
            "Encounter spawned"
        );
        self.publisher.publish_run(RunEvent::EncounterStarted {
            index,
            label: spec.label.clone(),
            enemies: state.enemies.iter().map(|enemy| enemy.name.clone()).collect(),
        });
        Ok(Some(state))
    }
}
