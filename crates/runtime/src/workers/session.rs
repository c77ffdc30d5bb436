//! One paced battle: the loop between a fresh encounter and its outcome.

use battle_core::{BattleEngine, BattleRng, BattleState, Cadence, CombatTables, TickReport};

use crate::pacing::{Pacer, WaitOutcome};

use super::Publisher;

/// How a session ended.
#[derive(Debug)]
pub(crate) enum SessionEnd {
    /// Victory or defeat; the state carries the outcome.
    Finished(BattleState),
    /// Cancelled; the state is the last published snapshot.
    Cancelled(BattleState),
}

pub(crate) struct BattleSession<'a> {
    engine: BattleEngine<'a>,
    cadence: &'a Cadence,
    publisher: &'a Publisher,
}

impl<'a> BattleSession<'a> {
    pub(crate) fn new(tables: &'a CombatTables, cadence: &'a Cadence, publisher: &'a Publisher) -> Self {
        Self {
            engine: BattleEngine::new(tables, cadence),
            cadence,
            publisher,
        }
    }

    /// Runs `state` to completion or cancellation.
    ///
    /// Each tick is resolved against a copy of the RNG and committed only if
    /// the token is still clear, so a cancelled run never publishes or keeps
    /// a partially applied tick.
    pub(crate) async fn run(
        &self,
        state: BattleState,
        pacer: &mut Pacer,
        rng: &mut BattleRng,
        mut on_tick: impl FnMut(&TickReport),
    ) -> SessionEnd {
        let mut state = self.engine.start(state);
        state.speed = pacer.speed();
        state.paused = pacer.paused();
        if !self.publisher.commit_state(&state, pacer.cancel_token()) {
            return SessionEnd::Cancelled(state);
        }

        loop {
            if state.is_over() {
                return SessionEnd::Finished(state);
            }
            if pacer.cancel_token().is_cancelled() {
                return SessionEnd::Cancelled(state);
            }

            let wait = self.cadence.next_wait(&state, pacer.speed());
            if pacer.wait(wait).await == WaitOutcome::Cancelled {
                return SessionEnd::Cancelled(state);
            }

            let mut draw = rng.clone();
            let mut report = self.engine.advance(&state, &mut draw);
            report.state.speed = pacer.speed();
            report.state.paused = pacer.paused();
            if !self.publisher.commit_report(&report, pacer.cancel_token()) {
                tracing::debug!(target: "battle::session", tick = report.tick, "Discarding tick resolved after cancellation");
                return SessionEnd::Cancelled(state);
            }

            *rng = draw;
            tracing::trace!(
                target: "battle::session",
                tick = report.tick,
                role = ?report.role,
                actions = report.actions.len(),
                "Tick committed"
            );
            on_tick(&report);
            state = report.state;
        }
    }
}
