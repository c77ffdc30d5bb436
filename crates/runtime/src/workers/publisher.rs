//! Fan-out of committed battle changes to the handle and the event bus.

use std::sync::Arc;

use tokio::sync::watch;

use battle_core::{BattleSpeed, BattleState, TickReport};

use crate::events::{Event, EventBus, RunEvent};
use crate::pacing::CancelToken;

/// Publishes snapshots through a watch channel (latest state for
/// `get_state`) and events through the bus (ordered delivery for observers).
#[derive(Clone)]
pub(crate) struct Publisher {
    state: Arc<watch::Sender<Option<BattleState>>>,
    bus: EventBus,
}

impl Publisher {
    pub(crate) fn new(bus: EventBus) -> (Self, watch::Receiver<Option<BattleState>>) {
        let (tx, rx) = watch::channel(None);
        (
            Self {
                state: Arc::new(tx),
                bus,
            },
            rx,
        )
    }

    /// Replaces the current snapshot unless `cancel` is set, then announces
    /// it. Returns whether the snapshot was committed.
    ///
    /// The token is read under the snapshot's write lock, and
    /// [`crate::RunHandle::cancel`] takes that lock after setting the token,
    /// so a snapshot is either written before `cancel` returns or not at all.
    pub(crate) fn commit_state(&self, state: &BattleState, cancel: &CancelToken) -> bool {
        let committed = self.state.send_if_modified(|current| {
            if cancel.is_cancelled() {
                return false;
            }
            *current = Some(state.clone());
            true
        });
        if committed {
            self.bus.publish(Event::State(Box::new(state.clone())));
        }
        committed
    }

    /// Commits the tick's snapshot, then announces actions, log entries in
    /// sequence order and the snapshot that contains them.
    pub(crate) fn commit_report(&self, report: &TickReport, cancel: &CancelToken) -> bool {
        let committed = self.state.send_if_modified(|current| {
            if cancel.is_cancelled() {
                return false;
            }
            *current = Some(report.state.clone());
            true
        });
        if !committed {
            return false;
        }
        for action in &report.actions {
            self.bus.publish(Event::Action(action.clone()));
        }
        for entry in &report.entries {
            self.bus.publish(Event::Log(entry.clone()));
        }
        self.bus.publish(Event::State(Box::new(report.state.clone())));
        true
    }

    /// Stamps pacing flags on the current snapshot without touching battle data.
    pub(crate) fn update_pace(&self, speed: BattleSpeed, paused: bool) {
        let mut snapshot = None;
        self.state.send_if_modified(|current| match current {
            Some(state) if state.speed != speed || state.paused != paused => {
                state.speed = speed;
                state.paused = paused;
                snapshot = Some(state.clone());
                true
            }
            _ => false,
        });
        if let Some(state) = snapshot {
            self.bus.publish(Event::State(Box::new(state)));
        }
    }

    pub(crate) fn publish_run(&self, event: RunEvent) {
        self.bus.publish(Event::Run(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Topic;
    use battle_core::{Combatant, CombatantStats};

    fn state() -> BattleState {
        BattleState::new(
            Combatant::player("Hero", CombatantStats::new(100, 10, 5)),
            [Combatant::player("Rat", CombatantStats::new(20, 4, 1))],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn pace_updates_only_touch_pacing_fields() {
        let bus = EventBus::new();
        let mut states = bus.subscribe(Topic::State);
        let (publisher, rx) = Publisher::new(bus);

        publisher.update_pace(BattleSpeed::Fast, true);
        assert!(rx.borrow().is_none());

        let original = state();
        assert!(publisher.commit_state(&original, &CancelToken::new()));
        publisher.update_pace(BattleSpeed::Fast, true);
        publisher.update_pace(BattleSpeed::Fast, true);

        let current = rx.borrow().clone().unwrap();
        assert_eq!(current.speed, BattleSpeed::Fast);
        assert!(current.paused);
        assert_eq!(current.player, original.player);
        assert_eq!(current.log, original.log);

        assert!(matches!(states.recv().await.unwrap(), Event::State(s) if !s.paused));
        assert!(matches!(states.recv().await.unwrap(), Event::State(s) if s.paused));
        assert!(states.try_recv().is_err());
    }

    #[tokio::test]
    async fn cancelled_token_blocks_commits() {
        let bus = EventBus::new();
        let mut states = bus.subscribe(Topic::State);
        let (publisher, rx) = Publisher::new(bus);
        let cancel = CancelToken::new();

        let first = state();
        assert!(publisher.commit_state(&first, &cancel));
        assert!(matches!(states.recv().await.unwrap(), Event::State(_)));

        cancel.cancel();
        let mut later = first.clone();
        later.tick = 7;
        assert!(!publisher.commit_state(&later, &cancel));

        assert_eq!(rx.borrow().as_ref().map(|s| s.tick), Some(first.tick));
        assert!(states.try_recv().is_err());
    }
}
