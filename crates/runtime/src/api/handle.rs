//! Cloneable façade for observing and steering a run.
//!
//! [`RunHandle`] hides channel plumbing and offers async helpers for pacing
//! control, snapshot queries and callback-style observation.
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use battle_core::{BattleAction, BattleSpeed, BattleState};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, RunEvent, Topic};
use crate::pacing::{CancelToken, Control};

/// Client-facing handle to interact with a run
#[derive(Clone)]
pub struct RunHandle {
    control_tx: mpsc::Sender<Control>,
    event_bus: EventBus,
    state_rx: watch::Receiver<Option<BattleState>>,
    cancel: CancelToken,
}

impl RunHandle {
    pub(crate) fn new(
        control_tx: mpsc::Sender<Control>,
        event_bus: EventBus,
        state_rx: watch::Receiver<Option<BattleState>>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            control_tx,
            event_bus,
            state_rx,
            cancel,
        }
    }

    /// Latest published snapshot, or `None` before the first encounter.
    pub fn get_state(&self) -> Option<BattleState> {
        self.state_rx.borrow().clone()
    }

    /// Watch receiver over published snapshots.
    pub fn watch_state(&self) -> watch::Receiver<Option<BattleState>> {
        self.state_rx.clone()
    }

    /// Changes the speed multiplier (1, 2 or 3).
    ///
    /// The wait already in progress keeps its duration; the next one uses
    /// the new speed.
    pub async fn set_speed(&self, speed: u8) -> Result<()> {
        let speed = BattleSpeed::try_from(speed)?;
        self.request(|reply| Control::SetSpeed { speed, reply }).await
    }

    /// Suspends tick resolution. Idempotent.
    pub async fn pause(&self) -> Result<()> {
        self.request(|reply| Control::Pause { reply }).await
    }

    /// Resumes a paused run, keeping the remainder of the interrupted wait.
    pub async fn resume(&self) -> Result<()> {
        self.request(|reply| Control::Resume { reply }).await
    }

    /// Stops the run at the next suspension point. No further snapshot is
    /// committed after this returns.
    pub fn cancel(&self) {
        self.cancel.cancel();
        // Waits out a commit that read the token before it was set.
        drop(self.state_rx.borrow());
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    async fn request(&self, make: impl FnOnce(oneshot::Sender<()>) -> Control) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.control_tx
            .send(make(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Action` - One event per resolved attack
    /// - `Topic::Log` - Battle log entries in sequence order
    /// - `Topic::State` - Snapshots after each committed change
    /// - `Topic::Run` - Encounter, pacing and completion events
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Calls `callback` for every resolved attack, in order.
    ///
    /// The task ends when the run completes or the bus closes.
    pub fn on_action<F>(&self, mut callback: F) -> JoinHandle<()>
    where
        F: FnMut(BattleAction) + Send + 'static,
    {
        let mut actions = self.subscribe(Topic::Action);
        let mut run = self.subscribe(Topic::Run);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    event = actions.recv() => match event {
                        Ok(Event::Action(action)) => callback(action),
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(target: "battle::handle", skipped, "Action observer lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    event = run.recv() => match event {
                        Ok(Event::Run(RunEvent::Completed(_)))
                        | Err(broadcast::error::RecvError::Closed) => {
                            while let Ok(event) = actions.try_recv() {
                                if let Event::Action(action) = event {
                                    callback(action);
                                }
                            }
                            break;
                        }
                        _ => {}
                    },
                }
            }
        })
    }

    /// Calls `callback` with every newly published snapshot.
    ///
    /// Snapshots are coalesced: a slow callback sees the latest state, not
    /// every intermediate one.
    pub fn on_state_change<F>(&self, mut callback: F) -> JoinHandle<()>
    where
        F: FnMut(BattleState) + Send + 'static,
    {
        let mut state_rx = self.state_rx.clone();
        tokio::spawn(async move {
            while state_rx.changed().await.is_ok() {
                let snapshot = state_rx.borrow_and_update().clone();
                if let Some(state) = snapshot {
                    callback(state);
                }
            }
        })
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
