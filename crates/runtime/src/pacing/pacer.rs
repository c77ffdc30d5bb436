//! Pausable, speed-aware waits between ticks.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep};

use battle_core::BattleSpeed;

use super::cancel::CancelToken;
use crate::events::RunEvent;
use crate::workers::Publisher;

/// Control requests sent from a [`crate::RunHandle`].
pub(crate) enum Control {
    SetSpeed {
        speed: BattleSpeed,
        reply: oneshot::Sender<()>,
    },
    Pause {
        reply: oneshot::Sender<()>,
    },
    Resume {
        reply: oneshot::Sender<()>,
    },
}

/// How a wait ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WaitOutcome {
    Elapsed,
    Cancelled,
}

/// Owns the speed multiplier and pause flag of a run.
///
/// Controls are only observed while waiting, which is the only suspension
/// point of a run. A speed change applies from the next wait on; pausing
/// keeps the remainder of the current wait.
pub(crate) struct Pacer {
    controls: mpsc::Receiver<Control>,
    controls_open: bool,
    cancel: CancelToken,
    publisher: Publisher,
    speed: BattleSpeed,
    paused: bool,
}

impl Pacer {
    pub(crate) fn new(
        controls: mpsc::Receiver<Control>,
        cancel: CancelToken,
        publisher: Publisher,
        speed: BattleSpeed,
    ) -> Self {
        Self {
            controls,
            controls_open: true,
            cancel,
            publisher,
            speed,
            paused: false,
        }
    }

    pub(crate) fn speed(&self) -> BattleSpeed {
        self.speed
    }

    pub(crate) fn paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Waits for `duration` of unpaused time, or until cancelled.
    pub(crate) async fn wait(&mut self, duration: Duration) -> WaitOutcome {
        let mut remaining = duration;
        loop {
            if self.cancel.is_cancelled() {
                return WaitOutcome::Cancelled;
            }

            if self.paused {
                if !self.controls_open {
                    tracing::warn!(target: "battle::pacing", "All run handles dropped while paused; resuming");
                    self.set_paused(false);
                    continue;
                }
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return WaitOutcome::Cancelled,
                    control = self.controls.recv() => self.handle(control),
                }
                continue;
            }

            let started = Instant::now();
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return WaitOutcome::Cancelled,
                control = self.controls.recv(), if self.controls_open => {
                    remaining = remaining.saturating_sub(started.elapsed());
                    self.handle(control);
                }
                _ = sleep(remaining) => return WaitOutcome::Elapsed,
            }
        }
    }

    fn handle(&mut self, control: Option<Control>) {
        match control {
            Some(Control::SetSpeed { speed, reply }) => {
                if speed != self.speed {
                    tracing::debug!(target: "battle::pacing", from = ?self.speed, to = ?speed, "Speed changed");
                    self.speed = speed;
                    self.publisher.update_pace(self.speed, self.paused);
                    self.publisher.publish_run(RunEvent::SpeedChanged { speed });
                }
                let _ = reply.send(());
            }
            Some(Control::Pause { reply }) => {
                self.set_paused(true);
                let _ = reply.send(());
            }
            Some(Control::Resume { reply }) => {
                self.set_paused(false);
                let _ = reply.send(());
            }
            None => {
                tracing::debug!(target: "battle::pacing", "Control channel closed");
                self.controls_open = false;
            }
        }
    }

    fn set_paused(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        self.publisher.update_pace(self.speed, paused);
        self.publisher
            .publish_run(if paused { RunEvent::Paused } else { RunEvent::Resumed });
    }
}
