//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use battle_core::{BattleAction, BattleLogEntry, BattleState};

use super::types::RunEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Resolved attacks, one event per action (drives animation)
    Action,
    /// Battle log entries in sequence order
    Log,
    /// Full battle snapshots after each committed change
    State,
    /// Encounter and run lifecycle
    Run,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Action(BattleAction),
    Log(BattleLogEntry),
    State(Box<BattleState>),
    Run(RunEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Action(_) => Topic::Action,
            Event::Log(_) => Topic::Log,
            Event::State(_) => Topic::State,
            Event::Run(_) => Topic::Run,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Delivery is best-effort: slow subscribers lag
/// and publishing never blocks the battle loop.
#[derive(Clone)]
pub struct EventBus {
    action: broadcast::Sender<Event>,
    log: broadcast::Sender<Event>,
    state: broadcast::Sender<Event>,
    run: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            action: broadcast::channel(capacity).0,
            log: broadcast::channel(capacity).0,
            state: broadcast::channel(capacity).0,
            run: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Action => &self.action,
            Topic::Log => &self.log,
            Topic::State => &self.state,
            Topic::Run => &self.run,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics.iter().map(|&topic| (topic, self.subscribe(topic))).collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_route_to_their_topic_only() {
        let bus = EventBus::with_capacity(8);
        let mut run_rx = bus.subscribe(Topic::Run);
        let mut log_rx = bus.subscribe(Topic::Log);

        bus.publish(Event::Run(RunEvent::Paused));

        assert!(matches!(run_rx.recv().await, Ok(Event::Run(RunEvent::Paused))));
        assert!(log_rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(Event::Run(RunEvent::Resumed));
        assert_eq!(bus.subscribe_multiple(&[Topic::Action, Topic::State]).len(), 2);
    }
}
