//! Topic-based event bus implementation.

use std::sync::Arc;

use game_core::{TickEvent, WorldSnapshot};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::SessionEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Session start, finish and cancellation
    Session,
    /// Pursuer state transitions
    Pursuer,
    /// Leaps, hides, catch and escape
    Player,
    /// Item pickups and goal unlock
    Items,
    /// One world snapshot per tick, for renderers
    Frame,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Session,
        Topic::Pursuer,
        Topic::Player,
        Topic::Items,
        Topic::Frame,
    ];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Session(SessionEvent),

    /// A simulation event stamped with the tick that produced it.
    Tick { tick: u64, event: TickEvent },

    Frame(WorldSnapshot),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Session(_) => Topic::Session,
            Event::Frame(_) => Topic::Frame,
            Event::Tick { event, .. } => match event {
                TickEvent::PursuerModeChanged(_) => Topic::Pursuer,
                TickEvent::ItemCollected { .. } | TickEvent::GoalUnlocked => Topic::Items,
                TickEvent::LeapStarted
                | TickEvent::HideStarted
                | TickEvent::HideEnded
                | TickEvent::PlayerCaught
                | TickEvent::PlayerEscaped => Topic::Player,
            },
        }
    }
}

struct Channels {
    session: broadcast::Sender<Event>,
    pursuer: broadcast::Sender<Event>,
    player: broadcast::Sender<Event>,
    items: broadcast::Sender<Event>,
    frame: broadcast::Sender<Event>,
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; slow subscribers lag.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                session: broadcast::channel(capacity).0,
                pursuer: broadcast::channel(capacity).0,
                player: broadcast::channel(capacity).0,
                items: broadcast::channel(capacity).0,
                frame: broadcast::channel(capacity).0,
            }),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Session => &self.channels.session,
            Topic::Pursuer => &self.channels.pursuer,
            Topic::Player => &self.channels.player,
            Topic::Items => &self.channels.items,
            Topic::Frame => &self.channels.frame,
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
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
