//! Topic-based publish/subscribe bus for navigation events.
//!
//! Uses [`tokio::sync::broadcast`] channels so that every subscriber receives
//! every message without a slow subscriber blocking the session.
//!
//! # Topics
//!
//! | Topic | Typical traffic |
//! |---|---|
//! | [`Topic::Progress`] | Route started, segment changes, arrival |
//! | [`Topic::Guidance`] | Relocalization results |
//! | [`Topic::Alerts`] | Wrong-direction warnings, shutdown requests |

use tokio::sync::broadcast;
use tracing::{trace, warn};
use wayfinder_types::{NavEvent, WayError};

/// Default channel capacity (number of buffered events before old ones are
/// dropped for slow subscribers).
const DEFAULT_CAPACITY: usize = 64;

/// Routing lanes on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Movement along the active route.
    Progress,
    /// Route re-planning after a position fix.
    Guidance,
    /// Things the traveler or operator must react to.
    Alerts,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Progress, Topic::Guidance, Topic::Alerts];
}

/// Shared event bus.  Clones share the same channels.
#[derive(Clone, Debug)]
pub struct EventBus {
    progress: broadcast::Sender<NavEvent>,
    guidance: broadcast::Sender<NavEvent>,
    alerts: broadcast::Sender<NavEvent>,
}

impl EventBus {
    /// Create a bus; `capacity` applies to every topic independently.
    pub fn new(capacity: usize) -> Self {
        let (progress, _) = broadcast::channel(capacity);
        let (guidance, _) = broadcast::channel(capacity);
        let (alerts, _) = broadcast::channel(capacity);
        Self {
            progress,
            guidance,
            alerts,
        }
    }

    /// Publish `event` on `topic`.
    ///
    /// Returns the number of receivers handed the event, or
    /// [`WayError::Channel`] when nobody is subscribed.
    pub fn publish_to(&self, topic: Topic, event: NavEvent) -> Result<usize, WayError> {
        self.topic_sender(topic)
            .send(event)
            .map_err(|_| WayError::Channel(format!("No subscribers for topic {topic:?}")))
    }

    /// Publish without caring whether anyone listens.
    ///
    /// The session reports through this: an unobserved event is normal.
    pub fn notify(&self, topic: Topic, event: NavEvent) {
        match self.publish_to(topic, event) {
            Ok(n) => trace!(?topic, receivers = n, "event published"),
            Err(_) => trace!(?topic, "event dropped; no subscribers"),
        }
    }

    /// Subscribe to one topic.
    pub fn subscribe_to(&self, topic: Topic) -> TopicReceiver {
        TopicReceiver {
            topic,
            receiver: self.topic_sender(topic).subscribe(),
        }
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.topic_sender(topic).receiver_count()
    }

    fn topic_sender(&self, topic: Topic) -> &broadcast::Sender<NavEvent> {
        match topic {
            Topic::Progress => &self.progress,
            Topic::Guidance => &self.guidance,
            Topic::Alerts => &self.alerts,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Topic receiver
// ---------------------------------------------------------------------------

/// An async receiver bound to a single [`Topic`].
pub struct TopicReceiver {
    topic: Topic,
    receiver: broadcast::Receiver<NavEvent>,
}

impl TopicReceiver {
    /// Wait for the next event on this topic.
    ///
    /// `Lagged(n)` means `n` events were dropped for this subscriber;
    /// `Closed` means every sender is gone.
    pub async fn recv(&mut self) -> Result<NavEvent, broadcast::error::RecvError> {
        self.receiver.recv().await
    }

    /// Like [`recv`](Self::recv) but skips over lag, returning `None` only
    /// once the bus is closed.
    pub async fn next(&mut self) -> Option<NavEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(topic = ?self.topic, lagged_by = n, "subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next event if one is already buffered.
    pub fn try_next(&mut self) -> Option<NavEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_types::NavPayload;

    fn make_event(segment: usize) -> NavEvent {
        NavEvent::new(
            "wayfinder-middleware::test",
            NavPayload::SegmentChanged {
                segment,
                instruction: None,
            },
        )
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() -> Result<(), Box<dyn std::error::Error>> {
        let bus = EventBus::default();
        let mut first = bus.subscribe_to(Topic::Progress);
        let mut second = bus.subscribe_to(Topic::Progress);

        let event = make_event(1);
        assert_eq!(bus.publish_to(Topic::Progress, event.clone())?, 2);

        assert_eq!(first.recv().await?.id, event.id);
        assert_eq!(second.recv().await?.id, event.id);
        Ok(())
    }

    #[test]
    fn publish_without_subscribers_is_a_channel_error() {
        let bus = EventBus::default();
        let result = bus.publish_to(Topic::Alerts, make_event(0));
        assert!(matches!(result, Err(WayError::Channel(_))));
        // notify swallows the same condition.
        bus.notify(Topic::Alerts, make_event(0));
    }

    #[tokio::test]
    async fn topics_are_isolated() -> Result<(), Box<dyn std::error::Error>> {
        let bus = EventBus::default();
        let mut alerts = bus.subscribe_to(Topic::Alerts);
        let _progress = bus.subscribe_to(Topic::Progress);

        bus.publish_to(Topic::Progress, make_event(2))?;

        let result = tokio::time::timeout(std::time::Duration::from_millis(50), alerts.recv()).await;
        assert!(result.is_err(), "alerts subscriber must not see progress events");
        Ok(())
    }

    #[tokio::test]
    async fn slow_subscriber_lags_then_resumes() {
        let bus = EventBus::new(4);
        let mut slow = bus.subscribe_to(Topic::Progress);
        for i in 0..20 {
            bus.notify(Topic::Progress, make_event(i));
        }
        assert!(matches!(slow.recv().await, Err(broadcast::error::RecvError::Lagged(_))));
        // After the lag report the newest buffered events are still there.
        let event = slow.next().await.unwrap();
        assert!(matches!(event.payload, NavPayload::SegmentChanged { segment: 16, .. }));
    }

    #[test]
    fn try_next_drains_buffer() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe_to(Topic::Guidance);
        assert!(rx.try_next().is_none());
        bus.notify(Topic::Guidance, make_event(3));
        assert!(rx.try_next().is_some());
        assert!(rx.try_next().is_none());
        assert_eq!(rx.topic(), Topic::Guidance);
        assert_eq!(bus.subscriber_count(Topic::Guidance), 1);
    }
}
