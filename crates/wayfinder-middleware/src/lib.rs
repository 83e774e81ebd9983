//! `wayfinder-middleware` – event routing between the navigation session and
//! whoever observes it (CLI, logs, tests).
//!
//! - [`bus`] – topic-based publish/subscribe bus on Tokio broadcast channels.

pub mod bus;

pub use bus::{EventBus, Topic, TopicReceiver};
