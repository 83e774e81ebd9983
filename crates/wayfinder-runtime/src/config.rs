//! [`EngineConfig`] – tunables of a navigation session.

use std::time::Duration;

use wayfinder_guidance::Language;
use wayfinder_tracking::heading::{
    DEFAULT_HEADING_COOLDOWN, DEFAULT_HEADING_PERIOD, DEFAULT_HEADING_THRESHOLD_DEG,
};
use wayfinder_tracking::step::{DEFAULT_STEP_THRESHOLD, MIN_REFRACTORY};

/// Metres credited per detected step.
pub const DEFAULT_STEP_LENGTH_M: f32 = 0.7;

/// Metres per graph hop when estimating a route's total distance.
pub const DEFAULT_HOP_DISTANCE_M: f32 = 5.0;

/// Configuration bundle for [`NavigationSession`](crate::session::NavigationSession).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub step_length_m: f32,
    /// Acceleration magnitude (m/s², gravity included) that counts as a step.
    pub step_threshold: f32,
    /// Minimum gap between two detected steps; never below 600 ms.
    pub step_refractory: Duration,
    pub heading_threshold_deg: f32,
    pub heading_cooldown: Duration,
    pub heading_period: Duration,
    pub hop_distance_m: f32,
    pub language: Language,
    pub voice_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_length_m: DEFAULT_STEP_LENGTH_M,
            step_threshold: DEFAULT_STEP_THRESHOLD,
            step_refractory: MIN_REFRACTORY,
            heading_threshold_deg: DEFAULT_HEADING_THRESHOLD_DEG,
            heading_cooldown: DEFAULT_HEADING_COOLDOWN,
            heading_period: DEFAULT_HEADING_PERIOD,
            hop_distance_m: DEFAULT_HOP_DISTANCE_M,
            language: Language::default(),
            voice_enabled: true,
        }
    }
}
