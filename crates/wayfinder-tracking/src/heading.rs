//! Wrong-direction detection.
//!
//! The device compass heading is compared with the bearing of the current
//! route segment.  A deviation above the threshold raises an alert, at most
//! once per cooldown.  Checks run on a fixed period; calls in between are
//! ignored.  Nothing here touches progress state.

use std::time::{Duration, Instant};

use tracing::debug;
use wayfinder_types::LocalPoint;

pub const DEFAULT_HEADING_THRESHOLD_DEG: f32 = 120.0;
pub const DEFAULT_HEADING_COOLDOWN: Duration = Duration::from_secs(1);
pub const DEFAULT_HEADING_PERIOD: Duration = Duration::from_millis(500);

/// Bearing of the segment `from → to` in degrees `[0, 360)`, `0` along the
/// overlay's forward axis (−z), increasing clockwise (+x is `90`).
///
/// `None` for a zero-length segment.
pub fn segment_bearing(from: LocalPoint, to: LocalPoint) -> Option<f32> {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    if dx == 0.0 && dz == 0.0 {
        return None;
    }
    Some(dx.atan2(-dz).to_degrees().rem_euclid(360.0))
}

/// Smallest absolute angle between two headings, in `[0, 180]`.
pub fn angular_difference(a_deg: f32, b_deg: f32) -> f32 {
    let d = (a_deg - b_deg).rem_euclid(360.0);
    if d > 180.0 { 360.0 - d } else { d }
}

/// Periodic heading check with an alert cooldown.
#[derive(Debug, Clone)]
pub struct HeadingMonitor {
    threshold_deg: f32,
    cooldown: Duration,
    period: Duration,
    last_check: Option<Instant>,
    last_alert: Option<Instant>,
}

impl HeadingMonitor {
    pub fn new(threshold_deg: f32, cooldown: Duration, period: Duration) -> Self {
        Self {
            threshold_deg,
            cooldown,
            period,
            last_check: None,
            last_alert: None,
        }
    }

    /// Compare `heading_deg` with `expected_deg` at `now`.
    ///
    /// Returns the deviation when an alert should fire.  `None` when either
    /// angle is not finite, the check is not due yet, the deviation is within
    /// the threshold, or the last alert is younger than the cooldown.
    pub fn check(&mut self, heading_deg: f32, expected_deg: f32, now: Instant) -> Option<f32> {
        if !heading_deg.is_finite() || !expected_deg.is_finite() {
            return None;
        }
        if let Some(last) = self.last_check
            && now.saturating_duration_since(last) < self.period
        {
            return None;
        }
        self.last_check = Some(now);

        let deviation = angular_difference(heading_deg, expected_deg);
        if deviation <= self.threshold_deg {
            return None;
        }
        let cooled = self
            .last_alert
            .is_none_or(|last| now.saturating_duration_since(last) >= self.cooldown);
        if !cooled {
            return None;
        }
        debug!(deviation, "wrong direction");
        self.last_alert = Some(now);
        Some(deviation)
    }
}

impl Default for HeadingMonitor {
    fn default() -> Self {
        Self::new(
            DEFAULT_HEADING_THRESHOLD_DEG,
            DEFAULT_HEADING_COOLDOWN,
            DEFAULT_HEADING_PERIOD,
        )
    }
}
