//! Step detection from raw accelerometer samples.
//!
//! A step is counted when the acceleration magnitude rises above the
//! threshold, provided the refractory period has passed since the last
//! counted step.  The magnitude must fall back below the threshold before
//! another step can be counted.

use std::time::{Duration, Instant};

use tracing::trace;

/// Shortest refractory period accepted; anything lower is raised to this.
pub const MIN_REFRACTORY: Duration = Duration::from_millis(600);

/// Magnitude (gravity included) that counts as a heel strike, in m/s².
pub const DEFAULT_STEP_THRESHOLD: f32 = 12.0;

/// One accelerometer reading in the device frame (m/s², gravity included).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Threshold crossing detector with a refractory period.
#[derive(Debug, Clone)]
pub struct StepDetector {
    threshold: f32,
    refractory: Duration,
    last_step: Option<Instant>,
    above: bool,
}

impl StepDetector {
    /// `refractory` below [`MIN_REFRACTORY`] is raised to it.
    pub fn new(threshold: f32, refractory: Duration) -> Self {
        Self {
            threshold,
            refractory: refractory.max(MIN_REFRACTORY),
            last_step: None,
            above: false,
        }
    }

    pub fn refractory(&self) -> Duration {
        self.refractory
    }

    /// Feed one sample taken at `now`; returns `true` when it completes a
    /// step.
    pub fn observe(&mut self, sample: AccelSample, now: Instant) -> bool {
        let magnitude = sample.magnitude();
        if magnitude <= self.threshold {
            self.above = false;
            return false;
        }
        if self.above {
            return false;
        }
        self.above = true;

        let rested = self
            .last_step
            .is_none_or(|last| now.saturating_duration_since(last) >= self.refractory);
        if rested {
            trace!(magnitude, "step");
            self.last_step = Some(now);
        }
        rested
    }

    /// Forget the last step, e.g. when a new route starts.
    pub fn reset(&mut self) {
        self.last_step = None;
        self.above = false;
    }
}

impl Default for StepDetector {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_THRESHOLD, MIN_REFRACTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEAK: AccelSample = AccelSample { x: 0.0, y: 13.5, z: 0.0 };
    const REST: AccelSample = AccelSample { x: 0.0, y: 9.8, z: 0.0 };

    #[test]
    fn rising_edge_counts_once() {
        let mut d = StepDetector::default();
        let t0 = Instant::now();
        assert!(d.observe(PEAK, t0));
        // Still above threshold: same step.
        assert!(!d.observe(PEAK, t0 + Duration::from_millis(700)));
    }

    #[test]
    fn refractory_period_suppresses_double_counts() {
        let mut d = StepDetector::default();
        let t0 = Instant::now();
        assert!(d.observe(PEAK, t0));
        d.observe(REST, t0 + Duration::from_millis(200));
        assert!(!d.observe(PEAK, t0 + Duration::from_millis(400)));
        d.observe(REST, t0 + Duration::from_millis(500));
        assert!(d.observe(PEAK, t0 + Duration::from_millis(650)));
    }

    #[test]
    fn refractory_never_below_minimum() {
        let d = StepDetector::new(12.0, Duration::from_millis(100));
        assert_eq!(d.refractory(), MIN_REFRACTORY);
        let d = StepDetector::new(12.0, Duration::from_millis(900));
        assert_eq!(d.refractory(), Duration::from_millis(900));
    }

    #[test]
    fn quiet_signal_never_steps() {
        let mut d = StepDetector::default();
        let t0 = Instant::now();
        for i in 0..50 {
            assert!(!d.observe(REST, t0 + Duration::from_millis(i * 100)));
        }
    }

    #[test]
    fn reset_allows_immediate_step() {
        let mut d = StepDetector::default();
        let t0 = Instant::now();
        assert!(d.observe(PEAK, t0));
        d.reset();
        assert!(d.observe(PEAK, t0 + Duration::from_millis(10)));
    }
}
