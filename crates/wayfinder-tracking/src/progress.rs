//! [`ProgressTracker`] – dead-reckoned position along a planned route.
//!
//! The tracker never senses absolute position.  It accumulates a fixed
//! distance per detected step (or jumps a whole segment on an explicit
//! skip) and interpolates the traveler's point on the current segment.
//! Only relocalization, which replaces the tracker wholesale, corrects it.
//!
//! ```text
//!   Active(0, 0) ──step/skip──▶ Active(i, d) ──…──▶ Arrived
//!                                                    (absorbing)
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wayfinder_types::{LocalPoint, Route};

// ────────────────────────────────────────────────────────────────────────────
// Public types
// ────────────────────────────────────────────────────────────────────────────

/// Where the traveler is on the route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProgressState {
    /// Walking segment `segment` (from point `segment` to `segment + 1`),
    /// `distance` metres into it.
    Active { segment: usize, distance: f32 },
    /// The final point has been reached.
    Arrived,
}

/// Outcome of one advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// Still on the same segment.
    Moved,
    /// Moved onto a new segment.
    SegmentChanged(usize),
    /// Reached the final point with this advance.
    Arrived,
    /// Already arrived; nothing changed.
    Ignored,
}

// ────────────────────────────────────────────────────────────────────────────
// ProgressTracker
// ────────────────────────────────────────────────────────────────────────────

/// Progress state machine for one route.  Created with its route and
/// discarded with it.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    state: ProgressState,
    segment_lengths: Vec<f32>,
}

impl ProgressTracker {
    /// Start at `Active(0, 0)`, or `Arrived` when the route has no segments.
    pub fn new(route: &Route) -> Self {
        Self::resume(route, 0, 0.0)
    }

    /// Rebuild a tracker at a stored position.
    ///
    /// A segment index at or beyond the last segment clamps to `Arrived`;
    /// negative or non-finite distances reset to zero.
    pub fn resume(route: &Route, segment: usize, distance: f32) -> Self {
        let segment_lengths: Vec<f32> = (0..route.segment_count())
            .filter_map(|i| route.segment_length(i))
            .collect();
        let state = if segment >= segment_lengths.len() {
            if segment > segment_lengths.len() {
                warn!(segment, segments = segment_lengths.len(), "segment index out of range; clamping to arrived");
            }
            ProgressState::Arrived
        } else {
            let distance = if distance.is_finite() && distance > 0.0 { distance } else { 0.0 };
            ProgressState::Active { segment, distance }
        };
        Self { state, segment_lengths }
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    pub fn is_arrived(&self) -> bool {
        self.state == ProgressState::Arrived
    }

    /// Current segment index, `None` once arrived.
    pub fn segment(&self) -> Option<usize> {
        match self.state {
            ProgressState::Active { segment, .. } => Some(segment),
            ProgressState::Arrived => None,
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segment_lengths.len()
    }

    /// Add one step of `step_length` metres.
    ///
    /// Crossing the end of the segment moves to the start of the next one;
    /// leftover distance is dropped.
    pub fn step_advance(&mut self, step_length: f32) -> Advance {
        let ProgressState::Active { segment, distance } = self.state else {
            return Advance::Ignored;
        };
        let distance = distance + step_length.max(0.0);
        let length = self.segment_lengths.get(segment).copied().unwrap_or(0.0);
        if distance >= length {
            self.enter_next(segment)
        } else {
            self.state = ProgressState::Active { segment, distance };
            Advance::Moved
        }
    }

    /// Jump to the start of the next segment.
    pub fn skip(&mut self) -> Advance {
        match self.state {
            ProgressState::Active { segment, .. } => self.enter_next(segment),
            ProgressState::Arrived => Advance::Ignored,
        }
    }

    fn enter_next(&mut self, segment: usize) -> Advance {
        let next = segment + 1;
        if next >= self.segment_lengths.len() {
            debug!(segment = next, "arrived");
            self.state = ProgressState::Arrived;
            Advance::Arrived
        } else {
            debug!(segment = next, "segment change");
            self.state = ProgressState::Active { segment: next, distance: 0.0 };
            Advance::SegmentChanged(next)
        }
    }

    /// Fraction of the current segment walked, in `[0, 1]`; `1` once arrived.
    pub fn segment_fraction(&self) -> f32 {
        match self.state {
            ProgressState::Active { segment, distance } => {
                match self.segment_lengths.get(segment).copied() {
                    Some(length) if length > 0.0 => (distance / length).clamp(0.0, 1.0),
                    _ => 0.0,
                }
            }
            ProgressState::Arrived => 1.0,
        }
    }

    /// Interpolated position on `route`, which must be the route this
    /// tracker was built for.  `None` for a route without points.
    pub fn position(&self, route: &Route) -> Option<LocalPoint> {
        match self.state {
            ProgressState::Active { segment, .. } => {
                let start = *route.points.get(segment)?;
                let end = route.points.get(segment + 1).copied().unwrap_or(start);
                Some(start.lerp(end, self.segment_fraction()))
            }
            ProgressState::Arrived => route.points.last().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Straight route: three points 5 m apart along -z.
    fn route() -> Route {
        Route {
            path: Vec::new(),
            points: vec![
                LocalPoint::new(0.0, 0.0, 0.0),
                LocalPoint::new(0.0, 0.0, -5.0),
                LocalPoint::new(0.0, 0.0, -10.0),
            ],
            instructions: Vec::new(),
            distance: 10.0,
        }
    }

    #[test]
    fn starts_active_at_origin() {
        let r = route();
        let t = ProgressTracker::new(&r);
        assert_eq!(t.state(), ProgressState::Active { segment: 0, distance: 0.0 });
        assert_eq!(t.position(&r), Some(LocalPoint::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn steps_accumulate_then_change_segment() {
        let r = route();
        let mut t = ProgressTracker::new(&r);
        assert_eq!(t.step_advance(2.0), Advance::Moved);
        assert_eq!(t.step_advance(2.0), Advance::Moved);
        let p = t.position(&r).unwrap();
        assert!((p.z + 4.0).abs() < 1e-5);
        assert_eq!(t.step_advance(2.0), Advance::SegmentChanged(1));
        assert_eq!(t.state(), ProgressState::Active { segment: 1, distance: 0.0 });
        for _ in 0..2 {
            assert_eq!(t.step_advance(2.0), Advance::Moved);
        }
        assert_eq!(t.step_advance(2.0), Advance::Arrived);
        assert!(t.is_arrived());
    }

    #[test]
    fn skip_reaches_arrival_at_last_index() {
        let r = route();
        let mut t = ProgressTracker::new(&r);
        assert_eq!(t.skip(), Advance::SegmentChanged(1));
        assert_eq!(t.skip(), Advance::Arrived);
        assert_eq!(t.position(&r), Some(LocalPoint::new(0.0, 0.0, -10.0)));
    }

    #[test]
    fn arrived_absorbs_further_advances() {
        let r = route();
        let mut t = ProgressTracker::new(&r);
        t.skip();
        t.skip();
        assert_eq!(t.skip(), Advance::Ignored);
        assert_eq!(t.step_advance(3.0), Advance::Ignored);
        assert_eq!(t.state(), ProgressState::Arrived);
    }

    #[test]
    fn position_stays_on_segment() {
        let r = route();
        let mut t = ProgressTracker::new(&r);
        for _ in 0..20 {
            if let ProgressState::Active { segment, distance } = t.state() {
                assert!(segment < r.last_index());
                assert!(distance >= 0.0 && distance <= r.segment_length(segment).unwrap());
            }
            t.step_advance(0.7);
        }
        assert!(t.is_arrived());
    }

    #[test]
    fn out_of_range_resume_clamps_to_arrived() {
        let r = route();
        assert!(ProgressTracker::resume(&r, 7, 1.0).is_arrived());
        assert!(ProgressTracker::resume(&r, 2, 0.0).is_arrived());
        let t = ProgressTracker::resume(&r, 1, f32::NAN);
        assert_eq!(t.state(), ProgressState::Active { segment: 1, distance: 0.0 });
    }

    #[test]
    fn degenerate_routes() {
        let single = Route {
            path: Vec::new(),
            points: vec![LocalPoint::default()],
            instructions: Vec::new(),
            distance: 0.0,
        };
        assert!(ProgressTracker::new(&single).is_arrived());

        // A zero-length segment is crossed by the first step.
        let mut r = route();
        r.points[1] = r.points[0];
        let mut t = ProgressTracker::new(&r);
        assert_eq!(t.step_advance(0.7), Advance::SegmentChanged(1));
    }

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_string(&ProgressState::Active { segment: 1, distance: 0.5 }).unwrap();
        assert_eq!(json, r#"{"state":"active","segment":1,"distance":0.5}"#);
    }
}
