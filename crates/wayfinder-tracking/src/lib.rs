//! `wayfinder-tracking` – where the traveler is on the active route.
//!
//! - [`progress`] – [`ProgressTracker`]: segment index and distance into it,
//!   advanced by steps or explicit skips, absorbing on arrival.
//! - [`step`] – [`StepDetector`]: accelerometer threshold crossings with a
//!   refractory period.
//! - [`heading`] – [`HeadingMonitor`]: periodic wrong-direction check.

pub mod heading;
pub mod progress;
pub mod step;

pub use heading::{HeadingMonitor, angular_difference, segment_bearing};
pub use progress::{Advance, ProgressState, ProgressTracker};
pub use step::{AccelSample, StepDetector};
