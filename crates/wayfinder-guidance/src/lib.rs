//! `wayfinder-guidance` – turn-by-turn instructions over a building graph.
//!
//! Everything here is a pure function of the [`Graph`](wayfinder_map::Graph)
//! and its building profile, or of a grid floor's zone layout:
//!
//! - [`turns`] – turn taken on entering a corridor.
//! - [`distance`] – metres walked along a corridor, from room numbers.
//! - [`side`] – walking direction and which side a room is on.
//! - [`generator`] – [`generate`]: one [`Instruction`] per path transition.
//! - [`locale`] – [`Language`] phrases and progress labels.
//! - [`zones`] – compass-and-metres directions on a grid floor
//!   ([`ZoneLayout`](wayfinder_map::ZoneLayout)).

pub mod distance;
pub mod generator;
pub mod locale;
pub mod side;
pub mod turns;
pub mod zones;

pub use distance::{distance_of, position_along};
pub use generator::{Instruction, Maneuver, generate, generate_text};
pub use locale::{Language, Phrase};
pub use side::{side_of, walking_direction_of};
pub use turns::turn_of;
pub use zones::{Compass, ZoneStep, navigate, navigate_text};
