//! Turn classification at a node of the route.
//!
//! Turns come from the building profile's named transition table, keyed by
//! the corridor the traveler was on before `current` and `current` itself.
//! Geometry is never consulted.

use wayfinder_map::{Graph, Turn};
use wayfinder_types::NodeId;

/// Turn made on entering `current` after `prev`.
///
/// A route's first node (no `prev`) and any transition missing from the
/// table are [`Turn::Forward`].  Rooms stand for the corridor they open
/// onto.
pub fn turn_of(graph: &Graph, prev: Option<&NodeId>, current: &NodeId) -> Turn {
    let Some(prev) = prev else {
        return Turn::Forward;
    };
    match graph.corridor_of(prev) {
        Some(prev_corridor) => graph.profile().turn_between(prev_corridor, current),
        None => Turn::Forward,
    }
}
