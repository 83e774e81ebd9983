//! Corridor walking distances from room numbering.
//!
//! Rooms along a corridor are numbered in walking order and spaced one room
//! width apart, so the distance between two rooms is the difference of their
//! numbers times the room width.  Junction nodes have no number of their
//! own; the profile gives them a virtual one per corridor.

use wayfinder_map::{Graph, room_number};
use wayfinder_types::NodeId;

/// Virtual position of `id` along `corridor`: the profile's junction value,
/// or the room number embedded in the identifier.
pub fn position_along(graph: &Graph, id: &NodeId, corridor: &NodeId) -> Option<f32> {
    graph
        .profile()
        .junction_value(id, corridor)
        .or_else(|| room_number(id.as_str()))
}

/// Metres walked along `corridor` from `start` to `end`.
///
/// Falls back to a single room width when either end has no position
/// (including a route that starts on the corridor itself).
pub fn distance_of(graph: &Graph, start: Option<&NodeId>, end: &NodeId, corridor: &NodeId) -> f32 {
    let room_width = graph.profile().room_width;
    let start = start.and_then(|s| position_along(graph, s, corridor));
    let end = position_along(graph, end, corridor);
    match (start, end) {
        (Some(a), Some(b)) => (b - a).abs() * room_width,
        _ => room_width,
    }
}
