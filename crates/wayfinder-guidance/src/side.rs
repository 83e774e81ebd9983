//! Walking direction and the side a destination room appears on.

use wayfinder_map::{Graph, WalkingDirection};
use wayfinder_types::{NodeId, Side};

/// Direction walked along `corridor`, given the node visited before it.
///
/// A room as `prev` stands for the corridor it opens onto.
pub fn walking_direction_of(graph: &Graph, corridor: &NodeId, prev: Option<&NodeId>) -> WalkingDirection {
    let came_from = prev.map(|p| graph.corridor_of(p).unwrap_or(p));
    graph.profile().walking_direction(corridor, came_from)
}

/// Side of `room` while walking `direction` along `corridor`.
///
/// An explicit `side` on the node wins over the inner/outer rule.  `None`
/// when the node has neither.
pub fn side_of(graph: &Graph, direction: WalkingDirection, room: &NodeId, corridor: &NodeId) -> Option<Side> {
    let node = graph.node(room)?;
    if let Some(side) = node.side {
        return Some(side);
    }
    node.position
        .map(|position| graph.profile().room_side(direction, position, corridor))
}
