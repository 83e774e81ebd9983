//! Route coordinates in the overlay frame.
//!
//! The overlay camera starts at the route's first node looking down
//! negative `z`, so global coordinates are shifted to that node and the
//! `z` axis is flipped.  Height is left at the floor; the renderer applies
//! its own floor offset.

use wayfinder_types::{LocalPoint, NodeId};

use crate::graph::Graph;

/// Height of every synthesized point.
pub const FLOOR_Y: f32 = 0.0;

/// One local point per node of `path`, anchored at `path[0]`.
///
/// Nodes without a coordinate fall back to the origin (with a warning from
/// [`Graph::coordinate_of`]).  Pure: repeated calls give identical output.
pub fn synthesize(graph: &Graph, path: &[NodeId]) -> Vec<LocalPoint> {
    let Some(first) = path.first() else {
        return Vec::new();
    };
    let origin = graph.coordinate_of(first);

    path.iter()
        .map(|id| {
            let global = graph.coordinate_of(id);
            LocalPoint::new(global.x - origin.x, FLOOR_Y, -(global.z - origin.z))
        })
        .collect()
}
