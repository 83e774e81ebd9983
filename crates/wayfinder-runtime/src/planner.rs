//! Route assembly: path search, overlay points and instructions in one go.

use tracing::{debug, info};
use wayfinder_guidance::generate_text;
use wayfinder_map::{Graph, bfs, synthesize};
use wayfinder_types::{NodeId, Route, WayError};

/// Resolve a free-form location string against the graph.
pub fn resolve(graph: &Graph, raw: &str) -> Result<NodeId, WayError> {
    graph
        .lookup(raw)
        .map(|node| node.id.clone())
        .ok_or_else(|| WayError::InvalidLocation(raw.trim().to_string()))
}

/// Build a [`Route`] over an already-found `path`.
///
/// Distance is the hop count times `hop_distance_m`.
pub fn build_route(graph: &Graph, path: Vec<NodeId>, hop_distance_m: f32) -> Route {
    let hops = path.len().saturating_sub(1);
    let route = Route {
        points: synthesize(graph, &path),
        instructions: generate_text(graph, &path),
        distance: hops as f32 * hop_distance_m,
        path,
    };
    debug!(hops, distance = route.distance, "route built");
    route
}

/// Plan a route between two free-form locations.
///
/// # Errors
///
/// - [`WayError::InvalidLocation`] when either end is not in the graph.
/// - [`WayError::NotFound`] when the two are not connected.
pub fn plan_route(graph: &Graph, start: &str, destination: &str, hop_distance_m: f32) -> Result<Route, WayError> {
    let from = resolve(graph, start)?;
    let to = resolve(graph, destination)?;
    let path = bfs(graph, &from, &to).ok_or_else(|| WayError::NotFound {
        start: from.to_string(),
        destination: to.to_string(),
    })?;
    info!(start = %from, destination = %to, hops = path.len() - 1, "route planned");
    Ok(build_route(graph, path, hop_distance_m))
}
