//! Re-anchoring the route at a scanned position.
//!
//! Planning is pure: nothing about the active session changes until the new
//! route is complete, so a failed relocalization leaves the traveler exactly
//! where they were.

use tracing::{info, warn};
use wayfinder_map::{Graph, bfs};
use wayfinder_types::{NodeId, Route, WayError};

use crate::planner::build_route;

/// A successful re-plan from a scanned code.
#[derive(Debug, Clone, PartialEq)]
pub struct Relocation {
    pub position: NodeId,
    pub destination: NodeId,
    pub route: Route,
}

impl Relocation {
    pub fn hops(&self) -> usize {
        self.route.path.len().saturating_sub(1)
    }
}

/// Plan a route from the position named by `code` to `destination`.
///
/// # Errors
///
/// Checked in this order:
/// - [`WayError::InvalidLocation`] – `code` names no node.
/// - [`WayError::NoDestination`] – no destination is set.
/// - [`WayError::NoRoute`] – the destination is unreachable from there.
pub fn plan_relocalization(
    graph: &Graph,
    code: &str,
    destination: Option<&NodeId>,
    hop_distance_m: f32,
) -> Result<Relocation, WayError> {
    let Some(node) = graph.lookup(code) else {
        warn!(code = code.trim(), "scanned code is not a known location");
        return Err(WayError::InvalidLocation(code.trim().to_string()));
    };
    let position = node.id.clone();
    let destination = destination.ok_or(WayError::NoDestination)?.clone();
    let path = bfs(graph, &position, &destination).ok_or_else(|| WayError::NoRoute {
        from: position.to_string(),
        to: destination.to_string(),
    })?;

    info!(position = %position, destination = %destination, hops = path.len() - 1, "relocalized");
    Ok(Relocation {
        route: build_route(graph, path, hop_distance_m),
        position,
        destination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_map::BLOCK_C_MAP;
    use wayfinder_types::LocalPoint;

    fn graph() -> Graph {
        Graph::from_json(BLOCK_C_MAP).unwrap()
    }

    #[test]
    fn replans_from_scanned_code() {
        let g = graph();
        let dest = NodeId::from("c214");
        let r = plan_relocalization(&g, "C-209", Some(&dest), 5.0).unwrap();
        assert_eq!(r.position.as_str(), "c209");
        assert_eq!(r.route.path.first(), Some(&r.position));
        assert_eq!(r.route.path.last(), Some(&dest));
        assert_eq!(r.route.points[0], LocalPoint::new(0.0, 0.0, 0.0));
        assert_eq!(r.route.distance, r.hops() as f32 * 5.0);
    }

    #[test]
    fn error_order() {
        let g = graph();
        let dest = NodeId::from("c214");
        assert_eq!(
            plan_relocalization(&g, "nowhere", None, 5.0),
            Err(WayError::InvalidLocation("nowhere".to_string()))
        );
        assert_eq!(plan_relocalization(&g, "c209", None, 5.0), Err(WayError::NoDestination));
        assert!(plan_relocalization(&g, "c209", Some(&dest), 5.0).is_ok());
    }

    #[test]
    fn unreachable_destination_is_no_route() {
        let g = Graph::from_json(
            r#"{
                "nodes": {
                    "lab": {"type": "room", "neighbors": ["hall"]},
                    "hall": {"type": "corridor", "neighbors": ["lab"]},
                    "annex": {"type": "room", "neighbors": []}
                },
                "coordinates": {}
            }"#,
        )
        .unwrap();
        let dest = NodeId::from("annex");
        assert_eq!(
            plan_relocalization(&g, "lab", Some(&dest), 5.0),
            Err(WayError::NoRoute {
                from: "lab".to_string(),
                to: "annex".to_string()
            })
        );
    }

    #[test]
    fn scanning_the_destination_gives_a_zero_hop_route() {
        let g = graph();
        let dest = NodeId::from("c203");
        let r = plan_relocalization(&g, "c203", Some(&dest), 5.0).unwrap();
        assert_eq!(r.hops(), 0);
        assert!(r.route.instructions.is_empty());
    }
}
