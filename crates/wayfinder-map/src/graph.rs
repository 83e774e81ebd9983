//! [`Graph`] – the immutable building graph.
//!
//! A graph is built once from a [`MapDocument`] (the parsed map file) and
//! never mutated afterwards.  Construction validates the document:
//!
//! - every neighbor reference must resolve to a node;
//! - one-way edges are repaired by appending the reverse edge, since routes
//!   must be walkable in both directions for relocalization;
//! - coordinates are attached to their nodes;
//! - the [`BuildingProfile`] tables are checked against the coordinates.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use wayfinder_types::{GlobalCoord, NodeId, NodeKind, RoomPosition, Side, WayError};

use crate::profile::BuildingProfile;

// ────────────────────────────────────────────────────────────────────────────
// Map document (wire format)
// ────────────────────────────────────────────────────────────────────────────

/// One node entry of the map file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub neighbors: Vec<NodeId>,
    /// Inner/outer wall tag for rooms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<RoomPosition>,
    /// Explicit side, overriding the profile's side rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

/// The parsed map file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    pub nodes: BTreeMap<NodeId, RawNode>,
    /// Global coordinate table, maintained separately from adjacency.
    #[serde(default)]
    pub coordinates: BTreeMap<NodeId, GlobalCoord>,
    /// Heuristic tables; the built-in Block C profile when absent.
    #[serde(default)]
    pub profile: Option<BuildingProfile>,
}

// ────────────────────────────────────────────────────────────────────────────
// Node / Graph
// ────────────────────────────────────────────────────────────────────────────

/// A room or corridor point.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Neighbor order is significant: it breaks BFS ties.
    pub neighbors: Vec<NodeId>,
    pub coord: Option<GlobalCoord>,
    pub position: Option<RoomPosition>,
    pub side: Option<Side>,
}

impl Node {
    pub fn is_room(&self) -> bool {
        self.kind == NodeKind::Room
    }

    pub fn is_corridor(&self) -> bool {
        self.kind == NodeKind::Corridor
    }
}

/// Immutable mapping identifier → [`Node`], plus the building's profile.
#[derive(Debug, Clone)]
pub struct Graph {
    building: Option<String>,
    floor: Option<i32>,
    nodes: HashMap<NodeId, Node>,
    profile: BuildingProfile,
}

impl Graph {
    /// Validate `doc` and build the graph.
    ///
    /// # Errors
    ///
    /// Returns [`WayError::Load`] when a neighbor reference does not resolve
    /// or the profile tables are inconsistent with the coordinates.
    pub fn from_document(doc: MapDocument) -> Result<Self, WayError> {
        let MapDocument {
            building,
            floor,
            nodes: raw_nodes,
            coordinates,
            profile,
        } = doc;

        let mut adjacency: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
        for (id, raw) in &raw_nodes {
            for neighbor in &raw.neighbors {
                if !raw_nodes.contains_key(neighbor) {
                    return Err(WayError::Load(format!(
                        "node {id} lists unknown neighbor {neighbor}"
                    )));
                }
            }
            adjacency.insert(id.clone(), raw.neighbors.clone());
        }

        // Repair one-way edges so every route can be walked backwards.
        let mut repairs = Vec::new();
        for (id, neighbors) in &adjacency {
            for neighbor in neighbors {
                let reverse_listed = adjacency
                    .get(neighbor)
                    .is_some_and(|back| back.contains(id));
                if !reverse_listed && neighbor != id {
                    repairs.push((neighbor.clone(), id.clone()));
                }
            }
        }
        for (from, to) in repairs {
            warn!(from = %from, to = %to, "asymmetric edge in map; adding reverse neighbor");
            if let Some(list) = adjacency.get_mut(&from)
                && !list.contains(&to)
            {
                list.push(to);
            }
        }

        for id in coordinates.keys() {
            if !raw_nodes.contains_key(id) {
                warn!(node = %id, "coordinate given for a node that is not in the graph");
            }
        }

        let nodes: HashMap<NodeId, Node> = raw_nodes
            .into_iter()
            .map(|(id, raw)| {
                let node = Node {
                    neighbors: adjacency.remove(&id).unwrap_or_default(),
                    coord: coordinates.get(&id).copied(),
                    kind: raw.kind,
                    position: raw.position,
                    side: raw.side,
                    id: id.clone(),
                };
                (id, node)
            })
            .collect();

        let graph = Self {
            building,
            floor,
            nodes,
            profile: profile.unwrap_or_default(),
        };
        graph.profile.check_reciprocal_turns()?;
        graph.profile.check_layout(&graph)?;

        info!(
            building = graph.building.as_deref().unwrap_or("unnamed"),
            nodes = graph.nodes.len(),
            "building graph ready"
        );
        Ok(graph)
    }

    /// Parse a map file from JSON text and build the graph.
    pub fn from_json(json: &str) -> Result<Self, WayError> {
        let doc: MapDocument = serde_json::from_str(json)
            .map_err(|e| WayError::Load(format!("malformed map JSON: {e}")))?;
        Self::from_document(doc)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn building(&self) -> Option<&str> {
        self.building.as_deref()
    }

    pub fn floor(&self) -> Option<i32> {
        self.floor
    }

    pub fn profile(&self) -> &BuildingProfile {
        &self.profile
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by a free-form identifier (normalized first).
    pub fn lookup(&self, raw: &str) -> Option<&Node> {
        self.nodes.get(&NodeId::normalize(raw))
    }

    /// Look up a node by an already-normalized identifier.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn kind_of(&self, id: &NodeId) -> Option<NodeKind> {
        self.nodes.get(id).map(|n| n.kind)
    }

    /// All identifiers, sorted.
    pub fn ids(&self) -> Vec<&NodeId> {
        let mut ids: Vec<&NodeId> = self.nodes.keys().collect();
        ids.sort();
        ids
    }

    /// Global coordinate of `id`, falling back to the origin with a warning
    /// when the node has none.
    pub fn coordinate_of(&self, id: &NodeId) -> GlobalCoord {
        match self.strict_coordinate_of(id) {
            Ok(coord) => coord,
            Err(_) => {
                warn!(node = %id, "missing coordinate; using origin");
                GlobalCoord::ORIGIN
            }
        }
    }

    /// Global coordinate of `id`.
    ///
    /// # Errors
    ///
    /// [`WayError::UnknownCoordinate`] when the node is absent or has no
    /// coordinate.
    pub fn strict_coordinate_of(&self, id: &NodeId) -> Result<GlobalCoord, WayError> {
        self.nodes
            .get(id)
            .and_then(|n| n.coord)
            .ok_or_else(|| WayError::UnknownCoordinate(id.to_string()))
    }

    /// The corridor a node belongs to: itself for corridors, the first
    /// corridor neighbor for rooms.
    pub fn corridor_of(&self, id: &NodeId) -> Option<&NodeId> {
        let node = self.nodes.get(id)?;
        if node.is_corridor() {
            return Some(&node.id);
        }
        node.neighbors
            .iter()
            .find(|n| self.kind_of(n) == Some(NodeKind::Corridor))
    }
}
