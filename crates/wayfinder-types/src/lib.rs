//! `wayfinder-types` – shared vocabulary of the navigation engine.
//!
//! Node identifiers, coordinates, the [`Route`] value and its JSON exchange
//! form, the events routed over the navigation bus, and the single
//! [`WayError`] type every crate reports through.

use std::borrow::Borrow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Node identity
// ────────────────────────────────────────────────────────────────────────────

/// A normalized graph node identifier.
///
/// Identifiers are case-insensitive and ignore hyphens, so `"C-201"`,
/// `"c201"` and `" C201 "` all name the same node.  Normalization happens
/// once, at construction; everything downstream compares plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Normalize `raw` (trim, lowercase, strip hyphens) into an identifier.
    pub fn normalize(raw: &str) -> Self {
        Self(
            raw.trim()
                .chars()
                .filter(|c| *c != '-')
                .flat_map(char::to_lowercase)
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the empty identifier (e.g. normalized whitespace).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::normalize(&raw))
    }
}

/// Whether a node is a room (a destination) or a corridor (a walkway).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Room,
    Corridor,
}

/// Which wall of its corridor a room sits on, relative to the building core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomPosition {
    Inner,
    Outer,
}

/// Left or right, from the traveler's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Coordinates
// ────────────────────────────────────────────────────────────────────────────

/// A position on the building floor plan, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalCoord {
    pub x: f32,
    pub z: f32,
}

impl GlobalCoord {
    pub const ORIGIN: Self = Self { x: 0.0, z: 0.0 };

    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }
}

/// A route point in the overlay frame: origin at the route's first node,
/// forward along negative `z`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl LocalPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance on the floor plane (ignores `y`).
    pub fn planar_distance(self, other: Self) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Point at fraction `t` (clamped to `[0, 1]`) of the way to `other`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Route
// ────────────────────────────────────────────────────────────────────────────

/// A planned route: node sequence, overlay points, and instructions.
///
/// Routes built from a graph satisfy `points.len() == path.len()` and
/// `instructions.len() == path.len() - 1`.  Routes imported from a legacy
/// exchange object may carry points only, in which case `path` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: Vec<NodeId>,
    pub points: Vec<LocalPoint>,
    pub instructions: Vec<String>,
    /// Estimated walking distance in metres.
    pub distance: f32,
}

impl Route {
    /// Number of walkable segments (`points.len() - 1`, never negative).
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Index of the final point; reaching it means arrival.
    pub fn last_index(&self) -> usize {
        self.segment_count()
    }

    pub fn start(&self) -> Option<&NodeId> {
        self.path.first()
    }

    pub fn destination(&self) -> Option<&NodeId> {
        self.path.last()
    }

    /// Planar length of segment `index`, or `None` past the last segment.
    pub fn segment_length(&self, index: usize) -> Option<f32> {
        let a = self.points.get(index)?;
        let b = self.points.get(index + 1)?;
        Some(a.planar_distance(*b))
    }

    /// Instruction for segment `index`, if the route carries one.
    pub fn instruction(&self, index: usize) -> Option<&str> {
        self.instructions.get(index).map(String::as_str)
    }

    /// Convert into the JSON exchange object consumed by collaborators.
    pub fn to_exchange(&self) -> RouteExchange {
        RouteExchange {
            path: (!self.path.is_empty()).then(|| self.path.clone()),
            points: self.points.clone(),
            instructions: self.instructions.clone(),
            distance: self.distance,
            start_node: self.path.first().cloned(),
        }
    }
}

/// JSON form of a [`Route`], as handed to and accepted from collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteExchange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<NodeId>>,
    pub points: Vec<LocalPoint>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub distance: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_node: Option<NodeId>,
}

/// A `path` that does not name exactly one node per point is dropped, and
/// the route is driven as a points-only legacy route.
impl From<RouteExchange> for Route {
    fn from(ex: RouteExchange) -> Self {
        let path = ex
            .path
            .filter(|p| p.len() == ex.points.len())
            .unwrap_or_default();
        Route {
            path,
            points: ex.points,
            instructions: ex.instructions,
            distance: ex.distance,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Navigation events
// ────────────────────────────────────────────────────────────────────────────

/// Envelope for everything published on the navigation bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// e.g. `"wayfinder-runtime::session"`
    pub source: String,
    pub payload: NavPayload,
}

impl NavEvent {
    /// Wrap `payload` with a fresh id and the current time.
    pub fn new(source: impl Into<String>, payload: NavPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.into(),
            payload,
        }
    }
}

/// Variants of data routed over the navigation bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavPayload {
    /// A new route replaced whatever was active.
    RouteStarted {
        start: Option<NodeId>,
        destination: Option<NodeId>,
        segments: usize,
        distance: f32,
    },
    /// The traveler moved onto a new segment.
    SegmentChanged {
        segment: usize,
        instruction: Option<String>,
    },
    /// The final point was reached.
    Arrived {
        destination: Option<NodeId>,
        distance: f32,
    },
    /// The route was re-anchored at a scanned position.
    Relocalized {
        position: NodeId,
        destination: NodeId,
        hops: usize,
    },
    /// The traveler faces away from the current segment.
    WrongDirection { deviation_deg: f32 },
    /// The operator asked the process to stop.
    Shutdown { reason: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Error type shared by every wayfinder crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WayError {
    #[error("Map load failed: {0}")]
    Load(String),

    #[error("No path from {start} to {destination}")]
    NotFound { start: String, destination: String },

    #[error("Unknown location: {0}")]
    InvalidLocation(String),

    #[error("No destination is set")]
    NoDestination,

    #[error("No route from {from} to {to}")]
    NoRoute { from: String, to: String },

    #[error("No coordinate for node {0}")]
    UnknownCoordinate(String),

    #[error("Scanner error: {0}")]
    Scanner(String),

    #[error("Event bus error: {0}")]
    Channel(String),
}
