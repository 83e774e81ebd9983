//! [`BuildingProfile`] – the named-corridor heuristic tables of one building.
//!
//! Turns, walking directions, room sides and junction distances are not
//! derived from geometry.  They are explicit lookups over corridor names,
//! authored by hand for a specific floor plan.  This module holds those
//! tables as data so a map file can ship its own, and checks them against
//! the coordinate table when a graph is loaded:
//!
//! - reciprocal turn entries must be opposite turns;
//! - junction offsets must order along each corridor the same way the
//!   junction coordinates do.
//!
//! [`BuildingProfile::block_c`] is the built-in profile for the U-shaped
//! Block C floor (right, top and left corridors).

use serde::{Deserialize, Serialize};
use tracing::debug;
use wayfinder_types::{NodeId, NodeKind, RoomPosition, Side, WayError};

use crate::graph::Graph;

/// Metres walked per room-number step along a corridor.
pub const DEFAULT_ROOM_WIDTH: f32 = 5.0;

// ────────────────────────────────────────────────────────────────────────────
// Table entry types
// ────────────────────────────────────────────────────────────────────────────

/// Turn classification at a corridor transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Left,
    Right,
    Forward,
}

impl Turn {
    /// The turn made when walking the same transition backwards.
    pub fn reversed(self) -> Self {
        match self {
            Turn::Left => Turn::Right,
            Turn::Right => Turn::Left,
            Turn::Forward => Turn::Forward,
        }
    }
}

/// Cardinal walking direction on the floor plan, as drawn ("up" is north).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkingDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Floor-plan axis a corridor runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Z,
}

/// `from → to` corridor transition and the turn it requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRule {
    pub from: NodeId,
    pub to: NodeId,
    pub turn: Turn,
}

/// Virtual room number of a junction node as seen from one corridor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JunctionOffset {
    pub junction: NodeId,
    pub corridor: NodeId,
    pub value: f32,
}

/// Walking direction on a corridor when arriving from a given corridor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionRule {
    pub from: NodeId,
    pub direction: WalkingDirection,
}

/// Per-corridor facts used by the direction heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorridorProfile {
    pub id: NodeId,
    pub axis: Axis,
    /// Corridors facing the opposite way swap the up/down side rules.
    #[serde(default)]
    pub mirrored: bool,
    /// Virtual room number used when a walk starts at this junction and the
    /// corridor being walked has no [`JunctionOffset`] for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_value: Option<f32>,
    /// Direction when none of `arrivals` matches.
    pub default_direction: WalkingDirection,
    #[serde(default)]
    pub arrivals: Vec<DirectionRule>,
}

// ────────────────────────────────────────────────────────────────────────────
// BuildingProfile
// ────────────────────────────────────────────────────────────────────────────

/// All building-specific lookup tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingProfile {
    #[serde(default = "default_room_width")]
    pub room_width: f32,
    #[serde(default)]
    pub corridors: Vec<CorridorProfile>,
    #[serde(default)]
    pub turns: Vec<TurnRule>,
    #[serde(default)]
    pub junctions: Vec<JunctionOffset>,
}

fn default_room_width() -> f32 {
    DEFAULT_ROOM_WIDTH
}

impl Default for BuildingProfile {
    fn default() -> Self {
        Self::block_c()
    }
}

impl BuildingProfile {
    /// A profile with no named corridors: every transition is "forward" and
    /// room sides come only from explicit node `side` tags.
    pub fn empty() -> Self {
        Self {
            room_width: DEFAULT_ROOM_WIDTH,
            corridors: Vec::new(),
            turns: Vec::new(),
            junctions: Vec::new(),
        }
    }

    /// Built-in tables for the Block C floor.
    ///
    /// Right corridor runs north along `x = 0`, the top corridor west along
    /// `z = 40`, the left corridor south along `x = -20`.  The left corridor
    /// faces the opposite way, so its side rules are mirrored.
    pub fn block_c() -> Self {
        fn id(raw: &str) -> NodeId {
            NodeId::from(raw)
        }
        let turn = |from: &str, to: &str, turn: Turn| TurnRule {
            from: id(from),
            to: id(to),
            turn,
        };
        let junction = |junction: &str, corridor: &str, value: f32| JunctionOffset {
            junction: id(junction),
            corridor: id(corridor),
            value,
        };
        let arrival = |from: &str, direction: WalkingDirection| DirectionRule {
            from: id(from),
            direction,
        };

        Self {
            room_width: DEFAULT_ROOM_WIDTH,
            corridors: vec![
                CorridorProfile {
                    id: id("corridor_right"),
                    axis: Axis::Z,
                    mirrored: false,
                    entry_value: Some(201.0),
                    default_direction: WalkingDirection::Up,
                    arrivals: vec![arrival("corridor_top", WalkingDirection::Down)],
                },
                CorridorProfile {
                    id: id("corridor_top"),
                    axis: Axis::X,
                    mirrored: false,
                    entry_value: None,
                    default_direction: WalkingDirection::Left,
                    arrivals: vec![arrival("corridor_left", WalkingDirection::Right)],
                },
                CorridorProfile {
                    id: id("corridor_left"),
                    axis: Axis::Z,
                    mirrored: true,
                    entry_value: Some(214.0),
                    default_direction: WalkingDirection::Up,
                    arrivals: vec![arrival("corridor_top", WalkingDirection::Down)],
                },
            ],
            turns: vec![
                turn("corridor_right", "corridor_top", Turn::Left),
                turn("corridor_top", "corridor_right", Turn::Right),
                turn("corridor_top", "corridor_left", Turn::Left),
                turn("corridor_left", "corridor_top", Turn::Right),
            ],
            junctions: vec![
                junction("corridor_top", "corridor_right", 208.5),
                junction("corridor_right", "corridor_top", 209.0),
                junction("corridor_left", "corridor_top", 210.5),
                junction("corridor_top", "corridor_left", 210.5),
            ],
        }
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn corridor(&self, id: &NodeId) -> Option<&CorridorProfile> {
        self.corridors.iter().find(|c| &c.id == id)
    }

    /// Turn required when moving from corridor `from` into corridor `to`.
    /// Pairs missing from the table are [`Turn::Forward`].
    pub fn turn_between(&self, from: &NodeId, to: &NodeId) -> Turn {
        self.turns
            .iter()
            .find(|r| &r.from == from && &r.to == to)
            .map(|r| r.turn)
            .unwrap_or(Turn::Forward)
    }

    /// Virtual room number of `junction` when walking `corridor`.
    ///
    /// The corridor-specific offset wins; otherwise the junction's own entry
    /// value applies.  The entry value never overrides a corridor-specific
    /// offset: a leg along `corridor_top` that starts at `corridor_right`
    /// measures from 209, not from the raw entry 201.  Letting the raw entry
    /// win would turn the 7.5 m `corridor_top` leg of `c201 -> c214` into
    /// 47.5 m.
    pub fn junction_value(&self, junction: &NodeId, corridor: &NodeId) -> Option<f32> {
        self.junctions
            .iter()
            .find(|j| &j.junction == junction && &j.corridor == corridor)
            .map(|j| j.value)
            .or_else(|| self.corridor(junction).and_then(|c| c.entry_value))
    }

    /// Walking direction along `corridor` given the corridor visited before it.
    /// Unknown corridors walk "up".
    pub fn walking_direction(&self, corridor: &NodeId, came_from: Option<&NodeId>) -> WalkingDirection {
        let Some(profile) = self.corridor(corridor) else {
            return WalkingDirection::Up;
        };
        came_from
            .and_then(|prev| profile.arrivals.iter().find(|r| &r.from == prev))
            .map(|r| r.direction)
            .unwrap_or(profile.default_direction)
    }

    /// Which side a room at `position` appears on while walking `direction`
    /// along `corridor`.
    pub fn room_side(&self, direction: WalkingDirection, position: RoomPosition, corridor: &NodeId) -> Side {
        let mirrored = self.corridor(corridor).is_some_and(|c| c.mirrored);
        let inner = match (direction, mirrored) {
            (WalkingDirection::Up, false) | (WalkingDirection::Down, true) => Side::Left,
            (WalkingDirection::Down, false) | (WalkingDirection::Up, true) => Side::Right,
            (WalkingDirection::Left, _) => Side::Left,
            (WalkingDirection::Right, _) => Side::Right,
        };
        match position {
            RoomPosition::Inner => inner,
            RoomPosition::Outer => inner.opposite(),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Every turn entry whose reverse transition is also listed must be the
    /// mirror turn of it.
    pub fn check_reciprocal_turns(&self) -> Result<(), WayError> {
        for rule in &self.turns {
            let reverse = self
                .turns
                .iter()
                .find(|r| r.from == rule.to && r.to == rule.from);
            if let Some(reverse) = reverse
                && reverse.turn != rule.turn.reversed()
            {
                return Err(WayError::Load(format!(
                    "turn table is not reciprocal: {} -> {} is {:?} but {} -> {} is {:?}",
                    rule.from, rule.to, rule.turn, reverse.from, reverse.to, reverse.turn
                )));
            }
        }
        Ok(())
    }

    /// Check the junction offsets against the graph's coordinate table.
    ///
    /// For each profiled corridor present in `graph`, rooms (by their number)
    /// and junctions (by their offset) are paired with their coordinate along
    /// the corridor axis.  Whenever one value is strictly smaller than
    /// another, the coordinates must move in the same direction for every such
    /// pair.
    pub fn check_layout(&self, graph: &Graph) -> Result<(), WayError> {
        for corridor in &self.corridors {
            let Some(node) = graph.node(&corridor.id) else {
                debug!(corridor = %corridor.id, "profiled corridor not in graph; skipping layout check");
                continue;
            };
            let project = |id: &NodeId| {
                graph.node(id).and_then(|n| n.coord).map(|c| match corridor.axis {
                    Axis::X => c.x,
                    Axis::Z => c.z,
                })
            };

            let mut samples: Vec<(f32, f32, &NodeId)> = Vec::new();
            for neighbor in &node.neighbors {
                let is_room = graph.node(neighbor).is_some_and(|n| n.kind == NodeKind::Room);
                if let (true, Some(value), Some(along)) =
                    (is_room, room_number(neighbor.as_str()), project(neighbor))
                {
                    samples.push((value, along, neighbor));
                }
            }
            for j in self.junctions.iter().filter(|j| j.corridor == corridor.id) {
                if let Some(along) = project(&j.junction) {
                    samples.push((j.value, along, &j.junction));
                }
            }

            let mut direction = 0.0_f32;
            for (i, a) in samples.iter().enumerate() {
                for b in &samples[i + 1..] {
                    let (lo, hi) = if a.0 < b.0 { (a, b) } else { (b, a) };
                    if lo.0 == hi.0 {
                        continue;
                    }
                    let delta = hi.1 - lo.1;
                    if delta == 0.0 {
                        continue;
                    }
                    if direction == 0.0 {
                        direction = delta.signum();
                    } else if delta.signum() != direction {
                        return Err(WayError::Load(format!(
                            "junction table disagrees with coordinates on {}: {} ({}) and {} ({}) are out of order",
                            corridor.id, lo.2, lo.0, hi.2, hi.0
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Room number embedded in an identifier: the digits after the first `c`
/// that is followed by a digit (`"c203"` → 203).  Identifiers are expected
/// to be normalized (lowercase).
pub fn room_number(id: &str) -> Option<f32> {
    let bytes = id.as_bytes();
    let start = bytes
        .windows(2)
        .position(|w| w[0] == b'c' && w[1].is_ascii_digit())?
        + 1;
    let digits: String = id[start..].chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<u32>().ok().map(|n| n as f32)
}
