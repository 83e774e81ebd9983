//! [`ZoneLayout`] – a grid floor described by straight corridors instead of
//! a node graph.
//!
//! Block E is laid out as horizontal corridors (fixed `y`) crossed by
//! vertical ones (fixed `x`).  Rooms sit at a metre position along their
//! corridor, and the floor is split into x-bands ("zones") that name the
//! vertical corridor used to change rows inside that band.  `y` grows
//! southwards and `x` eastwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;
use wayfinder_types::{NodeId, Side, WayError};

/// Horizontal corridor: every point has the same `y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCorridor {
    pub id: NodeId,
    pub y: f32,
}

/// Vertical corridor: every point has the same `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalCorridor {
    pub id: NodeId,
    pub x: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Corridors {
    #[serde(default)]
    pub horizontal: Vec<HorizontalCorridor>,
    #[serde(default)]
    pub vertical: Vec<VerticalCorridor>,
}

/// The band `min_x <= x < max_x` and the vertical corridor serving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub min_x: f32,
    pub max_x: f32,
    pub vertical: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRoom {
    pub id: NodeId,
    pub corridor: NodeId,
    /// Metres along the corridor: `x` on a horizontal one, `y` on a
    /// vertical one.
    pub position: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

/// Which way a corridor runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorridorAxis {
    Horizontal,
    Vertical,
}

/// The parsed zone map file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneLayout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    pub corridors: Corridors,
    #[serde(default)]
    pub zones: Vec<Zone>,
    pub rooms: Vec<ZoneRoom>,
}

impl ZoneLayout {
    /// Parse and validate a zone map.
    ///
    /// # Errors
    ///
    /// [`WayError::Load`] for malformed JSON, duplicate ids, rooms on unknown
    /// corridors, empty or overlapping zones, and zones naming a corridor
    /// that is not vertical.
    pub fn from_json(json: &str) -> Result<Self, WayError> {
        let layout: ZoneLayout = serde_json::from_str(json)
            .map_err(|e| WayError::Load(format!("malformed zone map JSON: {e}")))?;
        layout.validate()?;
        info!(
            building = layout.building.as_deref().unwrap_or("unnamed"),
            rooms = layout.rooms.len(),
            zones = layout.zones.len(),
            "zone layout ready"
        );
        Ok(layout)
    }

    fn validate(&self) -> Result<(), WayError> {
        let mut corridors = HashSet::new();
        let corridor_ids = self
            .corridors
            .horizontal
            .iter()
            .map(|c| &c.id)
            .chain(self.corridors.vertical.iter().map(|c| &c.id));
        for id in corridor_ids {
            if !corridors.insert(id) {
                return Err(WayError::Load(format!("corridor {id} is declared twice")));
            }
        }

        let mut rooms = HashSet::new();
        for room in &self.rooms {
            if !rooms.insert(&room.id) {
                return Err(WayError::Load(format!("room {} is declared twice", room.id)));
            }
            if !corridors.contains(&room.corridor) {
                return Err(WayError::Load(format!(
                    "room {} is on unknown corridor {}",
                    room.id, room.corridor
                )));
            }
        }

        let mut bands: Vec<&Zone> = self.zones.iter().collect();
        bands.sort_by(|a, b| a.min_x.total_cmp(&b.min_x));
        for zone in &bands {
            if zone.min_x.partial_cmp(&zone.max_x) != Some(std::cmp::Ordering::Less) {
                return Err(WayError::Load(format!(
                    "zone {}..{} is empty",
                    zone.min_x, zone.max_x
                )));
            }
            if self.vertical(&zone.vertical).is_none() {
                return Err(WayError::Load(format!(
                    "zone {}..{} names {} which is not a vertical corridor",
                    zone.min_x, zone.max_x, zone.vertical
                )));
            }
        }
        for pair in bands.windows(2) {
            if pair[1].min_x < pair[0].max_x {
                return Err(WayError::Load(format!(
                    "zones {}..{} and {}..{} overlap",
                    pair[0].min_x, pair[0].max_x, pair[1].min_x, pair[1].max_x
                )));
            }
        }
        Ok(())
    }

    /// Room by raw id (normalized like every other identifier).
    pub fn room(&self, raw: &str) -> Option<&ZoneRoom> {
        let id = NodeId::from(raw);
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn vertical(&self, id: &NodeId) -> Option<&VerticalCorridor> {
        self.corridors.vertical.iter().find(|c| &c.id == id)
    }

    pub fn axis_of(&self, corridor: &NodeId) -> Option<CorridorAxis> {
        if self.corridors.horizontal.iter().any(|c| &c.id == corridor) {
            Some(CorridorAxis::Horizontal)
        } else if self.vertical(corridor).is_some() {
            Some(CorridorAxis::Vertical)
        } else {
            None
        }
    }

    /// Floor coordinate `(x, y)` of a room's door.
    pub fn room_coord(&self, room: &ZoneRoom) -> Option<(f32, f32)> {
        if let Some(h) = self.corridors.horizontal.iter().find(|c| c.id == room.corridor) {
            return Some((room.position, h.y));
        }
        self.vertical(&room.corridor).map(|v| (v.x, room.position))
    }

    /// The vertical corridor serving the zone that contains `x`.
    pub fn vertical_for(&self, x: f32) -> Option<&VerticalCorridor> {
        let zone = self.zones.iter().find(|z| x >= z.min_x && x < z.max_x)?;
        self.vertical(&zone.vertical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK_E_LIKE: &str = r#"{
        "building": "Block E",
        "corridors": {
            "horizontal": [{ "id": "H1", "y": 0 }, { "id": "H2", "y": 30 }],
            "vertical": [{ "id": "V1", "x": 10 }, { "id": "V2", "x": 50 }]
        },
        "zones": [
            { "minX": 0, "maxX": 30, "vertical": "V1" },
            { "minX": 30, "maxX": 80, "vertical": "V2" }
        ],
        "rooms": [
            { "id": "E101", "corridor": "H1", "position": 20, "side": "left" },
            { "id": "E102", "corridor": "H1", "position": 45 },
            { "id": "E201", "corridor": "H2", "position": 60 },
            { "id": "E150", "corridor": "V1", "position": 12 }
        ]
    }"#;

    #[test]
    fn coordinates_follow_the_corridor_axis() {
        let layout = ZoneLayout::from_json(BLOCK_E_LIKE).unwrap();
        let e101 = layout.room("e-101").unwrap();
        assert_eq!(layout.room_coord(e101), Some((20.0, 0.0)));
        let e150 = layout.room("E150").unwrap();
        assert_eq!(layout.room_coord(e150), Some((10.0, 12.0)));
        assert_eq!(layout.axis_of(&NodeId::from("v1")), Some(CorridorAxis::Vertical));
        assert_eq!(e101.side, Some(Side::Left));
    }

    #[test]
    fn zones_are_half_open() {
        let layout = ZoneLayout::from_json(BLOCK_E_LIKE).unwrap();
        assert_eq!(layout.vertical_for(29.9).map(|v| v.x), Some(10.0));
        assert_eq!(layout.vertical_for(30.0).map(|v| v.x), Some(50.0));
        assert!(layout.vertical_for(80.0).is_none());
    }

    #[test]
    fn rejects_inconsistent_layouts() {
        let unknown_corridor = BLOCK_E_LIKE.replace(r#""corridor": "H2""#, r#""corridor": "H9""#);
        assert!(matches!(
            ZoneLayout::from_json(&unknown_corridor),
            Err(WayError::Load(_))
        ));
        let overlap = BLOCK_E_LIKE.replace(r#""minX": 30"#, r#""minX": 25"#);
        assert!(matches!(ZoneLayout::from_json(&overlap), Err(WayError::Load(_))));
        let horizontal_zone = BLOCK_E_LIKE.replace(r#""vertical": "V1""#, r#""vertical": "H1""#);
        assert!(matches!(
            ZoneLayout::from_json(&horizontal_zone),
            Err(WayError::Load(_))
        ));
        assert!(ZoneLayout::from_json("{}").is_err());
    }
}
