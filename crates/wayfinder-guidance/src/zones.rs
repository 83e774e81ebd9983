//! Compass-and-metres directions on a grid floor ([`ZoneLayout`]).
//!
//! Three shapes of trip:
//!
//! 1. same corridor: walk straight to the door;
//! 2. from a vertical corridor: walk to the destination's row, turn onto it,
//!    walk to the door;
//! 3. between rows: walk to the vertical corridor that serves the
//!    destination (its own corridor, or the zone containing its `x`), take it
//!    to the destination's row, turn onto the row and walk to the door.
//!
//! Turns are worked out from the compass heading before and after, so a
//! northbound traveler turning east is told "right".

use std::fmt;

use tracing::debug;
use wayfinder_map::{CorridorAxis, Turn, ZoneLayout};
use wayfinder_types::{NodeId, Side, WayError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    North,
    East,
    South,
    West,
}

impl Compass {
    /// `y` grows southwards on the floor plan.
    fn along_y(from: f32, to: f32) -> Self {
        if to > from { Compass::South } else { Compass::North }
    }

    fn along_x(from: f32, to: f32) -> Self {
        if to > from { Compass::East } else { Compass::West }
    }

    fn clockwise(self) -> Self {
        match self {
            Compass::North => Compass::East,
            Compass::East => Compass::South,
            Compass::South => Compass::West,
            Compass::West => Compass::North,
        }
    }

    /// Turn taken from facing `self` to facing `next`; `None` for a U-turn.
    fn turn_to(self, next: Compass) -> Option<Turn> {
        if next == self {
            Some(Turn::Forward)
        } else if next == self.clockwise() {
            Some(Turn::Right)
        } else if next.clockwise() == self {
            Some(Turn::Left)
        } else {
            None
        }
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Compass::North => "north",
            Compass::East => "east",
            Compass::South => "south",
            Compass::West => "west",
        })
    }
}

/// One line of grid-floor directions.  Rendered through [`fmt::Display`].
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneStep {
    Exit { room: NodeId },
    Walk {
        metres: f32,
        heading: Option<Compass>,
        corridor: Option<NodeId>,
    },
    /// Entering `corridor`; `turn` is `None` when there was no previous
    /// heading to turn from.
    Enter {
        turn: Option<Turn>,
        heading: Compass,
        corridor: NodeId,
    },
    Arrive { room: NodeId, side: Option<Side> },
}

fn shout(id: &NodeId) -> String {
    id.as_str().to_uppercase()
}

impl fmt::Display for ZoneStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneStep::Exit { room } => write!(f, "Exit {}.", shout(room)),
            ZoneStep::Walk {
                metres,
                heading,
                corridor,
            } => {
                write!(f, "Walk {metres} meters")?;
                match heading {
                    Some(h) => write!(f, " {h}")?,
                    None => f.write_str(" straight")?,
                }
                if let Some(c) = corridor {
                    write!(f, " on {}", shout(c))?;
                }
                f.write_str(".")
            }
            ZoneStep::Enter {
                turn: Some(Turn::Left),
                corridor,
                ..
            } => write!(f, "Turn left onto {}.", shout(corridor)),
            ZoneStep::Enter {
                turn: Some(Turn::Right),
                corridor,
                ..
            } => write!(f, "Turn right onto {}.", shout(corridor)),
            ZoneStep::Enter {
                heading, corridor, ..
            } => write!(f, "Head {heading} onto {}.", shout(corridor)),
            ZoneStep::Arrive {
                room,
                side: Some(side),
            } => write!(f, "Destination {} will be on your {side}.", shout(room)),
            ZoneStep::Arrive { room, side: None } => {
                write!(f, "You are now facing {}.", shout(room))
            }
        }
    }
}

/// Directions from room `start` to room `destination` on a grid floor.
///
/// # Errors
///
/// - [`WayError::InvalidLocation`] when either room is not in the layout.
/// - [`WayError::NoRoute`] when the rows cannot be joined: no zone covers
///   the destination, or both rooms sit on different vertical corridors.
pub fn navigate(
    layout: &ZoneLayout,
    start: &str,
    destination: &str,
) -> Result<Vec<ZoneStep>, WayError> {
    let from = layout
        .room(start)
        .ok_or_else(|| WayError::InvalidLocation(start.to_string()))?;
    let to = layout
        .room(destination)
        .ok_or_else(|| WayError::InvalidLocation(destination.to_string()))?;
    let no_route = || WayError::NoRoute {
        from: from.id.to_string(),
        to: to.id.to_string(),
    };
    let (sx, sy) = layout.room_coord(from).ok_or_else(no_route)?;
    let (ex, ey) = layout.room_coord(to).ok_or_else(no_route)?;

    let mut steps = vec![ZoneStep::Exit {
        room: from.id.clone(),
    }];

    if from.corridor == to.corridor {
        steps.push(ZoneStep::Walk {
            metres: ((ex - sx) + (ey - sy)).abs(),
            heading: None,
            corridor: None,
        });
        steps.push(ZoneStep::Arrive {
            room: to.id.clone(),
            side: to.side,
        });
        return Ok(steps);
    }

    let start_axis = layout.axis_of(&from.corridor).ok_or_else(no_route)?;
    let end_axis = layout.axis_of(&to.corridor).ok_or_else(no_route)?;

    let mut heading = None;
    let (cx, vertical) = match start_axis {
        CorridorAxis::Vertical if end_axis == CorridorAxis::Vertical => return Err(no_route()),
        CorridorAxis::Vertical => (sx, from.corridor.clone()),
        CorridorAxis::Horizontal => {
            let v = match end_axis {
                CorridorAxis::Vertical => layout.vertical(&to.corridor),
                CorridorAxis::Horizontal => layout.vertical_for(ex),
            }
            .ok_or_else(no_route)?;
            if v.x != sx {
                let h = Compass::along_x(sx, v.x);
                steps.push(ZoneStep::Walk {
                    metres: (v.x - sx).abs(),
                    heading: Some(h),
                    corridor: Some(from.corridor.clone()),
                });
                heading = Some(h);
            }
            let down = Compass::along_y(sy, ey);
            steps.push(ZoneStep::Enter {
                turn: heading.and_then(|h| h.turn_to(down)),
                heading: down,
                corridor: v.id.clone(),
            });
            (v.x, v.id.clone())
        }
    };

    if ey != sy {
        let h = Compass::along_y(sy, ey);
        steps.push(ZoneStep::Walk {
            metres: (ey - sy).abs(),
            heading: Some(h),
            corridor: None,
        });
        heading = Some(h);
    }

    if end_axis == CorridorAxis::Horizontal && ex != cx {
        let across = Compass::along_x(cx, ex);
        steps.push(ZoneStep::Enter {
            turn: heading.and_then(|h| h.turn_to(across)),
            heading: across,
            corridor: to.corridor.clone(),
        });
        steps.push(ZoneStep::Walk {
            metres: (ex - cx).abs(),
            heading: Some(across),
            corridor: None,
        });
    }
    steps.push(ZoneStep::Arrive {
        room: to.id.clone(),
        side: None,
    });

    debug!(from = %from.id, to = %to.id, via = %vertical, steps = steps.len(), "zone directions");
    Ok(steps)
}

/// [`navigate`], rendered to strings.
pub fn navigate_text(
    layout: &ZoneLayout,
    start: &str,
    destination: &str,
) -> Result<Vec<String>, WayError> {
    Ok(navigate(layout, start, destination)?
        .iter()
        .map(ToString::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ZoneLayout {
        ZoneLayout::from_json(
            r#"{
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
                    { "id": "E101", "corridor": "H1", "position": 20 },
                    { "id": "E102", "corridor": "H1", "position": 45, "side": "left" },
                    { "id": "E103", "corridor": "H1", "position": 50 },
                    { "id": "E201", "corridor": "H2", "position": 60 },
                    { "id": "E205", "corridor": "H2", "position": 5 },
                    { "id": "E150", "corridor": "V1", "position": 12 },
                    { "id": "E250", "corridor": "V2", "position": 20 }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn same_corridor_walks_straight() {
        let text = navigate_text(&layout(), "e101", "E-102").unwrap();
        assert_eq!(
            text,
            vec![
                "Exit E101.",
                "Walk 25 meters straight.",
                "Destination E102 will be on your left.",
            ]
        );
    }

    #[test]
    fn rows_join_through_the_destination_zone() {
        let text = navigate_text(&layout(), "E101", "E201").unwrap();
        assert_eq!(
            text,
            vec![
                "Exit E101.",
                "Walk 30 meters east on H1.",
                "Turn right onto V2.",
                "Walk 30 meters south.",
                "Turn left onto H2.",
                "Walk 10 meters east.",
                "You are now facing E201.",
            ]
        );
    }

    #[test]
    fn turns_follow_the_heading() {
        // Northbound on V1, then east along H1: a right turn.
        let text = navigate_text(&layout(), "E150", "E101").unwrap();
        assert_eq!(
            text,
            vec![
                "Exit E150.",
                "Walk 12 meters north.",
                "Turn right onto H1.",
                "Walk 10 meters east.",
                "You are now facing E101.",
            ]
        );
        let back = navigate(&layout(), "E201", "E205").unwrap();
        assert_eq!(back.len(), 3);
        let west = navigate_text(&layout(), "E102", "E205").unwrap();
        assert_eq!(west[1], "Walk 35 meters west on H1.");
        assert_eq!(west[2], "Turn left onto V1.");
        assert_eq!(west[4], "Turn right onto H2.");
    }

    #[test]
    fn door_on_the_junction_skips_the_first_walk() {
        let text = navigate_text(&layout(), "E103", "E201").unwrap();
        assert_eq!(text[1], "Head south onto V2.");
        assert_eq!(text[2], "Walk 30 meters south.");
    }

    #[test]
    fn vertical_destination_uses_its_own_corridor() {
        let text = navigate_text(&layout(), "E101", "E250").unwrap();
        assert_eq!(
            text,
            vec![
                "Exit E101.",
                "Walk 30 meters east on H1.",
                "Turn right onto V2.",
                "Walk 20 meters south.",
                "You are now facing E250.",
            ]
        );
    }

    #[test]
    fn unknown_rooms_and_unjoinable_rows_are_errors() {
        let layout = layout();
        assert_eq!(
            navigate(&layout, "E999", "E101"),
            Err(WayError::InvalidLocation("E999".to_string()))
        );
        assert!(matches!(
            navigate(&layout, "E150", "E250"),
            Err(WayError::NoRoute { .. })
        ));
        let mut narrow = layout.clone();
        narrow.zones.truncate(1);
        assert!(matches!(
            navigate(&narrow, "E101", "E201"),
            Err(WayError::NoRoute { .. })
        ));
    }
}
