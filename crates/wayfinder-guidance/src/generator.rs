//! Turn-by-turn instruction generation.
//!
//! One [`Instruction`] per adjacent pair of the path.  Three cases:
//!
//! 1. leaving a room: exit into the corridor;
//! 2. corridor to corridor: the turn taken on the current corridor and the
//!    distance walked along it;
//! 3. corridor to room (arrival): the turn and distance when worth saying,
//!    followed by the side of the corridor the room is on.

use std::fmt;

use tracing::debug;
use wayfinder_map::{Graph, Turn};
use wayfinder_types::{NodeId, NodeKind, Side};

use crate::distance::distance_of;
use crate::side::{side_of, walking_direction_of};
use crate::turns::turn_of;

/// Movement part of an instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Maneuver {
    ExitRoom { room: NodeId },
    Follow { turn: Turn, distance_m: f32 },
}

/// One spoken/displayed instruction.  Rendered through [`fmt::Display`].
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub maneuver: Option<Maneuver>,
    /// Present on the final transition: which side the destination is on,
    /// if known.
    pub arrival: Option<Option<Side>>,
}

impl Instruction {
    fn exit(room: &NodeId) -> Self {
        Self {
            maneuver: Some(Maneuver::ExitRoom { room: room.clone() }),
            arrival: None,
        }
    }

    fn follow(turn: Turn, distance_m: f32) -> Self {
        Self {
            maneuver: Some(Maneuver::Follow { turn, distance_m }),
            arrival: None,
        }
    }

    pub fn is_arrival(&self) -> bool {
        self.arrival.is_some()
    }
}

impl fmt::Display for Maneuver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Maneuver::ExitRoom { room } => {
                write!(f, "Exit {} and enter the corridor.", room.as_str().to_uppercase())
            }
            Maneuver::Follow { turn, distance_m } => {
                match turn {
                    Turn::Left => f.write_str("Turn left and follow the corridor")?,
                    Turn::Right => f.write_str("Turn right and follow the corridor")?,
                    Turn::Forward => f.write_str("Walk straight along the corridor")?,
                }
                if *distance_m > 0.0 {
                    write!(f, " for {distance_m}m")?;
                }
                f.write_str(".")
            }
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(maneuver) = &self.maneuver {
            write!(f, "{maneuver}")?;
            if self.arrival.is_some() {
                f.write_str(" ")?;
            }
        }
        match self.arrival {
            Some(Some(side)) => write!(f, "Your destination is on your {side}."),
            Some(None) => f.write_str("Your destination is just ahead."),
            None => Ok(()),
        }
    }
}

/// Instructions for `path`; exactly `path.len() - 1` of them (none for a
/// path of fewer than two nodes).
pub fn generate(graph: &Graph, path: &[NodeId]) -> Vec<Instruction> {
    let room_width = graph.profile().room_width;
    let mut out = Vec::with_capacity(path.len().saturating_sub(1));

    for (i, pair) in path.windows(2).enumerate() {
        let (current, next) = (&pair[0], &pair[1]);
        let prev = i.checked_sub(1).map(|j| &path[j]);

        let instruction = match (graph.kind_of(current), graph.kind_of(next)) {
            (Some(NodeKind::Room), _) => Instruction::exit(current),
            (_, Some(NodeKind::Room)) => {
                let turn = turn_of(graph, prev, current);
                let distance = distance_of(graph, prev, next, current);
                let maneuver = match turn {
                    Turn::Left | Turn::Right => Some(Maneuver::Follow { turn, distance_m: distance }),
                    Turn::Forward if distance > room_width => Some(Maneuver::Follow {
                        turn,
                        distance_m: distance,
                    }),
                    Turn::Forward => None,
                };
                let direction = walking_direction_of(graph, current, prev);
                Instruction {
                    maneuver,
                    arrival: Some(side_of(graph, direction, next, current)),
                }
            }
            _ => Instruction::follow(
                turn_of(graph, prev, current),
                distance_of(graph, prev, next, current),
            ),
        };
        debug!(step = i, from = %current, to = %next, text = %instruction, "instruction");
        out.push(instruction);
    }
    out
}

/// [`generate`], rendered to strings for a [`Route`](wayfinder_types::Route).
pub fn generate_text(graph: &Graph, path: &[NodeId]) -> Vec<String> {
    generate(graph, path).iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_map::{BLOCK_C_MAP, bfs, bfs_raw};

    fn scenario() -> Graph {
        Graph::from_json(
            r#"{
                "nodes": {
                    "c201": {"type": "room", "neighbors": ["corridor_right"]},
                    "corridor_right": {"type": "corridor", "neighbors": ["c201", "c203"]},
                    "c203": {"type": "room", "neighbors": ["corridor_right"]}
                },
                "coordinates": {
                    "c201": {"x": 2, "z": 0},
                    "corridor_right": {"x": 0, "z": 5},
                    "c203": {"x": 2, "z": 10}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn scenario_gives_two_instructions() {
        let g = scenario();
        let path = bfs_raw(&g, "c201", "c203").unwrap();
        let text = generate_text(&g, &path);
        assert_eq!(text.len(), 2);
        assert!(text[0].contains("Exit C201"));
        assert_eq!(
            text[1],
            "Walk straight along the corridor for 10m. Your destination is just ahead."
        );
    }

    #[test]
    fn across_three_corridors() {
        let g = Graph::from_json(BLOCK_C_MAP).unwrap();
        let path = bfs_raw(&g, "c201", "c214").unwrap();
        let text = generate_text(&g, &path);
        assert_eq!(
            text,
            vec![
                "Exit C201 and enter the corridor.",
                "Walk straight along the corridor for 37.5m.",
                "Turn left and follow the corridor for 7.5m.",
                "Turn left and follow the corridor for 17.5m. Your destination is on your right.",
            ]
        );
    }

    #[test]
    fn zero_distance_turn_omits_the_distance() {
        let g = Graph::from_json(BLOCK_C_MAP).unwrap();
        let path = bfs_raw(&g, "c201", "c209").unwrap();
        let last = generate(&g, &path).pop().unwrap();
        assert_eq!(
            last.to_string(),
            "Turn left and follow the corridor. Your destination is on your right."
        );
        assert!(last.is_arrival());
    }

    #[test]
    fn short_straight_arrival_has_only_the_side() {
        let g = Graph::from_json(BLOCK_C_MAP).unwrap();
        let path = bfs_raw(&g, "c204", "c205").unwrap();
        let last = generate(&g, &path).pop().unwrap();
        assert!(last.maneuver.is_none());
        assert_eq!(last.to_string(), "Your destination is on your right.");
    }

    #[test]
    fn count_matches_transitions_for_every_pair() {
        let g = Graph::from_json(BLOCK_C_MAP).unwrap();
        for a in g.ids() {
            for b in g.ids() {
                let path = bfs(&g, a, b).unwrap();
                let instructions = generate(&g, &path);
                assert_eq!(instructions.len(), path.len() - 1, "{a} -> {b}");
                let arrives_from_corridor = path.len() > 1
                    && g.kind_of(b) == Some(NodeKind::Room)
                    && g.kind_of(&path[path.len() - 2]) == Some(NodeKind::Corridor);
                if arrives_from_corridor {
                    assert!(instructions.last().unwrap().is_arrival(), "{a} -> {b}");
                }
            }
        }
    }

    #[test]
    fn trivial_paths_have_no_instructions() {
        let g = Graph::from_json(BLOCK_C_MAP).unwrap();
        assert!(generate(&g, &[]).is_empty());
        assert!(generate(&g, &[NodeId::from("c201")]).is_empty());
    }
}
