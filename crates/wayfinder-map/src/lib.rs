//! `wayfinder-map` – the building graph and everything computed directly
//! from it.
//!
//! # Modules
//!
//! - [`graph`] – [`Graph`][graph::Graph]: immutable rooms-and-corridors
//!   graph with its coordinate table, validated at construction.
//! - [`profile`] – [`BuildingProfile`][profile::BuildingProfile]: the
//!   named-corridor turn, side, direction and junction-distance tables.
//! - [`loader`] – [`load`][loader::load]: one-time fetch of a map file from
//!   disk or HTTP(S).
//! - [`pathfind`] – [`bfs`][pathfind::bfs]: deterministic fewest-hop routes.
//! - [`coords`] – [`synthesize`][coords::synthesize]: route points in the
//!   overlay's local frame.
//! - [`zones`] – [`ZoneLayout`][zones::ZoneLayout]: grid floors described by
//!   straight corridors and x-bands instead of a node graph.

pub mod coords;
pub mod graph;
pub mod loader;
pub mod pathfind;
pub mod profile;
pub mod zones;

pub use coords::synthesize;
pub use graph::{Graph, MapDocument, Node, RawNode};
pub use loader::{MapSource, load, load_zones};
pub use pathfind::{bfs, bfs_raw};
pub use profile::{Axis, BuildingProfile, Turn, WalkingDirection, room_number};
pub use zones::{CorridorAxis, ZoneLayout, ZoneRoom};

/// The Block C floor map shipped with the engine.
pub const BLOCK_C_MAP: &str = include_str!("../maps/block_c.json");
