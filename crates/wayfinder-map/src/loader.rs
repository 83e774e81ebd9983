//! One-time map loading from a file, an HTTP(S) URL, or inline JSON, for
//! both node graphs and grid [`ZoneLayout`]s.
//!
//! This is the only place the engine touches the network.

use std::path::PathBuf;

use tracing::{debug, info};
use wayfinder_types::WayError;

use crate::graph::Graph;
use crate::zones::ZoneLayout;

/// Where a map file comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum MapSource {
    /// A JSON file on disk.
    Path(PathBuf),
    /// A JSON document served over `http://` or `https://`.
    Url(String),
    /// JSON text already in memory (embedded maps, tests).
    Inline(String),
}

impl MapSource {
    /// Interpret a configuration string: URLs by scheme, anything else as a
    /// file path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            MapSource::Url(trimmed.to_string())
        } else {
            MapSource::Path(PathBuf::from(trimmed))
        }
    }

    /// Short human-readable description for logs.
    pub fn describe(&self) -> String {
        match self {
            MapSource::Path(p) => p.display().to_string(),
            MapSource::Url(u) => u.clone(),
            MapSource::Inline(_) => "<inline>".to_string(),
        }
    }
}

/// Fetch and parse the map, then build the validated [`Graph`].
///
/// # Errors
///
/// [`WayError::Load`] when the source cannot be read or fetched, or when the
/// document is malformed or inconsistent.
pub async fn load(source: &MapSource) -> Result<Graph, WayError> {
    let graph = Graph::from_json(&read(source).await?)?;
    info!(source = %source.describe(), nodes = graph.len(), "map loaded");
    Ok(graph)
}

/// Fetch and parse a grid floor's [`ZoneLayout`].
///
/// # Errors
///
/// As [`load`].
pub async fn load_zones(source: &MapSource) -> Result<ZoneLayout, WayError> {
    let layout = ZoneLayout::from_json(&read(source).await?)?;
    info!(source = %source.describe(), rooms = layout.rooms.len(), "zone map loaded");
    Ok(layout)
}

async fn read(source: &MapSource) -> Result<String, WayError> {
    debug!(source = %source.describe(), "loading map");
    match source {
        MapSource::Path(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| WayError::Load(format!("cannot read {}: {e}", path.display()))),
        MapSource::Url(url) => fetch(url).await,
        MapSource::Inline(json) => Ok(json.clone()),
    }
}

async fn fetch(url: &str) -> Result<String, WayError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| WayError::Load(format!("cannot fetch {url}: {e}")))?
        .error_for_status()
        .map_err(|e| WayError::Load(format!("map server refused {url}: {e}")))?;
    response
        .text()
        .await
        .map_err(|e| WayError::Load(format!("cannot read body of {url}: {e}")))
}
