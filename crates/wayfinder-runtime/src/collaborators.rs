//! Narrow interfaces to the world outside the engine.
//!
//! The engine never draws, speaks or opens a camera itself.  It hands
//! frames to a [`RenderSink`], text to a [`SpeechSink`], and asks a
//! [`ScanSource`] for decoded position codes.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use wayfinder_guidance::Language;
use wayfinder_types::{LocalPoint, WayError};

// ────────────────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────────────────

/// Marker drawn at the end of the current segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// An intermediate waypoint; the traveler turns or continues here.
    Turn,
    /// The route's final point.
    Destination,
}

/// Everything a renderer needs to draw the overlay for one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// All route points in the overlay frame.
    pub points: Vec<LocalPoint>,
    /// Current segment index; `None` once arrived.
    pub segment: Option<usize>,
    pub segments: usize,
    pub arrived: bool,
    /// Start and end of the current segment.
    pub segment_start: Option<LocalPoint>,
    pub segment_end: Option<LocalPoint>,
    pub marker: Option<MarkerKind>,
    /// Dead-reckoned traveler position.
    pub position: Option<LocalPoint>,
}

pub trait RenderSink: Send + Sync {
    fn render(&self, frame: &RenderFrame);
}

// ────────────────────────────────────────────────────────────────────────────
// Speech
// ────────────────────────────────────────────────────────────────────────────

/// Fire-and-forget text-to-speech.  Implementations cancel whatever they
/// were saying before.
pub trait SpeechSink: Send + Sync {
    fn speak(&self, text: &str, language: Language);
}

// ────────────────────────────────────────────────────────────────────────────
// Scanning
// ────────────────────────────────────────────────────────────────────────────

/// Camera scanner settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub frames_per_second: u32,
    /// Side of the square scan region, in pixels.
    pub box_size: u32,
    /// Give up after this many milliseconds without a decode.
    pub timeout_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 10,
            box_size: 250,
            timeout_ms: 30_000,
        }
    }
}

/// A code scanner.
///
/// # Contract
///
/// * `start` – begin scanning and return the stream of decoded strings.
/// * `stop` – stop the camera; the stream ends.
/// * `clear` – release the scanner's view so a new `start` can attach.
///
/// Callers stop and clear a running scanner before starting it again.
#[async_trait]
pub trait ScanSource: Send + Sync {
    async fn start(&self, config: &ScanConfig) -> Result<BoxStream<'static, String>, WayError>;

    async fn stop(&self) -> Result<(), WayError>;

    async fn clear(&self) -> Result<(), WayError>;
}
