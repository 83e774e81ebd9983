//! Terminal stand-ins for the speaker and the AR overlay.

use colored::Colorize;

use wayfinder_guidance::Language;
use wayfinder_runtime::{MarkerKind, RenderFrame, RenderSink, SpeechSink};

/// Prints spoken lines instead of synthesizing them.
pub struct ConsoleSpeech;

impl SpeechSink for ConsoleSpeech {
    fn speak(&self, text: &str, language: Language) {
        println!("  {} {} {}", "say".magenta().bold(), format!("[{language}]").dimmed(), text.bold());
    }
}

/// Prints a one-line summary of each overlay frame.
pub struct ConsoleRender;

impl RenderSink for ConsoleRender {
    fn render(&self, frame: &RenderFrame) {
        println!("  {}", describe(frame).dimmed());
    }
}

pub(crate) fn describe(frame: &RenderFrame) -> String {
    let position = frame
        .position
        .map(|p| format!("({:.1}, {:.1})", p.x, p.z))
        .unwrap_or_else(|| "-".to_string());
    match (frame.segment, frame.segment_end, frame.marker) {
        (Some(i), Some(end), marker) => {
            let marker = match marker {
                Some(MarkerKind::Destination) => "destination",
                _ => "turn",
            };
            format!(
                "overlay: segment {}/{} at {position}, {marker} marker at ({:.1}, {:.1})",
                i + 1,
                frame.segments,
                end.x,
                end.z
            )
        }
        _ if frame.arrived => format!("overlay: arrived at {position}"),
        _ => format!("overlay: {} points", frame.points.len()),
    }
}
