//! `wayfinder-runtime` – the navigation session and its plumbing.
//!
//! # Modules
//!
//! - [`planner`] – resolve node names and turn BFS paths into [`Route`]s.
//! - [`relocalize`] – pure re-planning from a scanned position code.
//! - [`session`] – [`NavigationSession`]: route, progress, speech, overlay
//!   frames and bus events for one traveler.
//! - [`handle`] – [`SessionHandle`]: the session behind an async mutex so
//!   step, heading and scan tasks never interleave a relocalization.
//! - [`scan`] – [`ScanCoordinator`]: one decoded code per scan, with the
//!   scanner stopped and cleared in between.
//! - [`announcer`] – speak each `(route, segment)` once.
//! - [`collaborators`] – the [`RenderSink`], [`SpeechSink`] and
//!   [`ScanSource`] seams.
//! - [`sim`] – recording collaborators for headless use.
//! - [`telemetry`] – [`init_tracing`] with optional OTLP export.
//!
//! [`Route`]: wayfinder_types::Route

pub mod announcer;
pub mod collaborators;
pub mod config;
pub mod handle;
pub mod planner;
pub mod relocalize;
pub mod scan;
pub mod session;
pub mod sim;
pub mod telemetry;

pub use announcer::{Announcer, Spot};
pub use collaborators::{MarkerKind, RenderFrame, RenderSink, ScanConfig, ScanSource, SpeechSink};
pub use config::{DEFAULT_HOP_DISTANCE_M, DEFAULT_STEP_LENGTH_M, EngineConfig};
pub use handle::SessionHandle;
pub use planner::{build_route, plan_route, resolve};
pub use relocalize::{Relocation, plan_relocalization};
pub use scan::ScanCoordinator;
pub use session::NavigationSession;
pub use sim::{ScanCall, SimRender, SimScanner, SimSpeech};
pub use telemetry::{TracerProviderGuard, init_tracing};
