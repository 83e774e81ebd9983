//! [`NavigationSession`] – one traveler, one active route.
//!
//! The session owns the graph, the active [`Route`] with its
//! [`ProgressTracker`], and the chosen destination.  Every input (detected
//! steps, explicit skips, heading samples, scanned codes) goes through a
//! method here, and every visible effect leaves through a collaborator:
//!
//! 1. **Plan** – [`navigate`](NavigationSession::navigate),
//!    [`load_route`](NavigationSession::load_route) or
//!    [`relocalize`](NavigationSession::relocalize) install a new route,
//!    bumping the route generation and resetting progress to `Active(0, 0)`.
//! 2. **Advance** – steps and skips move the tracker.
//! 3. **Report** – each change renders a [`RenderFrame`], speaks through
//!    the [`Announcer`] (once per generation and segment), and publishes a
//!    [`NavEvent`] on the bus.
//!
//! Wrap the session in a [`SessionHandle`](crate::handle::SessionHandle) to
//! share it between tasks.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use wayfinder_guidance::{Language, Phrase};
use wayfinder_map::Graph;
use wayfinder_middleware::{EventBus, Topic};
use wayfinder_tracking::{
    AccelSample, Advance, HeadingMonitor, ProgressState, ProgressTracker, StepDetector,
    segment_bearing,
};
use wayfinder_types::{LocalPoint, NavEvent, NavPayload, NodeId, Route, RouteExchange, WayError};

use crate::announcer::{Announcer, Spot};
use crate::collaborators::{MarkerKind, RenderFrame, RenderSink, SpeechSink};
use crate::config::EngineConfig;
use crate::planner::{plan_route, resolve};
use crate::relocalize::plan_relocalization;

const SOURCE: &str = "wayfinder-runtime::session";

/// Route and progress, replaced together.
#[derive(Debug, Clone)]
struct ActiveRoute {
    route: Route,
    tracker: ProgressTracker,
}

pub struct NavigationSession {
    graph: Arc<Graph>,
    config: EngineConfig,
    active: Option<ActiveRoute>,
    destination: Option<NodeId>,
    generation: u64,
    detector: StepDetector,
    monitor: HeadingMonitor,
    announcer: Announcer,
    speech: Arc<dyn SpeechSink>,
    render: Arc<dyn RenderSink>,
    bus: EventBus,
}

impl NavigationSession {
    pub fn new(
        graph: Arc<Graph>,
        config: EngineConfig,
        speech: Arc<dyn SpeechSink>,
        render: Arc<dyn RenderSink>,
        bus: EventBus,
    ) -> Self {
        Self {
            detector: StepDetector::new(config.step_threshold, config.step_refractory),
            monitor: HeadingMonitor::new(
                config.heading_threshold_deg,
                config.heading_cooldown,
                config.heading_period,
            ),
            announcer: Announcer::new(config.voice_enabled, config.language),
            graph,
            config,
            active: None,
            destination: None,
            generation: 0,
            speech,
            render,
            bus,
        }
    }

    // -----------------------------------------------------------------------
    // Planning
    // -----------------------------------------------------------------------

    /// Plan from `start` to `destination` and make it the active route.
    ///
    /// On error the previous route, progress and destination are kept.
    pub fn navigate(&mut self, start: &str, destination: &str) -> Result<&Route, WayError> {
        let route = plan_route(&self.graph, start, destination, self.config.hop_distance_m)?;
        let destination = resolve(&self.graph, destination)?;
        Ok(self.install(route, Some(destination)))
    }

    /// Drive the session with a route built elsewhere.
    ///
    /// Exchange objects without a `path` carry points only: instructions fall
    /// back to the generic phrase and there is no destination to relocalize
    /// towards.
    pub fn load_route(&mut self, exchange: RouteExchange) -> &Route {
        let route = Route::from(exchange);
        let destination = route.destination().cloned();
        if destination.is_none() {
            info!(points = route.points.len(), "legacy route loaded without a node path");
        }
        self.install(route, destination)
    }

    /// Re-plan from the position named by a scanned `code`, keeping the
    /// destination.
    ///
    /// # Errors
    ///
    /// [`WayError::InvalidLocation`], [`WayError::NoDestination`] or
    /// [`WayError::NoRoute`]; the active route and progress are unchanged.
    pub fn relocalize(&mut self, code: &str) -> Result<&Route, WayError> {
        let relocation = plan_relocalization(
            &self.graph,
            code,
            self.destination.as_ref(),
            self.config.hop_distance_m,
        )?;
        self.bus.notify(
            Topic::Guidance,
            NavEvent::new(
                SOURCE,
                NavPayload::Relocalized {
                    position: relocation.position.clone(),
                    destination: relocation.destination.clone(),
                    hops: relocation.hops(),
                },
            ),
        );
        Ok(self.install(relocation.route, Some(relocation.destination)))
    }

    /// Replace route, progress and destination in one go.
    fn install(&mut self, route: Route, destination: Option<NodeId>) -> &Route {
        self.generation += 1;
        self.detector.reset();
        info!(
            generation = self.generation,
            segments = route.segment_count(),
            distance = route.distance,
            "route installed"
        );
        self.bus.notify(
            Topic::Progress,
            NavEvent::new(
                SOURCE,
                NavPayload::RouteStarted {
                    start: route.start().cloned(),
                    destination: destination.clone(),
                    segments: route.segment_count(),
                    distance: route.distance,
                },
            ),
        );
        self.destination = destination;
        let active = ActiveRoute {
            tracker: ProgressTracker::new(&route),
            route,
        };
        if active.tracker.is_arrived() {
            self.publish_arrival(&active);
        }
        self.report(&active);
        &self.active.insert(active).route
    }

    // -----------------------------------------------------------------------
    // Advancing
    // -----------------------------------------------------------------------

    /// Feed one accelerometer sample.  Returns the advance when the sample
    /// completed a step.
    pub fn on_accel(&mut self, sample: AccelSample, now: Instant) -> Option<Advance> {
        if self.active.is_none() || !self.detector.observe(sample, now) {
            return None;
        }
        Some(self.step())
    }

    /// Credit one detected step.
    pub fn step(&mut self) -> Advance {
        let length = self.config.step_length_m;
        self.advance_with(|t| t.step_advance(length))
    }

    /// Jump to the next segment.
    pub fn skip(&mut self) -> Advance {
        self.advance_with(ProgressTracker::skip)
    }

    fn advance_with(&mut self, f: impl FnOnce(&mut ProgressTracker) -> Advance) -> Advance {
        let Some(mut active) = self.active.take() else {
            return Advance::Ignored;
        };
        let advance = f(&mut active.tracker);
        match advance {
            Advance::SegmentChanged(segment) => {
                let instruction = active.route.instruction(segment).map(str::to_string);
                self.bus.notify(
                    Topic::Progress,
                    NavEvent::new(SOURCE, NavPayload::SegmentChanged { segment, instruction }),
                );
                self.report(&active);
            }
            Advance::Arrived => {
                self.publish_arrival(&active);
                self.report(&active);
            }
            Advance::Moved => self.render.render(&Self::frame_of(&active)),
            Advance::Ignored => {}
        }
        self.active = Some(active);
        advance
    }

    fn publish_arrival(&self, active: &ActiveRoute) {
        let distance = active.route.distance;
        info!(destination = ?self.destination.as_ref().map(NodeId::as_str), distance, "arrived");
        self.bus.notify(
            Topic::Progress,
            NavEvent::new(
                SOURCE,
                NavPayload::Arrived {
                    destination: self.destination.clone(),
                    distance,
                },
            ),
        );
    }

    // -----------------------------------------------------------------------
    // Heading
    // -----------------------------------------------------------------------

    /// Compare the device heading with the current segment's bearing.
    ///
    /// Returns the deviation when a wrong-direction alert fired.  Never
    /// changes progress.
    pub fn check_heading(&mut self, heading_deg: f32, now: Instant) -> Option<f32> {
        let active = self.active.as_ref()?;
        let segment = active.tracker.segment()?;
        let from = *active.route.points.get(segment)?;
        let to = *active.route.points.get(segment + 1)?;
        let expected = segment_bearing(from, to)?;
        let deviation = self.monitor.check(heading_deg, expected, now)?;
        warn!(heading_deg, expected, deviation, "traveler is facing the wrong way");
        self.bus.notify(
            Topic::Alerts,
            NavEvent::new(SOURCE, NavPayload::WrongDirection { deviation_deg: deviation }),
        );
        Some(deviation)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn route(&self) -> Option<&Route> {
        self.active.as_ref().map(|a| &a.route)
    }

    pub fn state(&self) -> Option<ProgressState> {
        self.active.as_ref().map(|a| a.tracker.state())
    }

    pub fn destination(&self) -> Option<&NodeId> {
        self.destination.as_ref()
    }

    /// Incremented every time a route is installed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Dead-reckoned position in the overlay frame.
    pub fn position(&self) -> Option<LocalPoint> {
        let active = self.active.as_ref()?;
        active.tracker.position(&active.route)
    }

    /// Text for the current segment in the session language.
    pub fn current_text(&self) -> Option<String> {
        self.active.as_ref().map(|active| self.text_of(active))
    }

    fn text_of(&self, active: &ActiveRoute) -> String {
        let language = self.announcer.language();
        match active.tracker.segment() {
            Some(i) => language.segment_text(active.route.instruction(i)),
            None => language.phrase(Phrase::Arrived).to_string(),
        }
    }

    /// `Step i / n | Distance: Dm`, or the total distance once arrived.
    pub fn progress_label(&self) -> Option<String> {
        let active = self.active.as_ref()?;
        Some(self.announcer.language().progress_label(
            active.tracker.segment(),
            active.route.segment_count(),
            active.route.distance,
        ))
    }

    pub fn export(&self) -> Option<RouteExchange> {
        self.route().map(Route::to_exchange)
    }

    // -----------------------------------------------------------------------
    // Voice and language
    // -----------------------------------------------------------------------

    pub fn voice_enabled(&self) -> bool {
        self.announcer.is_enabled()
    }

    /// Flip speech on or off; returns the new setting.  Turning it on says
    /// so.
    pub fn toggle_voice(&mut self) -> bool {
        let enabled = !self.announcer.is_enabled();
        self.announcer.set_enabled(enabled);
        if enabled {
            let language = self.announcer.language();
            self.speech.speak(language.phrase(Phrase::VoiceEnabled), language);
        }
        debug!(enabled, "voice toggled");
        enabled
    }

    pub fn language(&self) -> Language {
        self.announcer.language()
    }

    /// Switch the speech language.  The current instruction of an active
    /// route is spoken again in the new language.
    pub fn set_language(&mut self, language: Language) {
        if language == self.announcer.language() {
            return;
        }
        self.announcer.set_language(language);
        if let Some(active) = self.active.take() {
            self.announcer.reset();
            self.report(&active);
            self.active = Some(active);
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// Render `active` and speak it if its spot is new.
    fn report(&mut self, active: &ActiveRoute) {
        self.render.render(&Self::frame_of(active));
        let spot = match active.tracker.segment() {
            Some(i) => Spot::Segment(i),
            None => Spot::Arrived,
        };
        if self.announcer.should_speak(self.generation, spot) {
            self.speech.speak(&self.text_of(active), self.announcer.language());
        }
    }

    /// Current overlay frame; `None` without an active route.
    pub fn frame(&self) -> Option<RenderFrame> {
        self.active.as_ref().map(Self::frame_of)
    }

    fn frame_of(active: &ActiveRoute) -> RenderFrame {
        let route = &active.route;
        let segment = active.tracker.segment();
        let segments = route.segment_count();
        let (segment_start, segment_end, marker) = match segment {
            Some(i) => {
                let marker = if i + 1 == segments {
                    MarkerKind::Destination
                } else {
                    MarkerKind::Turn
                };
                (route.points.get(i).copied(), route.points.get(i + 1).copied(), marker)
            }
            None => (None, route.points.last().copied(), MarkerKind::Destination),
        };
        RenderFrame {
            points: route.points.clone(),
            segment,
            segments,
            arrived: active.tracker.is_arrived(),
            segment_start,
            segment_end,
            marker: Some(marker),
            position: active.tracker.position(route),
        }
    }
}
