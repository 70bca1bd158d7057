//! The stage: viewport, camera, animated rig, timelines and scroll state,
//! advanced once per animation frame in a fixed order.

use crate::core::camera::Camera;
use crate::core::choreography::{initial_rig, intro_timeline, scroll_tracks, TrackKind};
use crate::core::clip::NodeAnimator;
use crate::core::constants::{LOAD_TIMEOUT_SEC, MODEL_SCALE, SCRUB_SMOOTHING};
use crate::core::error::{AssetLoadError, StageError};
use crate::core::parallax::{CursorState, ParallaxParams};
use crate::core::scene::{Node, Rig, SceneGraph, TitleState};
use crate::core::smooth_scroll::{ScrollDriver, SmoothScroll};
use crate::core::timeline::{Cue, Timeline};
use crate::core::trigger::{ScrollTrigger, SectionRect, TriggerAction, TriggerMode};
use crate::core::viewport::Viewport;
use fnv::FnvHashMap;
use glam::Mat4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    PlayingIntro,
    ScrollUnlocked,
    Failed,
}

/// What happens to scroll-timeline targets that depend on the viewport size
/// when the window is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizePolicy {
    /// Keep the targets resolved at load time.
    #[default]
    Preserve,
    /// Re-resolve against the new viewport and re-render at the current playhead.
    Recompute,
}

/// Stage tuning
#[derive(Debug, Clone, Copy)]
pub struct StageParams {
    pub resize_policy: ResizePolicy,
    pub scrub_smoothing: f32,
    pub parallax: ParallaxParams,
    pub load_timeout_sec: f64,
    pub model_scale: f32,
}

impl Default for StageParams {
    fn default() -> Self {
        Self {
            resize_policy: ResizePolicy::default(),
            scrub_smoothing: SCRUB_SMOOTHING,
            parallax: ParallaxParams::default(),
            load_timeout_sec: LOAD_TIMEOUT_SEC,
            model_scale: MODEL_SCALE,
        }
    }
}

/// Measured document layout: section bounds by selector plus the maximum
/// scroll offset.
#[derive(Debug, Clone, Default)]
pub struct SectionLayout {
    sections: FnvHashMap<&'static str, SectionRect>,
    scroll_extent: f32,
}

impl SectionLayout {
    pub fn new(scroll_extent: f32) -> Self {
        Self {
            sections: FnvHashMap::default(),
            scroll_extent: scroll_extent.max(0.0),
        }
    }

    pub fn with_section(mut self, selector: &'static str, rect: SectionRect) -> Self {
        self.insert(selector, rect);
        self
    }

    pub fn insert(&mut self, selector: &'static str, rect: SectionRect) {
        self.sections.insert(selector, rect);
    }

    pub fn get(&self, selector: &str) -> Option<&SectionRect> {
        self.sections.get(selector)
    }

    pub fn scroll_extent(&self) -> f32 {
        self.scroll_extent
    }

    /// Whole-page scroll progress in `[0, 1]`.
    pub fn page_progress(&self, scroll_y: f32) -> f32 {
        if self.scroll_extent <= 0.0 {
            return 0.0;
        }
        (scroll_y / self.scroll_extent).clamp(0.0, 1.0)
    }
}

/// A timeline bound to a scroll trigger.
#[derive(Debug, Clone)]
pub struct ScrollTrack {
    pub kind: TrackKind,
    trigger: ScrollTrigger,
    timeline: Timeline,
}

impl ScrollTrack {
    pub fn new(kind: TrackKind, trigger: ScrollTrigger, timeline: Timeline) -> Self {
        Self {
            kind,
            trigger,
            timeline,
        }
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    fn update(&mut self, scroll_y: f32, dt: f32, rig: &mut Rig, cues: &mut Vec<Cue>) {
        match self.trigger.mode {
            TriggerMode::OneShot {
                reverse_on_leave_back,
            } => {
                match self.trigger.update(scroll_y) {
                    Some(TriggerAction::Enter) => {
                        log::debug!("[stage] {} enter", self.timeline.name());
                        self.timeline.play();
                    }
                    Some(TriggerAction::LeaveBack) if reverse_on_leave_back => {
                        log::debug!("[stage] {} leave back", self.timeline.name());
                        self.timeline.reverse();
                    }
                    _ => {}
                }
                self.timeline.advance(dt, rig, cues);
            }
            TriggerMode::Scrub { smoothing } => {
                let target = self.trigger.progress(scroll_y) * self.timeline.duration();
                let current = self.timeline.time();
                let mut next = current + (target - current) * smoothing.clamp(0.0, 1.0);
                if (target - next).abs() < 1e-4 {
                    next = target;
                }
                self.timeline.seek(next, rig, cues);
            }
        }
    }
}

/// Result of one frame: where the page should be scrolled to, and any cues
/// the timelines emitted.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameOutput {
    pub scroll_to: Option<f64>,
    pub cues: Vec<Cue>,
}

pub struct Stage<S: ScrollDriver = SmoothScroll> {
    params: StageParams,
    phase: Phase,
    viewport: Viewport,
    camera: Camera,
    rig: Rig,
    intro: Option<Timeline>,
    tracks: Vec<ScrollTrack>,
    animator: Option<NodeAnimator>,
    layout: SectionLayout,
    cursor: CursorState,
    scroll: S,
    scroll_started: bool,
    load_started_sec: Option<f64>,
}

impl<S: ScrollDriver> Stage<S> {
    /// The scroll driver is stopped until the intro unlocks it.
    pub fn new(viewport: Viewport, params: StageParams, mut scroll: S) -> Self {
        scroll.stop();
        Self {
            camera: Camera::new(&viewport),
            rig: initial_rig(&viewport, 0, params.model_scale),
            params,
            phase: Phase::Idle,
            viewport,
            intro: None,
            tracks: Vec::new(),
            animator: None,
            layout: SectionLayout::default(),
            cursor: CursorState::default(),
            scroll,
            scroll_started: false,
            load_started_sec: None,
        }
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), StageError> {
        if self.phase != expected {
            return Err(StageError::Phase {
                expected,
                found: self.phase,
            });
        }
        Ok(())
    }

    pub fn begin_loading(&mut self, now_sec: f64) -> Result<(), StageError> {
        self.expect_phase(Phase::Idle)?;
        self.phase = Phase::Loading;
        self.load_started_sec = Some(now_sec);
        log::info!("[stage] loading");
        Ok(())
    }

    /// Assemble the rig, start the intro and register the scroll tracks.
    pub fn on_model_ready(
        &mut self,
        layout: &SectionLayout,
        title_count: usize,
        animator: Option<NodeAnimator>,
    ) -> Result<(), StageError> {
        self.expect_phase(Phase::Loading)?;
        let (mut intro, tracks) = match self.build_timelines(layout, title_count) {
            Ok(built) => built,
            Err(e) => {
                log::error!("[stage] cannot start intro: {e}");
                self.phase = Phase::Failed;
                return Err(e);
            }
        };
        let rig = initial_rig(&self.viewport, title_count, self.params.model_scale);
        intro.play();
        self.rig = rig;
        self.intro = Some(intro);
        self.tracks = tracks;
        self.animator = animator;
        self.layout = layout.clone();
        self.scroll.set_limit(layout.scroll_extent() as f64);
        self.phase = Phase::PlayingIntro;
        log::info!(
            "[stage] intro playing: titles={} tracks={} clips={}",
            title_count,
            self.tracks.len(),
            self.animator.as_ref().map_or(false, NodeAnimator::has_clips)
        );
        Ok(())
    }

    /// Sections missing from the layout drop their track; the rest still play.
    fn build_timelines(
        &self,
        layout: &SectionLayout,
        title_count: usize,
    ) -> Result<(Timeline, Vec<ScrollTrack>), StageError> {
        let intro = intro_timeline(&self.viewport, title_count)?;
        let mut tracks = Vec::new();
        for spec in scroll_tracks(self.params.scrub_smoothing) {
            let Some(rect) = layout.get(spec.section) else {
                log::warn!("[stage] section {} not found, skipping its track", spec.section);
                continue;
            };
            let mut trigger = ScrollTrigger::new(spec.section, spec.start, spec.end, spec.mode)?;
            trigger.refresh(rect, self.viewport.height());
            let timeline = spec.build_timeline(&self.viewport, title_count)?;
            tracks.push(ScrollTrack::new(spec.kind, trigger, timeline));
        }
        Ok((intro, tracks))
    }

    pub fn on_model_failed(&mut self, err: &AssetLoadError) {
        if self.phase == Phase::Loading {
            log::error!("[stage] model load failed: {err}");
            self.phase = Phase::Failed;
        }
    }

    /// Fail the load once it has been pending longer than the configured timeout.
    pub fn check_load_timeout(&mut self, now_sec: f64) -> Option<AssetLoadError> {
        if self.phase != Phase::Loading {
            return None;
        }
        let started = self.load_started_sec?;
        if now_sec - started < self.params.load_timeout_sec {
            return None;
        }
        let err = AssetLoadError::Timeout(self.params.load_timeout_sec);
        self.on_model_failed(&err);
        Some(err)
    }

    /// Apply a window resize. Invalid sizes are rejected and change nothing.
    pub fn resize(
        &mut self,
        width: f32,
        height: f32,
        layout: &SectionLayout,
    ) -> Result<(), StageError> {
        let viewport = Viewport::new(width, height).map_err(|e| {
            log::warn!("[stage] resize skipped: {e}");
            e
        })?;
        self.viewport = viewport;
        self.camera.set_viewport(&viewport);
        self.layout = layout.clone();
        self.scroll.set_limit(layout.scroll_extent() as f64);
        for track in &mut self.tracks {
            if let Some(rect) = layout.get(track.trigger.section) {
                track.trigger.refresh(rect, viewport.height());
            }
        }
        if self.params.resize_policy == ResizePolicy::Recompute {
            // A track parked at time zero only holds poses captured from the
            // tracks before it, so it is rescaled but not re-rendered.
            for track in &mut self.tracks {
                track.timeline.rescale(&viewport);
                if track.timeline.time() > 0.0 {
                    track.timeline.reapply(&mut self.rig);
                }
            }
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        self.cursor = CursorState::from_client(
            client_x,
            client_y,
            self.viewport.width(),
            self.viewport.height(),
        );
    }

    pub fn reset_scroll(&mut self) {
        self.scroll.reset(0.0);
    }

    /// One animation frame: scroll tick, intro, scroll tracks in registration
    /// order, clip scrubbing, then parallax.
    pub fn frame(&mut self, time_ms: f64, dt: f32) -> FrameOutput {
        let mut out = FrameOutput {
            scroll_to: self.scroll.tick(time_ms),
            cues: Vec::new(),
        };
        if matches!(self.phase, Phase::PlayingIntro | Phase::ScrollUnlocked) {
            let scroll_y = self.scroll.position() as f32;
            if let Some(intro) = &mut self.intro {
                intro.advance(dt, &mut self.rig, &mut out.cues);
            }
            for track in &mut self.tracks {
                track.update(scroll_y, dt, &mut self.rig, &mut out.cues);
            }
            if let Some(animator) = &mut self.animator {
                animator.scrub(self.layout.page_progress(scroll_y));
            }
            for cue in &out.cues {
                match cue {
                    Cue::UnlockScroll => self.unlock_scroll(),
                }
            }
        }
        self.params
            .parallax
            .step(&mut self.rig.scene.outer, &self.cursor);
        out
    }

    fn unlock_scroll(&mut self) {
        if self.scroll_started {
            return;
        }
        self.scroll_started = true;
        self.scroll.start();
        self.phase = Phase::ScrollUnlocked;
        log::info!("[stage] scroll unlocked");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn params(&self) -> &StageParams {
        &self.params
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.rig.scene
    }

    pub fn title(&self) -> &TitleState {
        &self.rig.title
    }

    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    pub fn intro(&self) -> Option<&Timeline> {
        self.intro.as_ref()
    }

    pub fn tracks(&self) -> &[ScrollTrack] {
        &self.tracks
    }

    pub fn scroll(&self) -> &S {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut S {
        &mut self.scroll
    }

    pub fn model_world(&self) -> Mat4 {
        self.rig.scene.world_matrix(Node::Model)
    }

    /// World matrix of a node inside the loaded model.
    pub fn model_node_world(&self, node: usize) -> Mat4 {
        match &self.animator {
            Some(animator) => self.model_world() * animator.node_world(node),
            None => self.model_world(),
        }
    }
}
