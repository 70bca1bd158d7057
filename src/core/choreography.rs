//! Authored poses and timelines for the page: the intro, the title hide and
//! one scrubbed timeline per content section.

use crate::core::constants::*;
use crate::core::ease::Ease;
use crate::core::error::TimelineError;
use crate::core::scene::{Axis, Node, Rig, SceneGraph, Target, TitleState};
use crate::core::timeline::{Cue, Keyframe, Timeline, TimelineBuilder, Value};
use crate::core::trigger::TriggerMode;
use crate::core::viewport::Viewport;
use glam::Vec3;
use std::f32::consts::PI;

pub const TITLE_SECTION: &str = ".js-section-02";
pub const SCROLL_SECTIONS: [&str; 4] = [
    ".js-section-02",
    ".js-section-03",
    ".js-section-04",
    ".js-section-05",
];

/// Pose before the intro: group below the fold, model turned away, title hidden.
pub fn initial_rig(viewport: &Viewport, title_count: usize, model_scale: f32) -> Rig {
    let mut scene = SceneGraph::default();
    scene.outer.position.y = INTRO_DROP_FRACTION * viewport.height();
    scene.model.scale = Vec3::splat(model_scale);
    scene.model.rotation = Vec3::from(INTRO_MODEL_TURN);
    Rig {
        scene,
        title: TitleState::hidden(title_count, TITLE_TEXT_HIDDEN_BELOW),
    }
}

pub fn intro_timeline(viewport: &Viewport, title_count: usize) -> Result<Timeline, TimelineError> {
    let mut tl = TimelineBuilder::new("intro");
    let rise = tl.push(
        Keyframe::new(INTRO_RISE_SEC)
            .at(0.0)
            .ease(Ease::Power3Out)
            .to(Target::position(Node::Outer, Axis::Y), Value::Fixed(0.0)),
    );
    tl.label("rise", rise);
    tl.push(
        Keyframe::new(INTRO_RISE_SEC)
            .with_previous()
            .ease(Ease::Power3Out)
            .to(Target::rotation(Node::Model, Axis::X), Value::Fixed(0.0))
            .to(Target::rotation(Node::Model, Axis::Y), Value::Fixed(0.0)),
    );
    let mut fade = Keyframe::new(TITLE_FADE_SEC)
        .delay(TITLE_FADE_DELAY_SEC)
        .to(Target::TitleOpacity, Value::Fixed(1.0));
    if title_count == 0 {
        fade = fade.cue(Cue::UnlockScroll);
    }
    tl.push(fade);
    tl.stagger(
        (0..title_count).map(|i| {
            let key = Keyframe::new(TITLE_TEXT_SEC)
                .delay(TITLE_TEXT_DELAY_SEC)
                .ease(Ease::CircOut)
                .to(Target::TitleText(i), Value::Fixed(0.0));
            if i + 1 == title_count {
                key.cue(Cue::UnlockScroll)
            } else {
                key
            }
        }),
        TITLE_TEXT_STAGGER_SEC,
    );
    tl.build(viewport)
}

/// Slide the title text up and out as section two approaches.
pub fn title_hide_timeline(
    viewport: &Viewport,
    title_count: usize,
) -> Result<Timeline, TimelineError> {
    let mut tl = TimelineBuilder::new("title-hide");
    tl.stagger(
        (0..title_count).map(|i| {
            Keyframe::new(TITLE_HIDE_SEC)
                .ease(Ease::CircInOut)
                .to(Target::TitleText(i), Value::Fixed(TITLE_TEXT_HIDDEN_ABOVE))
        }),
        0.0,
    );
    tl.build(viewport)
}

/// Scrubbed pose change for content section `index` (0-based, section two first).
pub fn section_timeline(index: usize, viewport: &Viewport) -> Result<Timeline, TimelineError> {
    let model_pos = |a| Target::position(Node::Model, a);
    let model_rot = |a| Target::rotation(Node::Model, a);
    let inner_rot = |a| Target::rotation(Node::Inner, a);
    let ease = Ease::Power1InOut;
    let mut tl = TimelineBuilder::new(SCROLL_SECTIONS.get(index).copied().unwrap_or("section"));
    match index {
        0 => {
            tl.push(Keyframe::new(1.0).ease(ease).to(model_pos(Axis::X), Value::Width(0.2)));
            tl.push(Keyframe::new(1.0).with_previous().ease(ease).to(model_rot(Axis::Y), Value::Fixed(PI * 0.25)));
            tl.push(Keyframe::new(1.0).with_previous().ease(ease).to(inner_rot(Axis::Z), Value::Fixed(-0.12)));
        }
        1 => {
            tl.push(
                Keyframe::new(1.0)
                    .ease(ease)
                    .to(model_pos(Axis::X), Value::Width(-0.2))
                    .to(model_pos(Axis::Y), Value::Height(0.04)),
            );
            tl.push(Keyframe::new(1.0).with_previous().ease(ease).to(model_rot(Axis::Y), Value::Fixed(-PI * 0.25)));
            tl.push(Keyframe::new(1.0).with_previous().ease(ease).to(inner_rot(Axis::Z), Value::Fixed(0.12)));
        }
        2 => {
            tl.push(
                Keyframe::new(0.6)
                    .ease(ease)
                    .to(model_pos(Axis::X), Value::Fixed(0.0))
                    .to(model_pos(Axis::Y), Value::Fixed(0.0)),
            );
            tl.push(Keyframe::new(0.6).with_previous().to(inner_rot(Axis::Z), Value::Fixed(0.0)));
            tl.push(Keyframe::new(1.0).delay(-0.2).ease(ease).to(model_rot(Axis::X), Value::Fixed(PI * 0.5)));
            tl.push(Keyframe::new(1.0).with_previous().ease(ease).to(inner_rot(Axis::X), Value::Fixed(-0.2)));
        }
        _ => {
            tl.push(
                Keyframe::new(1.0)
                    .ease(ease)
                    .to(Target::rotation(Node::Outer, Axis::Z), Value::Fixed(0.2))
                    .to(model_pos(Axis::Y), Value::Height(-0.1)),
            );
            tl.push(Keyframe::new(1.0).with_previous().ease(ease).to(model_rot(Axis::Y), Value::Fixed(PI)));
            tl.push(Keyframe::new(1.0).with_previous().ease(ease).to(inner_rot(Axis::X), Value::Fixed(0.0)));
        }
    }
    tl.build(viewport)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    TitleHide,
    Section(usize),
}

/// Scroll-bound timeline and the trigger that drives it.
#[derive(Debug, Clone, Copy)]
pub struct TrackSpec {
    pub kind: TrackKind,
    pub section: &'static str,
    pub start: &'static str,
    pub end: Option<&'static str>,
    pub mode: TriggerMode,
}

impl TrackSpec {
    pub fn build_timeline(
        &self,
        viewport: &Viewport,
        title_count: usize,
    ) -> Result<Timeline, TimelineError> {
        match self.kind {
            TrackKind::TitleHide => title_hide_timeline(viewport, title_count),
            TrackKind::Section(i) => section_timeline(i, viewport),
        }
    }
}

/// Registration order matters: later tracks win when they write the same field.
pub fn scroll_tracks(scrub_smoothing: f32) -> Vec<TrackSpec> {
    let mut tracks = vec![TrackSpec {
        kind: TrackKind::TitleHide,
        section: TITLE_SECTION,
        start: "top 96%",
        end: None,
        mode: TriggerMode::OneShot {
            reverse_on_leave_back: true,
        },
    }];
    tracks.extend(SCROLL_SECTIONS.iter().enumerate().map(|(i, &section)| TrackSpec {
        kind: TrackKind::Section(i),
        section,
        start: "top bottom",
        end: Some("top top"),
        mode: TriggerMode::Scrub {
            smoothing: scrub_smoothing,
        },
    }));
    tracks
}
