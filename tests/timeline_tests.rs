// Host-side tests for easing curves and keyframe timelines.

use scroll_stage::core::ease::Ease;
use scroll_stage::core::error::TimelineError;
use scroll_stage::core::scene::{Animatable, Axis, Node, Rig, SceneGraph, Target, TitleState};
use scroll_stage::core::timeline::{Anchor, Cue, Edge, KeyId, Keyframe, TimelineBuilder, Value};
use scroll_stage::core::Viewport;

fn viewport() -> Viewport {
    Viewport::new(1920.0, 1080.0).unwrap()
}

fn rig() -> Rig {
    Rig {
        scene: SceneGraph::default(),
        title: TitleState::hidden(3, 100.0),
    }
}

const OUTER_Y: Target = Target::position(Node::Outer, Axis::Y);
const MODEL_X: Target = Target::position(Node::Model, Axis::X);

const ALL_EASES: [Ease; 22] = [
    Ease::Linear,
    Ease::Power1In,
    Ease::Power1Out,
    Ease::Power1InOut,
    Ease::Power2In,
    Ease::Power2Out,
    Ease::Power2InOut,
    Ease::Power3In,
    Ease::Power3Out,
    Ease::Power3InOut,
    Ease::Power4In,
    Ease::Power4Out,
    Ease::Power4InOut,
    Ease::SineIn,
    Ease::SineOut,
    Ease::SineInOut,
    Ease::ExpoIn,
    Ease::ExpoOut,
    Ease::ExpoInOut,
    Ease::CircIn,
    Ease::CircOut,
    Ease::CircInOut,
];

#[test]
fn every_ease_hits_its_endpoints_exactly() {
    for ease in ALL_EASES {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?}");
        assert_eq!(ease.apply(-0.5), 0.0, "{ease:?}");
        assert_eq!(ease.apply(1.5), 1.0, "{ease:?}");
    }
}

#[test]
fn every_ease_is_monotonic() {
    for ease in ALL_EASES {
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease.apply(i as f32 / 100.0);
            assert!(v + 1e-5 >= prev, "{ease:?} decreases at {i}");
            prev = v;
        }
    }
}

#[test]
fn ease_names_parse_like_the_page_uses_them() {
    assert_eq!(Ease::from_name("circ.out"), Ease::CircOut);
    assert_eq!(Ease::from_name("circ.inOut"), Ease::CircInOut);
    assert_eq!(Ease::from_name("power3.inOut"), Ease::Power3InOut);
    assert_eq!(Ease::from_name("power2"), Ease::Power2Out);
    assert_eq!(Ease::from_name("none"), Ease::Linear);
    assert_eq!(Ease::from_name("bogus.out"), Ease::default());
}

#[test]
fn anchors_resolve_to_absolute_starts() {
    let mut b = TimelineBuilder::new("anchors");
    let a = b.push(Keyframe::new(1.0).to(OUTER_Y, Value::Fixed(0.0)));
    let seq = b.push(Keyframe::new(1.0).to(MODEL_X, Value::Fixed(1.0)));
    let with = b.push(Keyframe::new(0.5).with_previous().to(MODEL_X, Value::Fixed(2.0)));
    let delayed = b.push(Keyframe::new(1.0).delay(0.5).to(MODEL_X, Value::Fixed(3.0)));
    let abs = b.push(Keyframe::new(1.0).at(2.5).to(MODEL_X, Value::Fixed(4.0)));
    b.label("first", a);
    let labeled = b.push(
        Keyframe::new(0.25)
            .anchor(Anchor::Label("first", Edge::End))
            .delay(0.1)
            .to(OUTER_Y, Value::Fixed(5.0)),
    );
    let tl = b.build(&viewport()).unwrap();

    assert_eq!(tl.key_start(a), Some(0.0));
    assert_eq!(tl.key_start(seq), Some(1.0));
    assert_eq!(tl.key_start(with), Some(1.0));
    // Sequential placement follows the end of the key pushed just before
    assert_eq!(tl.key_start(delayed), Some(2.0));
    assert_eq!(tl.key_start(abs), Some(2.5));
    assert!((tl.key_start(labeled).unwrap() - 1.1).abs() < 1e-6);
    assert!((tl.duration() - 3.5).abs() < 1e-6);
}

#[test]
fn stagger_offsets_each_key_from_the_first() {
    let mut b = TimelineBuilder::new("stagger");
    b.push(Keyframe::new(1.0).to(OUTER_Y, Value::Fixed(0.0)));
    let ids = b.stagger(
        (0..3).map(|i| {
            Keyframe::new(0.6)
                .delay(0.5)
                .to(Target::TitleText(i), Value::Fixed(0.0))
        }),
        0.03,
    );
    let tl = b.build(&viewport()).unwrap();

    assert_eq!(ids.len(), 3);
    let starts: Vec<f32> = ids.iter().map(|&id| tl.key_start(id).unwrap()).collect();
    assert!((starts[0] - 1.5).abs() < 1e-6);
    assert!((starts[1] - 1.53).abs() < 1e-6);
    assert!((starts[2] - 1.56).abs() < 1e-6);
    assert!((tl.duration() - 2.16).abs() < 1e-5);
}

#[test]
fn timing_cycles_are_rejected() {
    let mut b = TimelineBuilder::new("cycle");
    let a = b.push(Keyframe::new(1.0).to(OUTER_Y, Value::Fixed(0.0)));
    let c = b.push(Keyframe::new(1.0).to(MODEL_X, Value::Fixed(0.0)));
    b.retime(a, Anchor::Key(c, Edge::End), 0.0).unwrap();
    assert!(matches!(b.build(&viewport()), Err(TimelineError::Cycle(_))));
}

#[test]
fn invalid_references_are_rejected() {
    let mut b = TimelineBuilder::new("unknown");
    b.push(Keyframe::new(1.0).anchor(Anchor::Key(KeyId(5), Edge::End)));
    assert_eq!(b.build(&viewport()).unwrap_err(), TimelineError::UnknownKey(0, 5));

    let mut b = TimelineBuilder::new("label");
    b.push(Keyframe::new(1.0).anchor(Anchor::Label("nope", Edge::Start)));
    assert_eq!(
        b.build(&viewport()).unwrap_err(),
        TimelineError::UnknownLabel("nope".into())
    );

    let mut b = TimelineBuilder::new("retime");
    let a = b.push(Keyframe::new(1.0));
    assert_eq!(
        b.retime(a, Anchor::Key(KeyId(9), Edge::Start), 0.0),
        Err(TimelineError::UnknownKey(0, 9))
    );
}

#[test]
fn negative_starts_and_durations_are_rejected() {
    let mut b = TimelineBuilder::new("negative");
    b.push(Keyframe::new(1.0).at(0.0));
    b.push(Keyframe::new(1.0).with_previous().delay(-0.5));
    assert_eq!(
        b.build(&viewport()).unwrap_err(),
        TimelineError::NegativeStart(1, -0.5)
    );

    let mut b = TimelineBuilder::new("duration");
    b.push(Keyframe::new(-1.0));
    assert_eq!(
        b.build(&viewport()).unwrap_err(),
        TimelineError::InvalidDuration(0, -1.0)
    );
}

#[test]
fn playing_to_the_end_lands_exactly_on_targets_and_fires_cue_once() {
    let mut r = rig();
    r.write(OUTER_Y, -864.0);
    let mut b = TimelineBuilder::new("rise");
    b.push(
        Keyframe::new(1.6)
            .ease(Ease::Power3Out)
            .to(OUTER_Y, Value::Fixed(0.0))
            .cue(Cue::UnlockScroll),
    );
    let mut tl = b.build(&viewport()).unwrap();
    let mut cues = Vec::new();

    tl.play();
    tl.advance(0.5, &mut r, &mut cues);
    let mid = r.read(OUTER_Y);
    assert!(mid > -864.0 && mid < 0.0);
    assert!(cues.is_empty());

    for _ in 0..10 {
        tl.advance(0.5, &mut r, &mut cues);
    }
    assert_eq!(r.read(OUTER_Y), 0.0);
    assert!(!tl.is_playing());
    assert_eq!(cues, vec![Cue::UnlockScroll]);
}

#[test]
fn reversing_restores_pre_play_values_exactly() {
    let mut r = rig();
    r.write(OUTER_Y, 12.345);
    let mut b = TimelineBuilder::new("hide");
    b.stagger(
        (0..3).map(|i| {
            Keyframe::new(0.9)
                .ease(Ease::CircInOut)
                .to(Target::TitleText(i), Value::Fixed(-100.0))
        }),
        0.0,
    );
    b.push(Keyframe::new(0.9).with_previous().to(OUTER_Y, Value::Fixed(-7.0)));
    let mut tl = b.build(&viewport()).unwrap();
    let mut cues = Vec::new();

    tl.play();
    tl.advance(0.37, &mut r, &mut cues);
    assert!(r.title.text_offsets[0] < 100.0);

    tl.reverse();
    while tl.is_playing() {
        tl.advance(1.0 / 60.0, &mut r, &mut cues);
    }
    assert_eq!(tl.time(), 0.0);
    assert_eq!(r.title.text_offsets.as_slice(), &[100.0, 100.0, 100.0]);
    assert_eq!(r.read(OUTER_Y), 12.345);
}

#[test]
fn start_values_are_captured_when_a_key_first_renders() {
    let mut r = rig();
    let mut b = TimelineBuilder::new("chain");
    b.push(Keyframe::new(1.0).ease(Ease::Linear).to(MODEL_X, Value::Fixed(10.0)));
    b.push(Keyframe::new(1.0).ease(Ease::Linear).to(MODEL_X, Value::Fixed(20.0)));
    let mut tl = b.build(&viewport()).unwrap();
    let mut cues = Vec::new();

    // One jump across both keys still chains them in order
    tl.seek(2.0, &mut r, &mut cues);
    assert_eq!(r.read(MODEL_X), 20.0);

    // Seeking back renders in reverse order, restoring the original value
    tl.seek(0.0, &mut r, &mut cues);
    assert_eq!(r.read(MODEL_X), 0.0);

    tl.seek(1.5, &mut r, &mut cues);
    assert!((r.read(MODEL_X) - 15.0).abs() < 1e-4);
}

#[test]
fn keys_only_write_when_their_progress_changes() {
    let mut r = rig();
    let mut b = TimelineBuilder::new("writes");
    b.push(Keyframe::new(1.0).to(MODEL_X, Value::Fixed(10.0)));
    b.push(Keyframe::new(1.0).to(OUTER_Y, Value::Fixed(5.0)));
    let mut tl = b.build(&viewport()).unwrap();
    let mut cues = Vec::new();

    tl.seek(1.0, &mut r, &mut cues);
    assert_eq!(r.read(MODEL_X), 10.0);

    // Someone else writes the field; a finished key leaves it alone
    r.write(MODEL_X, 42.0);
    tl.seek(1.0, &mut r, &mut cues);
    tl.seek(2.0, &mut r, &mut cues);
    assert_eq!(r.read(MODEL_X), 42.0);
    assert_eq!(r.read(OUTER_Y), 5.0);
}

#[test]
fn viewport_relative_targets_rescale() {
    let mut r = rig();
    let mut b = TimelineBuilder::new("relative");
    b.push(Keyframe::new(1.0).to(MODEL_X, Value::Width(0.2)));
    let mut tl = b.build(&viewport()).unwrap();
    let mut cues = Vec::new();

    tl.seek(1.0, &mut r, &mut cues);
    assert!((r.read(MODEL_X) - 384.0).abs() < 1e-3);

    tl.rescale(&Viewport::new(800.0, 600.0).unwrap());
    tl.reapply(&mut r);
    assert!((r.read(MODEL_X) - 160.0).abs() < 1e-3);
}
