// Host-side tests for choreography constants and their relationships.

use scroll_stage::core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn intro_timings_are_positive() {
    assert!(INTRO_RISE_SEC > 0.0);
    assert!(TITLE_FADE_SEC > 0.0);
    assert!(TITLE_TEXT_SEC > 0.0);
    assert!(TITLE_HIDE_SEC > 0.0);

    // Delays and stagger may be zero but never negative
    assert!(TITLE_FADE_DELAY_SEC >= 0.0);
    assert!(TITLE_TEXT_DELAY_SEC >= 0.0);
    assert!(TITLE_TEXT_STAGGER_SEC >= 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn title_offsets_hide_on_opposite_sides() {
    assert!(TITLE_TEXT_HIDDEN_BELOW > 0.0);
    assert!(TITLE_TEXT_HIDDEN_ABOVE < 0.0);
    assert_eq!(TITLE_TEXT_HIDDEN_BELOW, -TITLE_TEXT_HIDDEN_ABOVE);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn per_frame_factors_are_fractions() {
    assert!(PARALLAX_DAMPING > 0.0 && PARALLAX_DAMPING <= 1.0);
    assert!(SCRUB_SMOOTHING > 0.0 && SCRUB_SMOOTHING <= 1.0);
    assert!(PARALLAX_STRENGTH > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_and_scene_constants_have_logical_relationships() {
    assert!(CAMERA_NEAR > 0.0);
    assert!(CAMERA_FOV_DEG > 0.0 && CAMERA_FOV_DEG < 180.0);
    // Far plane must lie beyond the fit distance
    assert!(CAMERA_FAR_MULTIPLIER > 1.0);

    // The group starts below the fold
    assert!(INTRO_DROP_FRACTION < 0.0);
    assert!(MODEL_SCALE > 0.0);

    assert!(SMOOTH_SCROLL_DURATION_SEC > 0.0);
    assert!(LOAD_TIMEOUT_SEC > 0.0);
}
