// Host-side tests for viewport validation and camera math.

use glam::Vec3;
use scroll_stage::core::camera::{fit_distance, Camera};
use scroll_stage::core::{Viewport, ViewportError};

#[test]
fn viewport_accepts_positive_sizes() {
    let vp = Viewport::new(1920.0, 1080.0).unwrap();
    assert_eq!(vp.width(), 1920.0);
    assert_eq!(vp.height(), 1080.0);
    assert!((vp.aspect() - 16.0 / 9.0).abs() < 1e-6);
}

#[test]
fn viewport_rejects_degenerate_sizes() {
    for (w, h) in [
        (0.0, 1080.0),
        (1920.0, 0.0),
        (-1.0, 600.0),
        (f32::NAN, 600.0),
        (800.0, f32::INFINITY),
    ] {
        let err = Viewport::new(w, h);
        assert!(
            matches!(err, Err(ViewportError::Invalid { .. })),
            "{w}x{h} should be rejected"
        );
    }
}

#[test]
fn fit_distance_matches_half_height_over_tan() {
    let d = fit_distance(1080.0, 45.0);
    let expected = 540.0 / (22.5_f32).to_radians().tan();
    assert!((d - expected).abs() < 1e-3);
    assert!((d - 1303.675).abs() < 0.01);
}

#[test]
fn camera_maps_one_unit_to_one_pixel_at_origin() {
    let vp = Viewport::new(1920.0, 1080.0).unwrap();
    let cam = Camera::new(&vp);
    let d = fit_distance(1080.0, 45.0);

    assert!((cam.eye() - Vec3::new(0.0, 0.0, d)).length() < 1e-3);
    assert!((cam.far() - d * 5.0).abs() < 1e-2);
    assert!((cam.aspect() - 1920.0 / 1080.0).abs() < 1e-6);

    // The top edge and the right edge of the viewport project onto the NDC border
    let top = cam.view_projection().project_point3(Vec3::new(0.0, 540.0, 0.0));
    let right = cam.view_projection().project_point3(Vec3::new(960.0, 0.0, 0.0));
    assert!((top.y - 1.0).abs() < 1e-4);
    assert!((right.x - 1.0).abs() < 1e-4);
}

#[test]
fn set_viewport_updates_projection_but_keeps_distance() {
    let vp = Viewport::new(1920.0, 1080.0).unwrap();
    let mut cam = Camera::new(&vp);
    let eye_before = cam.eye();
    let proj_before = cam.projection();

    cam.set_viewport(&Viewport::new(800.0, 600.0).unwrap());

    assert!((cam.aspect() - 800.0 / 600.0).abs() < 1e-6);
    assert_eq!(cam.eye(), eye_before);
    assert_ne!(cam.projection(), proj_before);
    // Vertical scale of a perspective projection depends only on fov
    assert!((cam.projection().y_axis.y - proj_before.y_axis.y).abs() < 1e-6);
}
