use crate::core::constants::{CAMERA_FAR_MULTIPLIER, CAMERA_FOV_DEG, CAMERA_NEAR};
use crate::core::viewport::Viewport;
use glam::{Mat4, Vec3};

/// Distance at which a plane through the origin exactly fills the viewport
/// height, so one world unit maps to one CSS pixel at z = 0.
#[inline]
pub fn fit_distance(viewport_height: f32, fov_deg: f32) -> f32 {
    (viewport_height / 2.0) / (fov_deg.to_radians() / 2.0).tan()
}

/// Perspective camera on the +Z axis looking at the origin.
///
/// The eye distance is fixed when the camera is created; `set_viewport` only
/// updates the aspect ratio and recomputes the projection.
#[derive(Debug, Clone)]
pub struct Camera {
    fov_deg: f32,
    aspect: f32,
    near: f32,
    far: f32,
    eye: Vec3,
    projection: Mat4,
    view: Mat4,
}

impl Camera {
    pub fn new(viewport: &Viewport) -> Self {
        let distance = fit_distance(viewport.height(), CAMERA_FOV_DEG);
        let eye = Vec3::new(0.0, 0.0, distance);
        let mut camera = Self {
            fov_deg: CAMERA_FOV_DEG,
            aspect: viewport.aspect(),
            near: CAMERA_NEAR,
            far: distance * CAMERA_FAR_MULTIPLIER,
            eye,
            projection: Mat4::IDENTITY,
            view: Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y),
        };
        camera.update_projection();
        camera
    }

    pub fn set_viewport(&mut self, viewport: &Viewport) {
        self.aspect = viewport.aspect();
        self.update_projection();
    }

    fn update_projection(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}
