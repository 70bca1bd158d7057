use crate::core::constants::{PARALLAX_DAMPING, PARALLAX_STRENGTH};
use crate::core::scene::Transform;

/// Latest pointer sample, normalized to roughly `[-0.5, 0.5]` on each axis
/// with the origin at the viewport center.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CursorState {
    pub x: f32,
    pub y: f32,
}

impl CursorState {
    pub fn from_client(client_x: f32, client_y: f32, width: f32, height: f32) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::default();
        }
        Self {
            x: client_x / width - 0.5,
            y: client_y / height - 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxParams {
    pub strength: f32,
    pub damping: f32,
}

impl Default for ParallaxParams {
    fn default() -> Self {
        Self {
            strength: PARALLAX_STRENGTH,
            damping: PARALLAX_DAMPING,
        }
    }
}

impl ParallaxParams {
    /// Rotation (x, y) the damped filter converges to for `cursor`.
    pub fn target(&self, cursor: &CursorState) -> (f32, f32) {
        (-cursor.y * self.strength, cursor.x * self.strength)
    }

    /// One frame of first-order damping toward the cursor target. Reads the
    /// current rotation, so whatever wrote it earlier in the frame is nudged,
    /// not replaced.
    #[inline]
    pub fn step(&self, group: &mut Transform, cursor: &CursorState) {
        let (tx, ty) = self.target(cursor);
        group.rotation.x += (tx - group.rotation.x) * self.damping;
        group.rotation.y += (ty - group.rotation.y) * self.damping;
    }
}
