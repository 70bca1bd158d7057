use crate::core::error::ViewportError;

/// Window size in CSS pixels. Both sides are strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, ViewportError> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(Self { width, height })
        } else {
            Err(ViewportError::Invalid { width, height })
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}
