use crate::constants::WHEEL_LINE_PX;
use crate::core::smooth_scroll::wheel_delta_px;
use web_sys as web;

// ---------------- Pointer helpers ----------------
#[inline]
pub fn pointer_client(ev: &web::PointerEvent) -> (f32, f32) {
    (ev.client_x() as f32, ev.client_y() as f32)
}

// ---------------- Wheel helpers ----------------
/// Vertical wheel delta in CSS pixels.
#[inline]
pub fn wheel_pixels(ev: &web::WheelEvent, viewport_height: f32) -> f64 {
    wheel_delta_px(
        ev.delta_y(),
        ev.delta_mode(),
        WHEEL_LINE_PX,
        viewport_height as f64,
    )
}
