use crate::core::constants::SMOOTH_SCROLL_DURATION_SEC;

/// Scroll source the stage drives once per frame.
pub trait ScrollDriver {
    /// Re-enable user scrolling.
    fn start(&mut self);
    /// Suppress user scrolling.
    fn stop(&mut self);
    fn is_stopped(&self) -> bool;
    /// Advance to `time_ms` (a frame timestamp). Returns a position the page
    /// should be scrolled to, if it changed.
    fn tick(&mut self, time_ms: f64) -> Option<f64>;
    /// Current scroll offset in CSS pixels.
    fn position(&self) -> f64;
    /// Jump to `y` without animating.
    fn reset(&mut self, y: f64);
    /// Maximum scroll offset (document height minus viewport height).
    fn set_limit(&mut self, limit: f64);
}

/// `min(1, 1.001 - 2^(-10 t))`: fast start, long settle.
#[inline]
pub fn smooth_scroll_ease(t: f64) -> f64 {
    (1.001 - 2f64.powf(-10.0 * t)).min(1.0)
}

/// Wheel delta in pixels. `mode` is `WheelEvent.deltaMode`: 0 pixels, 1 lines, 2 pages.
pub fn wheel_delta_px(delta: f64, mode: u32, line_px: f64, page_px: f64) -> f64 {
    match mode {
        1 => delta * line_px,
        2 => delta * page_px,
        _ => delta,
    }
}

/// Wheel-driven eased scrolling.
///
/// Each wheel delta moves the target (clamped to `[0, limit]`) and restarts a
/// fixed-duration ease from the current animated position. Native scroll
/// events (scrollbar, keyboard) resync the state when no ease is running.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    duration: f64,
    stopped: bool,
    limit: f64,
    current: f64,
    from: f64,
    target: f64,
    elapsed: f64,
    animating: bool,
    last_time_ms: Option<f64>,
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(SMOOTH_SCROLL_DURATION_SEC)
    }
}

impl SmoothScroll {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(1e-3),
            stopped: false,
            limit: 0.0,
            current: 0.0,
            from: 0.0,
            target: 0.0,
            elapsed: 0.0,
            animating: false,
            last_time_ms: None,
        }
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Feed a wheel delta in pixels. Returns `true` when the native scroll
    /// should be prevented (always: either it is emulated or it is locked).
    pub fn on_wheel(&mut self, delta_y: f64) -> bool {
        if self.stopped {
            return true;
        }
        self.scroll_to(self.target + delta_y);
        true
    }

    /// Animate toward `y`.
    pub fn scroll_to(&mut self, y: f64) {
        let y = y.clamp(0.0, self.limit);
        self.from = self.current;
        self.target = y;
        self.elapsed = 0.0;
        self.animating = (self.target - self.current).abs() > f64::EPSILON;
    }

    /// The page scrolled by other means.
    pub fn on_native_scroll(&mut self, y: f64) {
        if !self.animating {
            self.current = y;
            self.target = y;
        }
    }
}

impl ScrollDriver for SmoothScroll {
    fn start(&mut self) {
        if self.stopped {
            log::info!("[scroll] started");
        }
        self.stopped = false;
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.animating = false;
        self.target = self.current;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn tick(&mut self, time_ms: f64) -> Option<f64> {
        let dt = match self.last_time_ms.replace(time_ms) {
            Some(prev) => ((time_ms - prev) / 1000.0).max(0.0),
            None => 0.0,
        };
        if !self.animating {
            return None;
        }
        self.elapsed += dt;
        let t = (self.elapsed / self.duration).min(1.0);
        if t >= 1.0 {
            self.current = self.target;
            self.animating = false;
        } else {
            self.current = self.from + (self.target - self.from) * smooth_scroll_ease(t);
        }
        Some(self.current)
    }

    fn position(&self) -> f64 {
        self.current
    }

    fn reset(&mut self, y: f64) {
        let y = y.max(0.0);
        self.current = y;
        self.from = y;
        self.target = y;
        self.animating = false;
    }

    fn set_limit(&mut self, limit: f64) {
        self.limit = limit.max(0.0);
        self.target = self.target.min(self.limit);
        self.current = self.current.min(self.limit);
    }
}
