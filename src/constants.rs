/// Page wiring and rendering constants for the web front-end.
///
/// Choreography tuning (timings, offsets, parallax) lives in
/// `core::constants`; this module only holds what the browser side needs.

// DOM hooks
pub const CANVAS_ID: &str = "canvas";
pub const TITLE_SELECTOR: &str = ".js-ttl";
pub const TITLE_TEXT_SELECTOR: &str = ".js-ttl-txts";
pub const SCROLL_CONTAINER_SELECTOR: &str = ".scroll";
pub const LOAD_ERROR_ID: &str = "load-error";
pub const SCROLL_LOCK_CLASS: &str = "is-scroll-locked";

// Asset URLs, overridable through `data-model` / `data-env` on the canvas
pub const DEFAULT_MODEL_URL: &str = "model/spoon.glb";
pub const DEFAULT_ENV_URL: &str = "textures/env.jpg";
pub const MODEL_URL_ATTR: &str = "model";
pub const ENV_URL_ATTR: &str = "env";

// Lighting: one white directional light plus ambient
pub const LIGHT_POSITION: [f32; 3] = [1.0, 200.0, 1.0]; // direction toward the light
pub const LIGHT_INTENSITY: f32 = 1.8;
pub const LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const AMBIENT_INTENSITY: f32 = 0.8;
pub const ENV_STRENGTH: f32 = 1.0;

// Wheel deltas reported in lines are scaled by this many pixels
pub const WHEEL_LINE_PX: f64 = 16.0;

// Clamp for frame deltas after a hidden tab resumes (seconds)
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
