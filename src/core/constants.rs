// Choreography tuning constants shared by the stage and its tests.

// Camera
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR_MULTIPLIER: f32 = 5.0; // far plane = fit distance * this

// Scene assembly
pub const MODEL_SCALE: f32 = 100.0;
pub const INTRO_DROP_FRACTION: f32 = -0.8; // outer group starts this many viewport heights low
pub const INTRO_MODEL_TURN: [f32; 3] = [0.35, -std::f32::consts::PI, 0.0]; // model rotation before the intro

// Intro timing (seconds)
pub const INTRO_RISE_SEC: f32 = 1.6;
pub const TITLE_FADE_DELAY_SEC: f32 = 0.3;
pub const TITLE_FADE_SEC: f32 = 0.5;
pub const TITLE_TEXT_DELAY_SEC: f32 = 0.5;
pub const TITLE_TEXT_SEC: f32 = 0.6;
pub const TITLE_TEXT_STAGGER_SEC: f32 = 0.03;

// Title block, in percent of each text element's own height
pub const TITLE_TEXT_HIDDEN_BELOW: f32 = 100.0;
pub const TITLE_TEXT_HIDDEN_ABOVE: f32 = -100.0;
pub const TITLE_HIDE_SEC: f32 = 0.9;

// Scroll
pub const SCRUB_SMOOTHING: f32 = 1.0; // fraction of the remaining gap closed per frame
pub const SMOOTH_SCROLL_DURATION_SEC: f64 = 1.2;

// Pointer parallax
pub const PARALLAX_STRENGTH: f32 = 0.1;
pub const PARALLAX_DAMPING: f32 = 0.1;

// Asset loading
pub const LOAD_TIMEOUT_SEC: f64 = 20.0;
