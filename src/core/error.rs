use thiserror::Error;

/// Model fetch/parse failures. Fatal for the intro: the stage moves to `Failed`.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("fetch of {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("invalid glTF: {0}")]
    Parse(#[from] gltf::Error),
    #[error("model requires unsupported glTF extension {0} (e.g. Draco meshes must be decompressed)")]
    UnsupportedExtension(String),
    #[error("glTF buffer {0} has no binary payload")]
    MissingBuffer(usize),
    #[error("model contains no triangle meshes")]
    Empty,
    #[error("model load timed out after {0:.1}s")]
    Timeout(f64),
}

/// Environment texture failures. Non-fatal: the scene renders without reflections.
#[derive(Debug, Error)]
pub enum EnvironmentLoadError {
    #[error("fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("environment image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ViewportError {
    #[error("invalid viewport {width}x{height}")]
    Invalid { width: f32, height: f32 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimelineError {
    #[error("keyframe {0} is part of a timing cycle")]
    Cycle(usize),
    #[error("keyframe {0} references unknown keyframe {1}")]
    UnknownKey(usize, usize),
    #[error("keyframe {0} resolves to negative start {1}")]
    NegativeStart(usize, f32),
    #[error("keyframe {0} has invalid duration {1}")]
    InvalidDuration(usize, f32),
    #[error("unknown label {0:?}")]
    UnknownLabel(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TriggerError {
    #[error("cannot parse trigger position {0:?}")]
    Parse(String),
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error("expected phase {expected:?}, found {found:?}")]
    Phase {
        expected: crate::core::Phase,
        found: crate::core::Phase,
    },
    #[error(transparent)]
    Viewport(#[from] ViewportError),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error(transparent)]
    Trigger(#[from] TriggerError),
}
