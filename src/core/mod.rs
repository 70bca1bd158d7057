pub mod asset;
pub mod camera;
pub mod choreography;
pub mod clip;
pub mod constants;
pub mod ease;
pub mod error;
pub mod load;
pub mod parallax;
pub mod scene;
pub mod smooth_scroll;
pub mod stage;
pub mod timeline;
pub mod trigger;
pub mod viewport;

pub use asset::{decode_environment, parse_glb, EnvironmentImage, MeshData, MeshVertex, ModelAsset};
pub use camera::Camera;
pub use clip::NodeAnimator;
pub use error::{AssetLoadError, EnvironmentLoadError, StageError, ViewportError};
pub use load::LoadSlot;
pub use parallax::{CursorState, ParallaxParams};
pub use scene::{Node, Rig, SceneGraph, TitleState, Transform};
pub use smooth_scroll::{ScrollDriver, SmoothScroll};
pub use stage::{FrameOutput, Phase, ResizePolicy, SectionLayout, Stage, StageParams};
pub use trigger::SectionRect;
pub use viewport::Viewport;

// Shaders bundled as string constants
pub static MESH_WGSL: &str = include_str!("../../shaders/mesh.wgsl");
