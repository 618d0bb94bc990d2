//! 3D Viewer Module
//!
//! Camera, orbit controls, scene graph and a painter-based renderer, tied
//! together by the mount/unmount lifecycle in `viewport`.

pub mod camera;
pub mod controls;
pub mod grid;
pub mod renderer;
pub mod scene;
pub mod viewport;

// Re-export main types for easy access
pub use camera::Camera3D;
pub use controls::OrbitControls;
pub use grid::InfiniteGrid;
pub use renderer::{FrameStats, Renderer3D};
pub use scene::{ModelPlacement, NodeKind, NodeRole, Scene, SceneNode, setup_scene};
pub use viewport::{RenderLoop, Viewport, ViewportError, ViewportState};
