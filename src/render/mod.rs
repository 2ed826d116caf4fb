//! 3D scene: camera, starfield, per-stage visuals and the egui painter.

pub mod animator;
pub mod camera;
pub mod math;
pub mod paint;
pub mod scene;
pub mod starfield;

pub use animator::StageVisual;
pub use camera::OrbitCamera;
pub use paint::{paint_scene, PaintScratch};
pub use scene::{SceneFrame, SceneRenderer};
