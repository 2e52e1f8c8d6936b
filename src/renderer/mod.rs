//! WebGPU rendering module
//!
//! `scene` turns simulation state into screen-space triangles and a HUD view
//! model; `pipeline` uploads and draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, screen_to_ndc};
pub use scene::{HudView, PanelView, Scene, TextOverlay, UpgradePanel, build_scene, hud_view};
pub use vertex::Vertex;
