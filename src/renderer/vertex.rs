//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in screen pixels with a color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.01, 0.1, 0.12, 1.0];
    pub const GRID: [f32; 4] = [1.0, 0.76, 0.03, 0.2];
    pub const WORLD_BORDER: [f32; 4] = [1.0, 0.63, 0.0, 0.6];
    pub const PLAYER_MEMBRANE: [f32; 4] = [0.88, 0.95, 0.99, 0.9];
    pub const PLAYER_NUCLEUS: [f32; 4] = [0.36, 0.42, 0.75, 0.9];
    pub const ANTIBODY: [f32; 4] = [0.65, 0.84, 0.65, 1.0];
    pub const PATHOGEN: [f32; 4] = [1.0, 0.33, 0.33, 1.0];
    pub const HEALTH_LOW: [f32; 4] = [0.83, 0.18, 0.18, 1.0];
    pub const HEALTH_HIGH: [f32; 4] = [0.3, 0.69, 0.31, 1.0];
    pub const ENEMY_HEALTH_LOW: [f32; 4] = [0.6, 0.0, 0.0, 1.0];
    pub const ENEMY_HEALTH_HIGH: [f32; 4] = [0.0, 0.6, 0.0, 1.0];
    pub const PROGRESS_TRACK: [f32; 4] = [0.33, 0.33, 0.33, 1.0];
    pub const PROGRESS_FILL: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const PANEL: [f32; 4] = [0.0, 0.0, 0.0, 0.7];
    pub const UPGRADE_ICON: [f32; 4] = [0.2, 0.2, 0.31, 1.0];
    pub const PAUSE_OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
    pub const GAME_OVER_OVERLAY: [f32; 4] = [0.0, 0.3, 0.25, 0.7];

    /// Same color with its alpha scaled
    pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], color[3] * alpha]
    }
}
