//! Vertex type and palette

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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

/// Same color with a different alpha
pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Colors for game elements
pub mod colors {
    pub const ROAD: [f32; 4] = [0.216, 0.255, 0.318, 1.0];
    pub const ROAD_SHOULDER: [f32; 4] = [0.278, 0.333, 0.412, 1.0];
    pub const LANE_DASH: [f32; 4] = [1.0, 1.0, 1.0, 0.5];

    pub const PLAYER: [f32; 4] = [0.231, 0.510, 0.965, 1.0];
    pub const ENEMY: [f32; 4] = [0.863, 0.149, 0.149, 1.0];
    pub const WINDOW: [f32; 4] = [0.404, 0.910, 0.976, 1.0];

    pub const COIN: [f32; 4] = [0.980, 0.800, 0.082, 1.0];
    pub const COIN_RIM: [f32; 4] = [0.792, 0.541, 0.016, 1.0];
    pub const MYSTERY_BOX: [f32; 4] = [0.576, 0.200, 0.918, 1.0];
    pub const MYSTERY_BOX_RIM: [f32; 4] = [0.420, 0.129, 0.659, 1.0];
    pub const MARK: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const OBSTACLE: [f32; 4] = [0.918, 0.702, 0.031, 1.0];
    pub const OBSTACLE_STRIPE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    /// Clear color outside the road
    pub const BACKGROUND: [f32; 4] = [0.059, 0.090, 0.165, 1.0];
}
