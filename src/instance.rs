//! Per-instance transformation data for GPU instancing.
//!
//! Every cube in the grid is one instance: the model matrix and the normal
//! matrix are packed into an instance-rate vertex buffer instead of being
//! uploaded as per-draw uniforms, so the whole grid renders in a single
//! indexed draw.

use cgmath::{Matrix, One, SquareMatrix};

/// Per-instance placement: position, rotation (as quaternion), and scale.
#[derive(Clone, Debug)]
pub struct Instance {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Instance {
    /// Identity transformation: no move, rotate, or scale.
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Model matrix: translate, then rotate, then scale.
    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Pack this instance for the GPU, deriving the normal matrix from the
    /// model-view composition.
    pub fn to_raw(&self, view: &cgmath::Matrix4<f32>) -> InstanceRaw {
        let model = self.to_matrix();
        let model_view = view * model;
        InstanceRaw {
            model: model.into(),
            normal: normal_matrix(&model_view).into(),
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper-left 3x3 of a homogeneous transform (rotation and scale only).
pub fn upper_left(m: &cgmath::Matrix4<f32>) -> cgmath::Matrix3<f32> {
    cgmath::Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate())
}

/// Inverse-transpose of the model-view's linear part.
///
/// This is what keeps normals perpendicular to surfaces under non-uniform
/// scale; for rigid transforms it equals the rotation itself. A singular
/// matrix (zero scale) falls back to the untransformed linear part.
pub fn normal_matrix(model_view: &cgmath::Matrix4<f32>) -> cgmath::Matrix3<f32> {
    let linear = upper_left(model_view);
    linear.invert().map(|inv| inv.transpose()).unwrap_or(linear)
}

/// The raw instance data as stored in GPU memory.
///
/// Stride layout: the model matrix as four vec4 columns (shader locations
/// 5 through 8), then the normal matrix as three vec3 columns (9 through 11).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
}

impl InstanceRaw {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // The shader only advances to the next element when a new
            // instance starts, not per vertex.
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // A mat4 occupies four vec4 slots; each needs its own entry.
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // Normal matrix as three vec3 columns.
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
