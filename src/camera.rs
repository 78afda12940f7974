//! Fixed camera and projection shared by every instance each frame.
//!
//! The demo has no camera controls: the view is a constant translation along
//! -z and the projection a fixed square perspective. Both are combined once
//! per frame into a single view-projection uniform.

use cgmath::{Deg, Matrix4, Rad, Vector3, perspective};

/// cgmath produces OpenGL clip space (z in [-1, 1]); wgpu expects z in
/// [0, 1]. This matrix remaps between the two.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// The camera is a plain translation: the scene sits 4 units in front of it.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub translation: Vector3<f32>,
}

impl Camera {
    pub fn new<T: Into<Vector3<f32>>>(translation: T) -> Self {
        Self {
            translation: translation.into(),
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new((0.0, 0.0, -4.0))
    }
}

/// Perspective projection: 60 degree vertical field of view, square aspect.
///
/// The aspect ratio intentionally stays 1.0 regardless of the surface size;
/// the original demo renders slightly stretched into its 4:3 window and
/// this reimplementation keeps that behaviour.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub fovy: Rad<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(fovy: F, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self {
            fovy: fovy.into(),
            aspect,
            znear,
            zfar,
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(Deg(60.0), 1.0, 0.1, 100.0)
    }
}

/// The uniform data handed to the vertex shader: projection * view.
///
/// The per-instance model matrix lives in the instance buffer, so this is
/// the only camera state the GPU sees.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_proj = (projection.matrix() * camera.view_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything camera-related the renderer needs: CPU state plus the GPU
/// buffer and bind group it is mirrored into.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}
