//! The cube grid: instance layout, per-frame rotation, and drawing.
//!
//! This is the whole scene. A fixed 2D grid of cube instances spins in
//! lockstep about the Y axis at a rate tied to wall-clock time. The grid
//! shape is decided once at startup; per frame only the shared rotation
//! changes, so the update rewrites the instance buffer and a single indexed
//! draw renders every cube.

use cgmath::{Rad, Rotation3, Vector3};
use instant::Duration;
use wgpu::util::DeviceExt;

use crate::{
    context::Context,
    geometry::CubeMesh,
    instance::Instance,
    pipeline::{diffuse_layout, mk_cube_pipeline},
    resources,
    texture::Texture,
};

/// Full rotation in radians, used to wrap the spin angle.
const TAU: f64 = std::f64::consts::TAU;

/// Shape and motion parameters of the grid.
#[derive(Debug, Clone, Copy)]
pub struct GridConfig {
    /// The grid spans [-half_extent, half_extent] on x and y.
    pub half_extent: f32,
    /// Distance between neighbouring cells.
    pub step: f32,
    /// Uniform scale applied to every cube.
    pub scale: f32,
    /// Spin rate in radians per millisecond of elapsed time.
    pub spin_rate: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            half_extent: 1.0,
            // The benchmark build packs ~40k cubes into the same span to
            // stress instance-buffer upload and draw throughput.
            step: if cfg!(feature = "benchmark") { 0.01 } else { 1.0 },
            scale: 0.25,
            spin_rate: 0.002,
        }
    }
}

impl GridConfig {
    /// Number of cells along one axis.
    ///
    /// Derived as an integer up front instead of accumulating a float loop
    /// variable, which would drift at small step sizes and skip or duplicate
    /// an edge cell.
    pub fn cells_per_axis(&self) -> u32 {
        (2.0 * self.half_extent / self.step).round() as u32 + 1
    }

    /// All cell positions, x-major, in the z = 0 plane.
    pub fn cell_positions(&self) -> Vec<Vector3<f32>> {
        let n = self.cells_per_axis();
        let mut positions = Vec::with_capacity((n * n) as usize);
        for i in 0..n {
            let x = -self.half_extent + i as f32 * self.step;
            for j in 0..n {
                let y = -self.half_extent + j as f32 * self.step;
                positions.push(Vector3::new(x, y, 0.0));
            }
        }
        positions
    }

    /// Rotation angle about +Y after `elapsed` wall-clock time.
    ///
    /// Zero at start, grows monotonically, wraps at 2*pi so f32 precision
    /// doesn't decay over long runtimes.
    pub fn spin_angle(&self, elapsed: Duration) -> Rad<f32> {
        let millis = elapsed.as_secs_f64() * 1000.0;
        Rad(((millis * self.spin_rate) % TAU) as f32)
    }
}

/// GPU resources and CPU mirror state for the grid of cubes.
pub struct CubeGrid {
    pub config: GridConfig,
    pub mesh: CubeMesh,
    pub instances: Vec<Instance>,
    pub instance_buffer: wgpu::Buffer,
    pub diffuse_bind_group: wgpu::BindGroup,
    pub pipeline: wgpu::RenderPipeline,
}

impl CubeGrid {
    pub async fn new(ctx: &Context, config: GridConfig) -> Self {
        let mesh = CubeMesh::new(&ctx.device);

        // Texture decode failure is deliberately non-fatal: log it and
        // render lit-but-white cubes instead.
        let diffuse_texture =
            match resources::load_texture("cube.png", &ctx.device, &ctx.queue).await {
                Ok(texture) => texture,
                Err(e) => {
                    log::error!("cannot load cube texture: {:#}", e);
                    Texture::create_fallback_texture(&ctx.device, &ctx.queue)
                }
            };
        let diffuse_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &diffuse_layout(&ctx.device),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&diffuse_texture.sampler),
                },
            ],
            label: Some("diffuse_bind_group"),
        });

        let pipeline = mk_cube_pipeline(&ctx.device, &ctx.config, &ctx.camera.bind_group_layout);

        let instances = config
            .cell_positions()
            .into_iter()
            .map(|position| {
                let mut instance = Instance::new();
                instance.position = position;
                instance.scale = Vector3::new(config.scale, config.scale, config.scale);
                instance
            })
            .collect::<Vec<_>>();

        let view = ctx.camera.camera.view_matrix();
        let instance_data = instances
            .iter()
            .map(|i| i.to_raw(&view))
            .collect::<Vec<_>>();
        let instance_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Instance Buffer"),
                contents: bytemuck::cast_slice(&instance_data),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

        Self {
            config,
            mesh,
            instances,
            instance_buffer,
            diffuse_bind_group,
            pipeline,
        }
    }

    /// Advance the shared rotation to `elapsed` and mirror the instances
    /// into the GPU buffer.
    ///
    /// The renderer never reads the clock itself; frame time is passed in so
    /// the grid can be driven deterministically.
    pub fn update(&mut self, ctx: &Context, elapsed: Duration) {
        let angle = self.config.spin_angle(elapsed);
        let rotation = cgmath::Quaternion::from_angle_y(angle);
        for instance in self.instances.iter_mut() {
            instance.rotation = rotation;
        }
        self.write_to_buffer(ctx);
    }

    pub fn write_to_buffer(&self, ctx: &Context) {
        let view = ctx.camera.camera.view_matrix();
        let instance_data = self
            .instances
            .iter()
            .map(|i| i.to_raw(&view))
            .collect::<Vec<_>>();
        ctx.queue.write_buffer(
            &self.instance_buffer,
            0,
            bytemuck::cast_slice(&instance_data),
        );
    }
}

/// Draw helper so the render pass body stays declarative.
pub trait DrawCubeGrid<'a> {
    fn draw_cube_grid(&mut self, grid: &'a CubeGrid, camera_bind_group: &'a wgpu::BindGroup);
}

impl<'a, 'b> DrawCubeGrid<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_cube_grid(&mut self, grid: &'b CubeGrid, camera_bind_group: &'b wgpu::BindGroup) {
        if grid.instances.is_empty() {
            log::warn!("you attempted to render a grid with zero instances");
            return;
        }
        self.set_pipeline(&grid.pipeline);
        self.set_bind_group(0, &grid.diffuse_bind_group, &[]);
        self.set_bind_group(1, camera_bind_group, &[]);
        self.set_vertex_buffer(0, grid.mesh.vertex_buffer.slice(..));
        self.set_vertex_buffer(1, grid.instance_buffer.slice(..));
        self.set_index_buffer(grid.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..grid.mesh.num_indices, 0, 0..grid.instances.len() as u32);
    }
}
