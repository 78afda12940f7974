//! Application lifecycle and the frame loop.
//!
//! winit owns the event pump on both targets. Each `RedrawRequested` renders
//! one frame and requests the next, so natively the loop free-runs with a
//! fixed inter-frame delay while on the web the host's animation scheduler
//! drives it. Initialization is async (adapter and device requests): the
//! native build blocks on a tokio runtime, the web build spawns the future
//! and delivers the finished state back through a user event.

use std::{iter, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::Context,
    grid::{CubeGrid, DrawCubeGrid, GridConfig},
    texture::Texture,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
const WINDOW_SIZE: (u32, u32) = (640, 480);
#[cfg(target_arch = "wasm32")]
const CANVAS_SIZE: (u32, u32) = (600, 450);

/// Fixed delay between frames on the blocking-loop target.
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DELAY: std::time::Duration = std::time::Duration::from_millis(16);

/// Everything the frame loop needs: GPU context, the scene, and the clock
/// the spin angle is derived from.
pub struct RenderState {
    ctx: Context,
    grid: CubeGrid,
    is_surface_configured: bool,
    started: Instant,
}

impl RenderState {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        let grid = CubeGrid::new(&ctx, GridConfig::default()).await;
        Ok(Self {
            ctx,
            grid,
            is_surface_configured: false,
            started: Instant::now(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
            // The projection aspect stays fixed at 1.0 on purpose, see
            // crate::camera::Projection.
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Keep the loop going.
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        #[cfg(feature = "benchmark")]
        let frame_started = Instant::now();

        self.grid.update(&self.ctx, self.started.elapsed());

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.draw_cube_grid(&self.grid, &self.ctx.camera.bind_group);
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();

        #[cfg(feature = "benchmark")]
        log::info!(
            "frame: {} instances in {:.2} ms (cpu)",
            self.grid.instances.len(),
            frame_started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(())
    }
}

#[allow(dead_code)]
pub(crate) enum AppEvent {
    // Message from the wasm `spawn_local` once async init completed.
    Initialized(Box<RenderState>),
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg(target_arch = "wasm32")]
    proxy: winit::event_loop::EventLoopProxy<AppEvent>,
    state: Option<RenderState>,
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(event_loop: &EventLoop<AppEvent>) -> anyhow::Result<Self> {
        #[cfg(target_arch = "wasm32")]
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let _ = event_loop;
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            #[cfg(target_arch = "wasm32")]
            proxy,
            state: None,
            init_error: None,
        })
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Spin Cubes");

        #[cfg(not(target_arch = "wasm32"))]
        {
            window_attributes = window_attributes
                .with_inner_size(LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1));
        }

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes
                .with_canvas(Some(html_canvas_element))
                .with_inner_size(LogicalSize::new(CANVAS_SIZE.0, CANVAS_SIZE.1));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("cannot create a window: {}", e);
                self.init_error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(RenderState::new(window)) {
                Ok(state) => {
                    state.ctx.window.request_redraw();
                    self.state = Some(state);
                }
                Err(e) => {
                    // Graphics init failure is the one fatal error: give up
                    // before entering the frame loop.
                    log::error!("graphics initialization failed: {:#}", e);
                    self.init_error = Some(e);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match RenderState::new(window).await {
                    Ok(state) => assert!(
                        proxy
                            .send_event(AppEvent::Initialized(Box::new(state)))
                            .is_ok()
                    ),
                    // There is no exit path on the web; report and stay idle.
                    Err(e) => log::error!("graphics initialization failed: {:#}", e),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Initialized(state) => {
                // Configure the surface and kick off the redraw cycle now
                // that async init is done.
                let mut state = *state;
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => match state.render() {
                Ok(()) => {
                    // Crude fixed pacing, standing in for the original's
                    // 16 ms inter-frame delay. The web target is paced by
                    // the host instead.
                    #[cfg(not(target_arch = "wasm32"))]
                    std::thread::sleep(FRAME_DELAY);
                }
                // Reconfigure the surface if it's lost or outdated
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = state.ctx.window.inner_size();
                    state.resize(size.width, size.height);
                }
                Err(e) => {
                    log::error!("unable to render {}", e);
                }
            },
            _ => {}
        }
    }
}

/// Set up logging, build the event loop, and run until quit.
///
/// Returns an error (native exit code 1) when window or graphics-context
/// creation fails; everything else is reported and survived.
pub fn run() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<AppEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop)?;
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.init_error.take() {
        return Err(e);
    }
    Ok(())
}
