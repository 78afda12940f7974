//! spin-cubes
//!
//! A minimal cross-platform demo that renders a 3x3 grid of spinning,
//! textured cubes through one shared wgpu pipeline, targeting both native
//! desktop windowing and the browser. The platform split is confined to a
//! handful of compile-time call sites: backend selection, device limits,
//! window-vs-canvas creation, asset access, and frame pacing.
//!
//! Modules
//! - `app`: frame driver, winit event loop and process lifecycle
//! - `camera`: fixed view/projection and the camera uniform
//! - `context`: central GPU and window context owning device/queue/surface
//! - `geometry`: the static cube tables and their interleaved GPU layout
//! - `grid`: the cube-grid scene, per-frame rotation and drawing
//! - `instance`: per-instance model and normal matrices for instancing
//! - `pipeline`: render pipeline and bind group layout construction
//! - `resources`: asset access, filesystem natively and HTTP on the web
//! - `texture`: diffuse, depth and fallback GPU textures

pub mod app;
pub mod camera;
pub mod context;
pub mod geometry;
pub mod grid;
pub mod instance;
pub mod pipeline;
pub mod resources;
pub mod texture;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use wgpu::*;

/// Browser entry point; the host page drives the loop from here on.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    if let Err(e) = app::run() {
        log::error!("fatal: {:#}", e);
    }
}
