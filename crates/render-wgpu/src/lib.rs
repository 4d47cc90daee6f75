//! wgpu render backend for the afterglow scene.
//!
//! Draws the cube group into an HDR target and runs it through
//! FXAA, afterimage and bloom before tone mapping onto the surface.
//!
//! # Invariants
//! - Renderer never mutates the animator.
//! - Instance data is uploaded once; per-frame motion goes through uniforms.
//! - Every offscreen target follows the drawing-buffer size set on resize.

mod context;
mod error;
mod gpu;
mod mesh;
mod post;
mod scene_pass;
mod shaders;

pub use context::GpuContext;
pub use error::RenderError;
pub use gpu::WgpuRenderer;
