//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the animator.
//! - Render state derives from the animator's scene, camera and post chain.
//!
//! The GPU backend lives in `afterglow-render-wgpu`; this crate carries the
//! trait and a text renderer used by the CLI and in tests.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "afterglow-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
