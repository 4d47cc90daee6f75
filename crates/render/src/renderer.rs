use afterglow_scene::{Animator, PerspectiveCamera};
use glam::Vec3;
use std::fmt::Write;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
}

impl RenderView {
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        Self {
            eye: camera.position,
            target: camera.target,
            fov_degrees: camera.fov.to_degrees(),
            aspect: camera.aspect,
        }
    }
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_camera(&PerspectiveCamera::default())
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the animator's current state and produces output.
/// It never advances or mutates the animator.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the animator's current state.
    fn render(&self, animator: &Animator) -> Self::Output;
}

/// Human-readable description of a frame.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// How many cubes to list individually. `None` lists all of them.
    pub max_cubes: Option<usize>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_cubes(max_cubes: usize) -> Self {
        Self {
            max_cubes: Some(max_cubes),
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, animator: &Animator) -> String {
        let scene = animator.scene();
        let view = RenderView::from_camera(animator.camera());
        let rot = scene.group.rotation;
        let post = animator.post();
        let (width, height) = post.size();

        // Writing into a String cannot fail.
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} (seed={}) ===",
            animator.frame_count(),
            animator.seed()
        );
        let _ = writeln!(out, "Cubes: {}", scene.group.len());
        let _ = writeln!(
            out,
            "Group rotation: ({:.5}, {:.5}, {:.5})",
            rot.x, rot.y, rot.z
        );
        match animator.pointer() {
            Some(p) => {
                let _ = writeln!(out, "Pointer: ({:.1}, {:.1})", p.x, p.y);
            }
            None => {
                let _ = writeln!(out, "Pointer: none");
            }
        }
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees,
            view.aspect
        );
        let passes: Vec<&str> = post.passes().iter().map(|p| p.name()).collect();
        let _ = writeln!(
            out,
            "Passes: {} @ {}x{} fxaa=({:.6}, {:.6})",
            passes.join(" -> "),
            width,
            height,
            post.fxaa_resolution().x,
            post.fxaa_resolution().y
        );

        let limit = self.max_cubes.unwrap_or(usize::MAX);
        for (i, cube) in scene.group.cubes().iter().take(limit).enumerate() {
            let p = cube.position;
            let _ = writeln!(
                out,
                "  [{i:3}] pos=({:.2}, {:.2}, {:.2}) scale={:.2} color={}",
                p.x, p.y, p.z, cube.scale, cube.color
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use afterglow_common::{PointerPosition, Viewport};
    use afterglow_scene::SceneConfig;

    fn animator() -> Animator {
        let config = SceneConfig {
            seed: Some(1),
            ..SceneConfig::default()
        };
        Animator::init(Viewport::new(800.0, 600.0, 1.0), &config)
    }

    #[test]
    fn debug_renderer_fresh_animator() {
        let renderer = DebugTextRenderer::with_max_cubes(0);
        let output = renderer.render(&animator());

        assert!(output.contains("Frame 0"));
        assert!(output.contains("seed=1"));
        assert!(output.contains("Cubes: 150"));
        assert!(output.contains("Pointer: none"));
        assert!(output.contains("render -> fxaa -> afterimage -> bloom"));
        assert!(!output.contains("pos="));
    }

    #[test]
    fn debug_renderer_lists_cubes() {
        let renderer = DebugTextRenderer::new();
        let output = renderer.render(&animator());
        assert_eq!(output.matches("pos=").count(), 150);
        assert!(output.contains("#FF1493"));
        assert!(output.contains("#7FFFD4"));
    }

    #[test]
    fn debug_renderer_reports_pointer() {
        let mut a = animator();
        a.on_pointer_move(PointerPosition::new(12.0, 34.0));
        a.frame();
        let output = DebugTextRenderer::with_max_cubes(1).render(&a);
        assert!(output.contains("Frame 1"));
        assert!(output.contains("Pointer: (12.0, 34.0)"));
        assert_eq!(output.matches("pos=").count(), 1);
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert!((view.fov_degrees - 45.0).abs() < 1e-4);
        assert_eq!(view.target, Vec3::ZERO);
    }
}
