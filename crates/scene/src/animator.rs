use crate::camera::PerspectiveCamera;
use crate::config::SceneConfig;
use crate::orbit::OrbitControls;
use crate::post::PostChain;
use crate::scene::Scene;
use afterglow_common::{Euler, PointerPosition, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-frame group rotation increment while no pointer has been seen.
pub const DRIFT: Euler = Euler {
    x: -0.0001,
    y: 0.0003,
    z: 0.0004,
};

/// Radians of group rotation per logical pixel of pointer offset.
pub const POINTER_ROTATION_SCALE: f32 = 0.0003;

const FOV_DEGREES: f32 = 45.0;
const NEAR: f32 = 1.0;
const FAR: f32 = 2000.0;

/// Owns all scene state and advances it once per display refresh.
///
/// Rendering is left to a backend that reads the animator after each
/// [`Animator::frame`]. All mutation happens on the thread driving the
/// event loop.
#[derive(Debug, Clone)]
pub struct Animator {
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    post: PostChain,
    pointer: Option<PointerPosition>,
    viewport: Viewport,
    frame_count: u64,
    seed: u64,
}

impl Animator {
    /// Build the scene, camera, orbit controls and post chain.
    ///
    /// A zero-area viewport is accepted and produces degenerate output.
    pub fn init(viewport: Viewport, config: &SceneConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = StdRng::seed_from_u64(seed);
        let scene = Scene::generate(&mut rng);

        let camera = PerspectiveCamera::new(FOV_DEGREES, viewport.aspect(), NEAR, FAR);
        let controls = OrbitControls::new(config.orbit);
        let post = PostChain::new(viewport, config.afterimage_damp, config.bloom, config.exposure);

        if viewport.is_empty() {
            tracing::warn!(
                "scene initialized with zero-area viewport {}x{}",
                viewport.width,
                viewport.height
            );
        }
        tracing::info!(
            seed,
            cubes = scene.group.len(),
            "scene initialized at {}x{} (pixel ratio {})",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );

        Self {
            scene,
            camera,
            controls,
            post,
            pointer: None,
            viewport,
            frame_count: 0,
            seed,
        }
    }

    /// Advance one display refresh: drift, pointer override, orbit damping.
    pub fn frame(&mut self) {
        let rotation = &mut self.scene.group.rotation;
        rotation.y += DRIFT.y;
        rotation.z += DRIFT.z;
        rotation.x += DRIFT.x;

        if let Some(pointer) = self.pointer {
            rotation.x = -pointer.y * POINTER_ROTATION_SCALE;
            rotation.y = -pointer.x * POINTER_ROTATION_SCALE;
        }

        self.controls.update(&mut self.camera);
        self.frame_count += 1;
    }

    /// Record the latest pointer position. The last call before a frame wins.
    pub fn on_pointer_move(&mut self, pointer: PointerPosition) {
        self.pointer = Some(pointer);
    }

    /// Track a new viewport size or pixel ratio.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        self.post.set_size(viewport);
        tracing::debug!(
            "resized to {}x{} (pixel ratio {})",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio
        );
    }

    /// Queue an orbit drag of `(dx, dy)` logical pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.controls.rotate(dx, dy, self.viewport.height);
    }

    /// Queue one zoom step. Positive zooms in.
    pub fn zoom(&mut self, direction: f32) {
        self.controls.dolly(direction);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn post(&self) -> &PostChain {
        &self.post
    }

    pub fn pointer(&self) -> Option<PointerPosition> {
        self.pointer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Seed the cube layout was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::CUBE_COUNT;
    use glam::Vec2;

    fn animator() -> Animator {
        let config = SceneConfig {
            seed: Some(42),
            ..SceneConfig::default()
        };
        Animator::init(Viewport::new(1280.0, 720.0, 1.0), &config)
    }

    #[test]
    fn init_builds_scene_and_camera() {
        let a = animator();
        assert_eq!(a.scene().group.len(), CUBE_COUNT);
        assert_eq!(a.camera().fov, 45.0_f32.to_radians());
        assert_eq!(a.camera().near, 1.0);
        assert_eq!(a.camera().far, 2000.0);
        assert_eq!(a.camera().aspect, 1280.0 / 720.0);
        assert_eq!(a.controls().settings().min_distance, 25.0);
        assert_eq!(a.controls().settings().max_distance, 450.0);
        assert_eq!(a.post().afterimage_damp(), 0.95);
        assert_eq!(a.pointer(), None);
        assert_eq!(a.frame_count(), 0);
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn drift_accumulates_without_pointer() {
        let mut a = animator();
        let n = 1000;
        for _ in 0..n {
            a.frame();
        }
        let r = a.scene().group.rotation;
        assert!((r.y - n as f32 * 0.0003).abs() < 1e-5);
        assert!((r.z - n as f32 * 0.0004).abs() < 1e-5);
        assert!((r.x + n as f32 * 0.0001).abs() < 1e-5);
        assert_eq!(a.frame_count(), n);
    }

    #[test]
    fn pointer_overrides_x_and_y_only() {
        let mut a = animator();
        for _ in 0..10 {
            a.frame();
        }
        let z_before = a.scene().group.rotation.z;

        a.on_pointer_move(PointerPosition::new(400.0, 240.0));
        a.frame();

        let r = a.scene().group.rotation;
        assert_eq!(r.x, -240.0 * 0.0003);
        assert_eq!(r.y, -400.0 * 0.0003);
        assert_eq!(r.z, z_before + 0.0004);
    }

    #[test]
    fn last_pointer_before_frame_wins() {
        let mut a = animator();
        a.on_pointer_move(PointerPosition::new(10.0, 20.0));
        a.on_pointer_move(PointerPosition::new(30.0, 40.0));
        a.frame();
        let r = a.scene().group.rotation;
        assert_eq!(r.x, -40.0 * 0.0003);
        assert_eq!(r.y, -30.0 * 0.0003);
    }

    #[test]
    fn pointer_at_origin_still_counts() {
        let mut a = animator();
        for _ in 0..5 {
            a.frame();
        }
        a.on_pointer_move(PointerPosition::new(0.0, 0.0));
        a.frame();
        let r = a.scene().group.rotation;
        assert_eq!(r.x, 0.0);
        assert_eq!(r.y, 0.0);
    }

    #[test]
    fn resize_updates_aspect_and_fxaa() {
        let mut a = animator();
        a.on_resize(Viewport::new(1000.0, 500.0, 2.0));
        assert_eq!(a.camera().aspect, 1000.0 / 500.0);
        assert_eq!(
            a.post().fxaa_resolution(),
            Vec2::new(1.0 / (1000.0 * 2.0), 1.0 / (500.0 * 2.0))
        );
        assert_eq!(a.post().size(), (2000, 1000));
    }

    #[test]
    fn zero_area_viewport_is_accepted() {
        let mut a = Animator::init(Viewport::new(0.0, 0.0, 1.0), &SceneConfig::default());
        assert!(!a.camera().aspect.is_finite());
        a.frame();
        assert_eq!(a.frame_count(), 1);
    }

    #[test]
    fn zoom_and_orbit_move_camera() {
        let mut a = animator();
        a.zoom(1.0);
        a.frame();
        assert!((a.camera().distance_to_target() - 285.0).abs() < 1e-2);

        let before = a.camera().position;
        a.orbit(50.0, 0.0);
        a.frame();
        assert_ne!(a.camera().position, before);
    }

    #[test]
    fn same_seed_same_layout() {
        assert_eq!(animator().scene(), animator().scene());
    }
}
