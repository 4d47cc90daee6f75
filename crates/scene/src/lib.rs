//! Scene animator: the GPU-free half of the afterglow scene.
//!
//! Owns the scene graph (150 cubes in one rotating group, fog, two lights),
//! the perspective camera and its orbit controller, the post-processing
//! chain description, and the latest pointer position.
//!
//! # Invariants
//! - The cube count is fixed for the lifetime of an [`Animator`].
//! - Post-processing pass order is fixed: render, FXAA, afterimage, bloom.
//! - Without a recorded pointer position the group only drifts.

mod animator;
mod camera;
mod config;
mod orbit;
mod post;
mod scene;

pub use animator::{Animator, DRIFT, POINTER_ROTATION_SCALE};
pub use camera::PerspectiveCamera;
pub use config::{ConfigError, SceneConfig};
pub use orbit::{OrbitControls, OrbitSettings};
pub use post::{BloomSettings, PassKind, PostChain, gaussian_weights};
pub use scene::{
    ACCENT_COLOR, CUBE_COUNT, CUBE_SIZE, CubeInstance, DirectionalLight, Fog, Group,
    HemisphereLight, PRIMARY_COLOR, Scene,
};

pub fn crate_info() -> &'static str {
    "afterglow-scene v0.1.0"
}
