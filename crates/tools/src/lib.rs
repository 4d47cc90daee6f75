//! Developer tooling: read-only views of the animated scene.
//!
//! # Invariants
//! - Inspection never mutates the animator.

mod inspector;

pub use inspector::{CubeInfo, SceneInspector, SceneSummary};
