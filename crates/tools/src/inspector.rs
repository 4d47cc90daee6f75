use afterglow_common::{Euler, PointerPosition, Rgb};
use afterglow_scene::{Animator, Scene};
use serde::Serialize;

/// Scene inspector for developer tooling.
///
/// Read-only queries used by the CLI and the desktop overlay.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the animator state.
    pub fn summary(animator: &Animator) -> SceneSummary {
        let scene = animator.scene();
        let camera = animator.camera();
        let (accent, primary) = color_counts(scene);
        SceneSummary {
            frame: animator.frame_count(),
            seed: animator.seed(),
            cube_count: scene.group.len(),
            accent_cubes: accent,
            primary_cubes: primary,
            group_rotation: scene.group.rotation,
            pointer: animator.pointer(),
            camera_distance: camera.distance_to_target(),
            camera_position: camera.position.to_array(),
            drawing_buffer: animator.post().size(),
        }
    }

    /// Details of one cube, if `index` is in range.
    pub fn inspect_cube(scene: &Scene, index: usize) -> Option<CubeInfo> {
        scene.group.cubes().get(index).map(|cube| CubeInfo {
            index,
            position: cube.position.to_array(),
            rotation: cube.rotation,
            scale: cube.scale,
            color: cube.color,
        })
    }

    /// Details of every cube in generation order.
    pub fn cubes(scene: &Scene) -> Vec<CubeInfo> {
        (0..scene.group.len())
            .filter_map(|i| Self::inspect_cube(scene, i))
            .collect()
    }
}

fn color_counts(scene: &Scene) -> (usize, usize) {
    let accent = scene
        .group
        .cubes()
        .iter()
        .filter(|c| c.color == afterglow_scene::ACCENT_COLOR)
        .count();
    (accent, scene.group.len() - accent)
}

/// Summary of the animator state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub frame: u64,
    pub seed: u64,
    pub cube_count: usize,
    pub accent_cubes: usize,
    pub primary_cubes: usize,
    pub group_rotation: Euler,
    pub pointer: Option<PointerPosition>,
    pub camera_distance: f32,
    pub camera_position: [f32; 3],
    pub drawing_buffer: (u32, u32),
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: frame={} seed={} cubes={} ({} accent) rotation=({:.4}, {:.4}, {:.4}) distance={:.1} buffer={}x{}",
            self.frame,
            self.seed,
            self.cube_count,
            self.accent_cubes,
            self.group_rotation.x,
            self.group_rotation.y,
            self.group_rotation.z,
            self.camera_distance,
            self.drawing_buffer.0,
            self.drawing_buffer.1,
        )
    }
}

/// Detailed info about a single cube.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CubeInfo {
    pub index: usize,
    pub position: [f32; 3],
    pub rotation: Euler,
    pub scale: f32,
    pub color: Rgb,
}

impl std::fmt::Display for CubeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cube [{:3}] pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2}) scale={:.2} color={}",
            self.index,
            self.position[0],
            self.position[1],
            self.position[2],
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
            self.scale,
            self.color,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use afterglow_common::Viewport;
    use afterglow_scene::SceneConfig;

    fn animator() -> Animator {
        let config = SceneConfig {
            seed: Some(11),
            ..SceneConfig::default()
        };
        Animator::init(Viewport::new(800.0, 600.0, 1.0), &config)
    }

    #[test]
    fn summary_fresh_animator() {
        let summary = SceneInspector::summary(&animator());
        assert_eq!(summary.frame, 0);
        assert_eq!(summary.seed, 11);
        assert_eq!(summary.cube_count, 150);
        assert_eq!(summary.accent_cubes, 30);
        assert_eq!(summary.primary_cubes, 120);
        assert_eq!(summary.pointer, None);
        assert!((summary.camera_distance - 300.0).abs() < 1e-3);
        assert_eq!(summary.drawing_buffer, (800, 600));
    }

    #[test]
    fn summary_tracks_frames() {
        let mut a = animator();
        a.frame();
        a.frame();
        let summary = SceneInspector::summary(&a);
        assert_eq!(summary.frame, 2);
        assert_eq!(summary.group_rotation, a.scene().group.rotation);
    }

    #[test]
    fn inspect_cube_found() {
        let a = animator();
        let info = SceneInspector::inspect_cube(a.scene(), 0).unwrap();
        let cube = &a.scene().group.cubes()[0];
        assert_eq!(info.position, cube.position.to_array());
        assert_eq!(info.color, afterglow_scene::ACCENT_COLOR);
    }

    #[test]
    fn inspect_cube_out_of_range() {
        assert!(SceneInspector::inspect_cube(animator().scene(), 150).is_none());
    }

    #[test]
    fn cubes_in_order() {
        let cubes = SceneInspector::cubes(animator().scene());
        assert_eq!(cubes.len(), 150);
        assert!(cubes.iter().enumerate().all(|(i, c)| c.index == i));
    }

    #[test]
    fn display_formats() {
        let a = animator();
        let s = format!("{}", SceneInspector::summary(&a));
        assert!(s.contains("frame=0"));
        assert!(s.contains("cubes=150"));

        let c = format!("{}", SceneInspector::inspect_cube(a.scene(), 1).unwrap());
        assert!(c.contains("Cube [  1]"));
        assert!(c.contains("#7FFFD4"));
    }

    #[test]
    fn summary_serializes() {
        let json = serde_json::to_value(SceneInspector::summary(&animator())).unwrap();
        assert_eq!(json["cube_count"], 150);
    }
}
