use afterglow_common::{Euler, Rgb};
use glam::{Mat4, Quat, Vec3};
use rand::Rng;
use serde::Serialize;

/// Number of cubes in the group.
pub const CUBE_COUNT: usize = 150;

/// Edge length of every cube before scaling.
pub const CUBE_SIZE: f32 = 2.0;

/// Base cube color (aquamarine).
pub const PRIMARY_COLOR: Rgb = Rgb(0x7FFFD4);

/// Color of every fifth cube (deep pink).
pub const ACCENT_COLOR: Rgb = Rgb(0xFF1493);

const ACCENT_EVERY: usize = 5;
const POSITION_SPREAD: f32 = 200.0;
const MAX_SCALE: f32 = 2.0;

/// Exponential-squared fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fog {
    pub color: Rgb,
    pub density: f32,
}

impl Fog {
    /// Fraction of fog color mixed in at the given view depth.
    pub fn factor(&self, depth: f32) -> f32 {
        1.0 - (-self.density * self.density * depth * depth).exp()
    }
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            density: 0.005,
        }
    }
}

/// Sky/ground gradient light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HemisphereLight {
    pub sky: Rgb,
    pub ground: Rgb,
    pub intensity: f32,
    pub position: Vec3,
}

impl HemisphereLight {
    /// Direction considered "up" for the sky color.
    pub fn up(&self) -> Vec3 {
        self.position.normalize_or(Vec3::Y)
    }
}

impl Default for HemisphereLight {
    fn default() -> Self {
        Self {
            sky: Rgb::WHITE,
            ground: Rgb(0x444444),
            intensity: 1.0,
            position: Vec3::new(0.0, 1000.0, 0.0),
        }
    }
}

/// Directional light shining from `position` towards the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from the lit surface towards the light.
    pub fn direction(&self) -> Vec3 {
        self.position.normalize_or(Vec3::Y)
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Rgb::WHITE,
            intensity: 1.0,
            position: Vec3::new(-3000.0, 1000.0, -1000.0),
        }
    }
}

/// One cube in the group. Immutable once generated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubeInstance {
    pub position: Vec3,
    pub rotation: Euler,
    pub scale: f32,
    pub color: Rgb,
}

impl CubeInstance {
    /// Cube transform relative to its group.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation.to_quat(),
            self.position,
        )
    }
}

/// Container of all cubes. Only its rotation changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub rotation: Euler,
    cubes: Vec<CubeInstance>,
}

impl Group {
    pub fn cubes(&self) -> &[CubeInstance] {
        &self.cubes
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn quat(&self) -> Quat {
        self.rotation.to_quat()
    }

    /// Group transform applied on top of every cube's own transform.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_quat(self.quat())
    }
}

/// Everything that gets drawn: lights, fog and the cube group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub fog: Fog,
    pub hemisphere: HemisphereLight,
    pub directional: DirectionalLight,
    pub group: Group,
}

impl Scene {
    /// Build the scene with randomly placed cubes.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let cubes = (0..CUBE_COUNT)
            .map(|i| {
                let position = Vec3::new(
                    rand_float_spread(rng, POSITION_SPREAD),
                    rand_float_spread(rng, POSITION_SPREAD),
                    rand_float_spread(rng, POSITION_SPREAD),
                );
                CubeInstance {
                    position,
                    // Position components double as the initial orientation.
                    rotation: Euler::from(position),
                    scale: rng.random::<f32>() * MAX_SCALE,
                    color: cube_color(i),
                }
            })
            .collect();

        Self {
            fog: Fog::default(),
            hemisphere: HemisphereLight::default(),
            directional: DirectionalLight::default(),
            group: Group {
                rotation: Euler::ZERO,
                cubes,
            },
        }
    }
}

/// Color assigned to the cube at `index`.
pub(crate) fn cube_color(index: usize) -> Rgb {
    if index % ACCENT_EVERY == 0 {
        ACCENT_COLOR
    } else {
        PRIMARY_COLOR
    }
}

/// Random float in `(-range / 2, range / 2]`.
fn rand_float_spread<R: Rng>(rng: &mut R, range: f32) -> f32 {
    range * (0.5 - rng.random::<f32>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scene(seed: u64) -> Scene {
        Scene::generate(&mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn generates_fixed_cube_count() {
        assert_eq!(scene(1).group.len(), CUBE_COUNT);
        assert_eq!(CUBE_COUNT, 150);
    }

    #[test]
    fn every_fifth_cube_is_accent() {
        let s = scene(2);
        for (i, cube) in s.group.cubes().iter().enumerate() {
            if i % 5 == 0 {
                assert_eq!(cube.color, Rgb(0xFF1493), "cube {i}");
            } else {
                assert_eq!(cube.color, Rgb(0x7FFFD4), "cube {i}");
            }
        }
    }

    #[test]
    fn cube_values_in_range() {
        for seed in 0..8 {
            for cube in scene(seed).group.cubes() {
                assert!((0.0..2.0).contains(&cube.scale));
                for v in cube.position.to_array() {
                    assert!((-100.0..=100.0).contains(&v));
                }
                assert_eq!(cube.rotation, Euler::from(cube.position));
            }
        }
    }

    #[test]
    fn same_seed_same_scene() {
        assert_eq!(scene(42), scene(42));
        assert_ne!(scene(42), scene(43));
    }

    #[test]
    fn group_starts_unrotated() {
        let s = scene(3);
        assert_eq!(s.group.rotation, Euler::ZERO);
        assert_eq!(s.group.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn lights_and_fog_defaults() {
        let s = scene(4);
        assert_eq!(s.fog.color, Rgb::BLACK);
        assert_eq!(s.fog.density, 0.005);
        assert_eq!(s.hemisphere.ground, Rgb(0x444444));
        assert_eq!(s.hemisphere.up(), Vec3::Y);
        assert_eq!(s.directional.position, Vec3::new(-3000.0, 1000.0, -1000.0));
        assert!((s.directional.direction().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn fog_thickens_with_depth() {
        let fog = Fog::default();
        assert_eq!(fog.factor(0.0), 0.0);
        assert!(fog.factor(100.0) < fog.factor(300.0));
        assert!(fog.factor(10_000.0) > 0.999);
    }

    #[test]
    fn model_matrix_places_cube() {
        let cube = CubeInstance {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Euler::ZERO,
            scale: 0.5,
            color: PRIMARY_COLOR,
        };
        let p = cube.model_matrix().transform_point3(Vec3::ONE);
        assert!(p.abs_diff_eq(Vec3::new(1.5, 2.5, 3.5), 1e-6));
    }
}
