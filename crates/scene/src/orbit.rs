use crate::camera::PerspectiveCamera;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

const EPS: f32 = 1e-6;
const ZOOM_STEP: f32 = 0.95;

/// Tunables for [`OrbitControls`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            min_distance: 25.0,
            max_distance: 450.0,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

/// Camera orbit around a fixed target with damped rotation and clamped zoom.
///
/// Input only accumulates pending deltas; [`OrbitControls::update`] applies
/// them to the camera once per frame. There is no panning.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    settings: OrbitSettings,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            target: Vec3::ZERO,
            settings,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }

    pub fn settings(&self) -> &OrbitSettings {
        &self.settings
    }

    /// Queue a rotation from a pointer drag of `(dx, dy)` logical pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let speed = self.settings.rotate_speed;
        self.delta_theta -= TAU * dx / viewport_height * speed;
        self.delta_phi -= TAU * dy / viewport_height * speed;
    }

    /// Queue one zoom step. Positive moves closer, negative moves away.
    pub fn dolly(&mut self, direction: f32) {
        let step = ZOOM_STEP.powf(self.settings.zoom_speed);
        if direction > 0.0 {
            self.scale *= step;
        } else if direction < 0.0 {
            self.scale /= step;
        }
    }

    /// Whether rotation is still settling from earlier input.
    pub fn is_moving(&self) -> bool {
        self.delta_theta.abs() > EPS || self.delta_phi.abs() > EPS
    }

    /// Apply queued input to the camera and point it at the target.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let offset = camera.position - self.target;
        let (mut radius, mut theta, mut phi) = to_spherical(offset);

        let factor = if self.settings.enable_damping {
            self.settings.damping_factor
        } else {
            1.0
        };
        theta += self.delta_theta * factor;
        phi += self.delta_phi * factor;
        phi = phi.clamp(EPS, PI - EPS);

        radius = (radius * self.scale).clamp(self.settings.min_distance, self.settings.max_distance);

        camera.position = self.target + from_spherical(radius, theta, phi);
        camera.target = self.target;

        if self.settings.enable_damping {
            self.delta_theta *= 1.0 - factor;
            self.delta_phi *= 1.0 - factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(OrbitSettings::default())
    }
}

/// `(radius, theta, phi)` with theta around +Y from +Z and phi down from +Y.
fn to_spherical(v: Vec3) -> (f32, f32, f32) {
    let radius = v.length();
    if radius == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let theta = v.x.atan2(v.z);
    let phi = (v.y / radius).clamp(-1.0, 1.0).acos();
    (radius, theta, phi)
}

fn from_spherical(radius: f32, theta: f32, phi: f32) -> Vec3 {
    let sin_phi_radius = phi.sin() * radius;
    Vec3::new(
        sin_phi_radius * theta.sin(),
        phi.cos() * radius,
        sin_phi_radius * theta.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_update_keeps_camera() {
        let mut cam = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        controls.update(&mut cam);
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 0.0, 300.0), 1e-3));
    }

    #[test]
    fn zoom_in_clamps_to_min_distance() {
        let mut cam = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        for _ in 0..500 {
            controls.dolly(1.0);
            controls.update(&mut cam);
        }
        assert!((cam.distance_to_target() - 25.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_out_clamps_to_max_distance() {
        let mut cam = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        for _ in 0..500 {
            controls.dolly(-1.0);
            controls.update(&mut cam);
        }
        assert!((cam.distance_to_target() - 450.0).abs() < 1e-2);
    }

    #[test]
    fn single_zoom_step_scales_distance() {
        let mut cam = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        controls.dolly(1.0);
        controls.update(&mut cam);
        assert!((cam.distance_to_target() - 285.0).abs() < 1e-2);
    }

    #[test]
    fn damped_rotation_settles() {
        let mut cam = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        controls.rotate(100.0, 0.0, 720.0);
        controls.update(&mut cam);
        let first = cam.position;
        assert!(controls.is_moving());
        for _ in 0..1000 {
            controls.update(&mut cam);
        }
        assert!(!controls.is_moving());
        assert_ne!(first, cam.position);
        // Horizontal drag keeps the camera on the equator.
        assert!(cam.position.y.abs() < 1e-2);
        assert!((cam.distance_to_target() - 300.0).abs() < 1e-2);
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut cam = PerspectiveCamera::default();
        let mut controls = OrbitControls::new(OrbitSettings {
            enable_damping: false,
            ..OrbitSettings::default()
        });
        // A quarter-height drag is a quarter turn.
        controls.rotate(180.0, 0.0, 720.0);
        controls.update(&mut cam);
        assert!(!controls.is_moving());
        assert!(cam.position.abs_diff_eq(Vec3::new(-300.0, 0.0, 0.0), 1e-2));
    }

    #[test]
    fn polar_angle_never_flips() {
        let mut cam = PerspectiveCamera::default();
        let mut controls = OrbitControls::new(OrbitSettings {
            enable_damping: false,
            ..OrbitSettings::default()
        });
        controls.rotate(0.0, 10_000.0, 720.0);
        controls.update(&mut cam);
        assert!(cam.position.y > 0.0);
        assert!(cam.position.y <= 300.0 + 1e-3);
    }

    #[test]
    fn zero_height_viewport_ignores_drag() {
        let mut controls = OrbitControls::default();
        controls.rotate(50.0, 50.0, 0.0);
        assert!(!controls.is_moving());
    }

    #[test]
    fn spherical_round_trip() {
        let v = Vec3::new(10.0, -20.0, 30.0);
        let (r, t, p) = to_spherical(v);
        assert!(from_spherical(r, t, p).abs_diff_eq(v, 1e-4));
    }
}
