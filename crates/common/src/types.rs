use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A 24-bit color stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x000000);
    pub const WHITE: Rgb = Rgb(0xffffff);

    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Channels in sRGB space, normalized to `[0, 1]`.
    pub fn to_srgb(self) -> Vec3 {
        Vec3::new(self.r() as f32, self.g() as f32, self.b() as f32) / 255.0
    }

    /// Channels converted to linear space for lighting math on the GPU.
    pub fn to_linear(self) -> Vec3 {
        let c = self.to_srgb();
        Vec3::new(srgb_to_linear(c.x), srgb_to_linear(c.y), srgb_to_linear(c.z))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06X}", self.0 & 0x00ff_ffff)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Euler rotation in radians, applied in X then Y then Z order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Euler {
    pub const ZERO: Euler = Euler {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.x, self.y, self.z)
    }
}

impl From<Vec3> for Euler {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Size of the drawing area in logical pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Build a viewport from a physical window size and its scale factor.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let ratio = scale_factor as f32;
        Self::new(width as f32 / ratio, height as f32 / ratio, ratio)
    }

    /// Width over height. Degenerate for zero-area viewports.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Backing-store size in device pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round() as u32,
            (self.height * self.pixel_ratio).round() as u32,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

/// Last observed pointer location in logical pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_channels() {
        let c = Rgb(0xFF1493);
        assert_eq!(c.r(), 0xFF);
        assert_eq!(c.g(), 0x14);
        assert_eq!(c.b(), 0x93);
        assert_eq!(c.to_string(), "#FF1493");
    }

    #[test]
    fn linear_conversion_keeps_extremes() {
        assert_eq!(Rgb::BLACK.to_linear(), Vec3::ZERO);
        let white = Rgb::WHITE.to_linear();
        assert!((white - Vec3::ONE).abs().max_element() < 1e-6);
    }

    #[test]
    fn euler_zero_is_identity() {
        assert_eq!(Euler::ZERO.to_quat(), Quat::IDENTITY);
    }

    #[test]
    fn euler_applies_x_first() {
        // Rx(90) * Ry(90): local Y after X rotation
        let q = Euler::new(std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2, 0.0).to_quat();
        let expected = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)
            * Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        assert!(q.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn viewport_from_physical() {
        let v = Viewport::from_physical(2560, 1440, 2.0);
        assert_eq!(v.width, 1280.0);
        assert_eq!(v.height, 720.0);
        assert_eq!(v.physical_size(), (2560, 1440));
        assert_eq!(v.aspect(), 1280.0 / 720.0);
    }

    #[test]
    fn zero_area_viewport_is_empty() {
        assert!(Viewport::new(0.0, 300.0, 1.0).is_empty());
        assert!(!Viewport::default().is_empty());
    }
}
