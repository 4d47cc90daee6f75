//! Post-processing chain description.
//!
//! Holds the fixed pass order, per-pass parameters and the values that
//! depend on the drawing-buffer size. The GPU backend reads everything it
//! needs from here; nothing in this module touches the GPU.

use afterglow_common::Viewport;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A stage of the post-processing chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassKind {
    /// Base scene render into an offscreen target.
    Render,
    /// Fast approximate anti-aliasing.
    Fxaa,
    /// Blend with a decayed copy of the previous output.
    Afterimage,
    /// Glow around bright regions.
    Bloom,
}

impl PassKind {
    pub fn name(self) -> &'static str {
        match self {
            PassKind::Render => "render",
            PassKind::Fxaa => "fxaa",
            PassKind::Afterimage => "afterimage",
            PassKind::Bloom => "bloom",
        }
    }
}

const PASS_ORDER: [PassKind; 4] = [
    PassKind::Render,
    PassKind::Fxaa,
    PassKind::Afterimage,
    PassKind::Bloom,
];

/// Unreal-style bloom parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    pub threshold: f32,
    pub strength: f32,
    pub radius: f32,
}

impl BloomSettings {
    /// Number of blur mip levels.
    pub const MIPS: usize = 5;
    /// Gaussian kernel radius per mip level.
    pub const KERNEL_RADII: [usize; Self::MIPS] = [3, 5, 7, 9, 11];
    /// Width of the soft knee above `threshold`.
    pub const SMOOTH_WIDTH: f32 = 0.01;
    const BASE_FACTORS: [f32; Self::MIPS] = [1.0, 0.8, 0.6, 0.4, 0.2];

    /// Per-mip composite weights, bent towards the coarse mips as `radius` grows.
    pub fn mip_factors(&self) -> [f32; Self::MIPS] {
        Self::BASE_FACTORS.map(|f| f + (1.2 - f - f) * self.radius)
    }
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            strength: 1.8,
            radius: 0.4,
        }
    }
}

/// One-sided Gaussian weights for a kernel of the given radius (sigma = radius).
pub fn gaussian_weights(radius: usize) -> Vec<f32> {
    let sigma = radius as f32;
    (0..radius)
        .map(|i| {
            let x = i as f32;
            0.39894 * (-0.5 * x * x / (sigma * sigma)).exp() / sigma
        })
        .collect()
}

/// Ordered render → FXAA → afterimage → bloom chain.
#[derive(Debug, Clone, PartialEq)]
pub struct PostChain {
    afterimage_damp: f32,
    bloom: BloomSettings,
    exposure: f32,
    width: u32,
    height: u32,
    fxaa_resolution: Vec2,
}

impl PostChain {
    pub fn new(viewport: Viewport, afterimage_damp: f32, bloom: BloomSettings, exposure: f32) -> Self {
        let mut chain = Self {
            afterimage_damp,
            bloom,
            exposure,
            width: 0,
            height: 0,
            fxaa_resolution: Vec2::ZERO,
        };
        chain.set_size(viewport);
        chain
    }

    /// Recompute every size-dependent value for a new viewport.
    pub fn set_size(&mut self, viewport: Viewport) {
        let (width, height) = viewport.physical_size();
        self.width = width;
        self.height = height;
        self.fxaa_resolution = Vec2::new(
            1.0 / (viewport.width * viewport.pixel_ratio),
            1.0 / (viewport.height * viewport.pixel_ratio),
        );
    }

    pub fn passes(&self) -> &'static [PassKind] {
        &PASS_ORDER
    }

    /// Drawing-buffer size in device pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Inverse drawing-buffer size used by the FXAA filter.
    pub fn fxaa_resolution(&self) -> Vec2 {
        self.fxaa_resolution
    }

    pub fn afterimage_damp(&self) -> f32 {
        self.afterimage_damp
    }

    pub fn bloom(&self) -> &BloomSettings {
        &self.bloom
    }

    pub fn exposure(&self) -> f32 {
        self.exposure
    }

    /// Sizes of the bloom blur targets, starting at half resolution.
    pub fn bloom_mip_sizes(&self) -> [(u32, u32); BloomSettings::MIPS] {
        let mut w = (self.width as f32 / 2.0).round();
        let mut h = (self.height as f32 / 2.0).round();
        let mut sizes = [(1, 1); BloomSettings::MIPS];
        for size in &mut sizes {
            *size = ((w as u32).max(1), (h as u32).max(1));
            w = (w / 2.0).round();
            h = (h / 2.0).round();
        }
        sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(viewport: Viewport) -> PostChain {
        PostChain::new(viewport, 0.95, BloomSettings::default(), 1.5)
    }

    #[test]
    fn pass_order_is_fixed() {
        let c = chain(Viewport::default());
        assert_eq!(
            c.passes(),
            &[
                PassKind::Render,
                PassKind::Fxaa,
                PassKind::Afterimage,
                PassKind::Bloom
            ]
        );
        let names: Vec<_> = c.passes().iter().map(|p| p.name()).collect();
        assert_eq!(names, ["render", "fxaa", "afterimage", "bloom"]);
    }

    #[test]
    fn fxaa_resolution_uses_pixel_ratio() {
        let mut c = chain(Viewport::new(800.0, 600.0, 1.0));
        c.set_size(Viewport::new(1024.0, 768.0, 2.0));
        assert_eq!(
            c.fxaa_resolution(),
            Vec2::new(1.0 / (1024.0 * 2.0), 1.0 / (768.0 * 2.0))
        );
        assert_eq!(c.size(), (2048, 1536));
    }

    #[test]
    fn bloom_defaults() {
        let b = BloomSettings::default();
        assert_eq!(b.threshold, 0.0);
        assert_eq!(b.strength, 1.8);
        assert_eq!(b.radius, 0.4);
    }

    #[test]
    fn mip_factors_lerp_by_radius() {
        let zero = BloomSettings {
            radius: 0.0,
            ..BloomSettings::default()
        };
        assert_eq!(zero.mip_factors(), [1.0, 0.8, 0.6, 0.4, 0.2]);

        let full = BloomSettings {
            radius: 1.0,
            ..BloomSettings::default()
        };
        let expected = [0.2, 0.4, 0.6, 0.8, 1.0];
        for (got, want) in full.mip_factors().iter().zip(expected) {
            assert!((got - want).abs() < 1e-6);
        }

        // radius 0.4: f + (1.2 - 2f) * 0.4
        let f = BloomSettings::default().mip_factors();
        assert!((f[0] - 0.68).abs() < 1e-6);
        assert!((f[4] - 0.52).abs() < 1e-6);
    }

    #[test]
    fn gaussian_weights_shape() {
        for radius in BloomSettings::KERNEL_RADII {
            let w = gaussian_weights(radius);
            assert_eq!(w.len(), radius);
            assert!(w.windows(2).all(|p| p[0] > p[1]));
            assert!((w[0] - 0.39894 / radius as f32).abs() < 1e-6);
        }
    }

    #[test]
    fn bloom_mips_halve_from_half_resolution() {
        let c = chain(Viewport::new(1280.0, 720.0, 1.0));
        assert_eq!(
            c.bloom_mip_sizes(),
            [(640, 360), (320, 180), (160, 90), (80, 45), (40, 23)]
        );
    }

    #[test]
    fn tiny_viewport_keeps_mips_nonzero() {
        let c = chain(Viewport::new(2.0, 2.0, 1.0));
        assert!(c.bloom_mip_sizes().iter().all(|&(w, h)| w >= 1 && h >= 1));
    }
}
