use super::fullscreen::FullscreenPass;
use super::target::{HDR_FORMAT, RenderTarget, uniform_buffer};
use crate::shaders;
use afterglow_scene::{BloomSettings, gaussian_weights};
use bytemuck::{Pod, Zeroable};

const MIPS: usize = BloomSettings::MIPS;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct HighPassUniforms {
    /// x = threshold, y = smooth width
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct BlurUniforms {
    /// xy = one over target size, zw = direction
    pub params: [f32; 4],
    /// x = kernel radius
    pub kernel: [f32; 4],
    pub weights: [[f32; 4]; 3],
}

impl BlurUniforms {
    pub fn new(size: (u32, u32), direction: [f32; 2], radius: usize) -> Self {
        let mut weights = [[0.0; 4]; 3];
        for (i, w) in gaussian_weights(radius).into_iter().take(12).enumerate() {
            weights[i / 4][i % 4] = w;
        }
        Self {
            params: [
                1.0 / size.0 as f32,
                1.0 / size.1 as f32,
                direction[0],
                direction[1],
            ],
            kernel: [radius as f32, 0.0, 0.0, 0.0],
            weights,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct CompositeUniforms {
    /// factors for mips 0..3
    pub factors: [f32; 4],
    /// x = factor for mip 4, y = strength
    pub tail: [f32; 4],
}

impl CompositeUniforms {
    pub fn new(settings: &BloomSettings) -> Self {
        let f = settings.mip_factors();
        Self {
            factors: [f[0], f[1], f[2], f[3]],
            tail: [f[4], settings.strength, 0.0, 0.0],
        }
    }
}

struct BlurStage {
    target: RenderTarget,
    // Kept alive for the bind group.
    _uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct BloomMip {
    horizontal: BlurStage,
    vertical: BlurStage,
}

/// Everything that depends on the drawing-buffer size.
struct BloomTargets {
    bright: RenderTarget,
    high_pass_bind_group: wgpu::BindGroup,
    mips: Vec<BloomMip>,
    output: RenderTarget,
    composite_bind_group: wgpu::BindGroup,
}

/// Pipelines and size-independent uniforms.
struct BloomPipelines {
    high_pass: FullscreenPass,
    blur: FullscreenPass,
    composite: FullscreenPass,
    high_pass_uniforms: wgpu::Buffer,
    composite_uniforms: wgpu::Buffer,
}

impl BloomPipelines {
    fn targets(
        &self,
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        source: &wgpu::TextureView,
        mip_sizes: [(u32, u32); MIPS],
    ) -> BloomTargets {
        let (width, height) = mip_sizes[0];
        let bright = RenderTarget::new(device, "bloom_bright", width, height);
        let high_pass_bind_group =
            self.high_pass
                .bind_group(device, &self.high_pass_uniforms, &[source], sampler);

        let mut mips: Vec<BloomMip> = Vec::with_capacity(MIPS);
        for (level, (&size, radius)) in mip_sizes
            .iter()
            .zip(BloomSettings::KERNEL_RADII)
            .enumerate()
        {
            let input = match mips.last() {
                Some(prev) => prev.vertical.target.view(),
                None => bright.view(),
            };
            let horizontal =
                self.blur_stage(device, sampler, input, size, [1.0, 0.0], radius, level);
            let vertical = self.blur_stage(
                device,
                sampler,
                horizontal.target.view(),
                size,
                [0.0, 1.0],
                radius,
                level,
            );
            mips.push(BloomMip {
                horizontal,
                vertical,
            });
        }

        let output = RenderTarget::new(device, "bloom_output", width, height);
        let views: Vec<&wgpu::TextureView> =
            mips.iter().map(|m| m.vertical.target.view()).collect();
        let composite_bind_group =
            self.composite
                .bind_group(device, &self.composite_uniforms, &views, sampler);

        BloomTargets {
            bright,
            high_pass_bind_group,
            mips,
            output,
            composite_bind_group,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn blur_stage(
        &self,
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        input: &wgpu::TextureView,
        size: (u32, u32),
        direction: [f32; 2],
        radius: usize,
        level: usize,
    ) -> BlurStage {
        let axis = if direction[0] > 0.0 { "h" } else { "v" };
        let label = format!("bloom_blur_{axis}{level}");
        let target = RenderTarget::new(device, &label, size.0, size.1);
        let uniforms = uniform_buffer(device, &label, &BlurUniforms::new(size, direction, radius));
        let bind_group = self.blur.bind_group(device, &uniforms, &[input], sampler);
        BlurStage {
            target,
            _uniforms: uniforms,
            bind_group,
        }
    }
}

/// Unreal-style bloom: high-pass, a five-level separable blur chain and a
/// weighted composite at half resolution.
pub(crate) struct BloomPass {
    pipelines: BloomPipelines,
    targets: BloomTargets,
}

impl BloomPass {
    pub fn new(
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        source: &wgpu::TextureView,
        mip_sizes: [(u32, u32); MIPS],
        settings: &BloomSettings,
    ) -> Self {
        let pipelines = BloomPipelines {
            high_pass: FullscreenPass::new(
                device,
                "bloom_high_pass",
                shaders::HIGH_PASS_FRAGMENT,
                "fs_high_pass",
                1,
                HDR_FORMAT,
            ),
            blur: FullscreenPass::new(
                device,
                "bloom_blur",
                shaders::BLUR_FRAGMENT,
                "fs_blur",
                1,
                HDR_FORMAT,
            ),
            composite: FullscreenPass::new(
                device,
                "bloom_composite",
                shaders::COMPOSITE_FRAGMENT,
                "fs_composite",
                MIPS as u32,
                HDR_FORMAT,
            ),
            high_pass_uniforms: uniform_buffer(
                device,
                "bloom_high_pass_uniforms",
                &HighPassUniforms {
                    params: [settings.threshold, BloomSettings::SMOOTH_WIDTH, 0.0, 0.0],
                },
            ),
            composite_uniforms: uniform_buffer(
                device,
                "bloom_composite_uniforms",
                &CompositeUniforms::new(settings),
            ),
        };
        let targets = pipelines.targets(device, sampler, source, mip_sizes);
        Self { pipelines, targets }
    }

    /// Rebuild every target for new mip sizes.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        source: &wgpu::TextureView,
        mip_sizes: [(u32, u32); MIPS],
    ) {
        self.targets = self.pipelines.targets(device, sampler, source, mip_sizes);
    }

    pub fn output(&self) -> &RenderTarget {
        &self.targets.output
    }

    pub fn render(&self, encoder: &mut wgpu::CommandEncoder) {
        let p = &self.pipelines;
        let t = &self.targets;
        p.high_pass
            .draw(encoder, t.bright.view(), &t.high_pass_bind_group);
        for mip in &t.mips {
            p.blur.draw(
                encoder,
                mip.horizontal.target.view(),
                &mip.horizontal.bind_group,
            );
            p.blur
                .draw(encoder, mip.vertical.target.view(), &mip.vertical.bind_group);
        }
        p.composite
            .draw(encoder, t.output.view(), &t.composite_bind_group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes() {
        assert_eq!(std::mem::size_of::<HighPassUniforms>(), 16);
        assert_eq!(std::mem::size_of::<BlurUniforms>(), 80);
        assert_eq!(std::mem::size_of::<CompositeUniforms>(), 32);
    }

    #[test]
    fn blur_uniforms_pack_weights() {
        let u = BlurUniforms::new((640, 360), [1.0, 0.0], 11);
        assert_eq!(u.params, [1.0 / 640.0, 1.0 / 360.0, 1.0, 0.0]);
        assert_eq!(u.kernel[0], 11.0);
        let w = gaussian_weights(11);
        assert_eq!(u.weights[0][0], w[0]);
        assert_eq!(u.weights[2][2], w[10]);
        assert_eq!(u.weights[2][3], 0.0);
    }

    #[test]
    fn composite_uniforms_carry_strength() {
        let settings = BloomSettings::default();
        let u = CompositeUniforms::new(&settings);
        let f = settings.mip_factors();
        assert_eq!(u.factors, [f[0], f[1], f[2], f[3]]);
        assert_eq!(u.tail[0], f[4]);
        assert_eq!(u.tail[1], 1.8);
    }

    #[test]
    fn largest_kernel_fits_uniform() {
        let max = BloomSettings::KERNEL_RADII.iter().copied().max().unwrap_or(0);
        assert!(max <= 12);
    }
}
