use super::fullscreen::FullscreenPass;
use super::target::{HDR_FORMAT, RenderTarget, uniform_buffer};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct FxaaUniforms {
    /// xy = one over the drawing-buffer size.
    pub resolution: [f32; 4],
}

impl FxaaUniforms {
    pub fn new(resolution: Vec2) -> Self {
        Self {
            resolution: [resolution.x, resolution.y, 0.0, 0.0],
        }
    }
}

/// Anti-aliases the scene target into its own output target.
pub(crate) struct FxaaPass {
    pass: FullscreenPass,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    output: RenderTarget,
}

impl FxaaPass {
    pub fn new(
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        source: &wgpu::TextureView,
        size: (u32, u32),
        resolution: Vec2,
    ) -> Self {
        let pass = FullscreenPass::new(
            device,
            "fxaa_pass",
            shaders::FXAA_FRAGMENT,
            "fs_fxaa",
            1,
            HDR_FORMAT,
        );
        let uniforms = uniform_buffer(device, "fxaa_uniforms", &FxaaUniforms::new(resolution));
        let bind_group = pass.bind_group(device, &uniforms, &[source], sampler);
        let output = RenderTarget::new(device, "fxaa_target", size.0, size.1);
        Self {
            pass,
            uniforms,
            bind_group,
            output,
        }
    }

    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        sampler: &wgpu::Sampler,
        source: &wgpu::TextureView,
        size: (u32, u32),
        resolution: Vec2,
    ) {
        queue.write_buffer(
            &self.uniforms,
            0,
            bytemuck::bytes_of(&FxaaUniforms::new(resolution)),
        );
        self.bind_group = self.pass.bind_group(device, &self.uniforms, &[source], sampler);
        self.output = RenderTarget::new(device, "fxaa_target", size.0, size.1);
    }

    pub fn output(&self) -> &RenderTarget {
        &self.output
    }

    pub fn render(&self, encoder: &mut wgpu::CommandEncoder) {
        self.pass.draw(encoder, self.output.view(), &self.bind_group);
    }
}
