use super::fullscreen::FullscreenPass;
use super::target::uniform_buffer;
use crate::shaders;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct OutputUniforms {
    /// x = exposure
    pub params: [f32; 4],
}

/// Adds bloom over the frame and tone maps it onto the surface.
pub(crate) struct OutputPass {
    pass: FullscreenPass,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl OutputPass {
    pub fn new(
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        base: &wgpu::TextureView,
        bloom: &wgpu::TextureView,
        exposure: f32,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let pass = FullscreenPass::new(
            device,
            "output_pass",
            shaders::OUTPUT_FRAGMENT,
            "fs_output",
            2,
            surface_format,
        );
        let uniforms = uniform_buffer(
            device,
            "output_uniforms",
            &OutputUniforms {
                params: [exposure, 0.0, 0.0, 0.0],
            },
        );
        let bind_group = pass.bind_group(device, &uniforms, &[base, bloom], sampler);
        Self {
            pass,
            uniforms,
            bind_group,
        }
    }

    pub fn rebind(
        &mut self,
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        base: &wgpu::TextureView,
        bloom: &wgpu::TextureView,
    ) {
        self.bind_group = self
            .pass
            .bind_group(device, &self.uniforms, &[base, bloom], sampler);
    }

    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        self.pass.draw(encoder, surface_view, &self.bind_group);
    }
}
