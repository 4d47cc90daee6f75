use super::fullscreen::FullscreenPass;
use super::target::{HDR_FORMAT, RenderTarget, uniform_buffer};
use crate::shaders;
use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct AfterimageUniforms {
    /// x = damp
    pub params: [f32; 4],
}

/// Blends each frame with a decayed copy of the previous output.
///
/// The history target holds last frame's output. It starts out cleared and
/// is reset whenever the drawing buffer is resized.
pub(crate) struct AfterimagePass {
    pass: FullscreenPass,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    output: RenderTarget,
    history: RenderTarget,
}

impl AfterimagePass {
    pub fn new(
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        source: &wgpu::TextureView,
        size: (u32, u32),
        damp: f32,
    ) -> Self {
        let pass = FullscreenPass::new(
            device,
            "afterimage_pass",
            shaders::AFTERIMAGE_FRAGMENT,
            "fs_afterimage",
            2,
            HDR_FORMAT,
        );
        let uniforms = uniform_buffer(
            device,
            "afterimage_uniforms",
            &AfterimageUniforms {
                params: [damp, 0.0, 0.0, 0.0],
            },
        );
        let output = RenderTarget::new(device, "afterimage_target", size.0, size.1);
        let history = RenderTarget::new(device, "afterimage_history", size.0, size.1);
        let bind_group = pass.bind_group(device, &uniforms, &[source, history.view()], sampler);
        Self {
            pass,
            uniforms,
            bind_group,
            output,
            history,
        }
    }

    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        source: &wgpu::TextureView,
        size: (u32, u32),
    ) {
        self.output = RenderTarget::new(device, "afterimage_target", size.0, size.1);
        self.history = RenderTarget::new(device, "afterimage_history", size.0, size.1);
        self.bind_group = self.pass.bind_group(
            device,
            &self.uniforms,
            &[source, self.history.view()],
            sampler,
        );
    }

    pub fn output(&self) -> &RenderTarget {
        &self.output
    }

    /// Draw the blended frame, then keep it as next frame's history.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder) {
        self.pass.draw(encoder, self.output.view(), &self.bind_group);
        encoder.copy_texture_to_texture(
            self.output.texture().as_image_copy(),
            self.history.texture().as_image_copy(),
            self.output.extent(),
        );
    }
}
