use crate::post::{
    AfterimagePass, BloomPass, FxaaPass, OutputPass, RenderTarget, linear_sampler,
};
use crate::scene_pass::ScenePass;
use afterglow_scene::{Animator, PostChain};

/// wgpu-based scene renderer.
///
/// Owns every offscreen target of the chain
/// scene -> FXAA -> afterimage -> bloom -> output. Targets are sized to the
/// drawing buffer and rebuilt by [`WgpuRenderer::resize`].
pub struct WgpuRenderer {
    sampler: wgpu::Sampler,
    scene_target: RenderTarget,
    scene: ScenePass,
    fxaa: FxaaPass,
    afterimage: AfterimagePass,
    bloom: BloomPass,
    output: OutputPass,
    size: (u32, u32),
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        animator: &Animator,
    ) -> Self {
        let post = animator.post();
        let size = post.size();
        let sampler = linear_sampler(device);

        let scene_target = RenderTarget::new(device, "scene_target", size.0, size.1);
        let scene = ScenePass::new(device, animator, size.0, size.1);
        let fxaa = FxaaPass::new(
            device,
            &sampler,
            scene_target.view(),
            size,
            post.fxaa_resolution(),
        );
        let afterimage = AfterimagePass::new(
            device,
            &sampler,
            fxaa.output().view(),
            size,
            post.afterimage_damp(),
        );
        let bloom = BloomPass::new(
            device,
            &sampler,
            afterimage.output().view(),
            post.bloom_mip_sizes(),
            post.bloom(),
        );
        let output = OutputPass::new(
            device,
            &sampler,
            afterimage.output().view(),
            bloom.output().view(),
            post.exposure(),
            surface_format,
        );

        tracing::debug!(
            "renderer created at {}x{}, passes: {:?}",
            size.0,
            size.1,
            post.passes()
        );

        Self {
            sampler,
            scene_target,
            scene,
            fxaa,
            afterimage,
            bloom,
            output,
            size,
            surface_format,
        }
    }

    /// Rebuild all targets for the chain's current drawing-buffer size.
    /// Clears the afterimage history.
    pub fn resize(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, post: &PostChain) {
        let size = post.size();
        self.size = size;
        self.scene_target = RenderTarget::new(device, "scene_target", size.0, size.1);
        self.scene.resize(device, size.0, size.1);
        self.fxaa.resize(
            device,
            queue,
            &self.sampler,
            self.scene_target.view(),
            size,
            post.fxaa_resolution(),
        );
        self.afterimage
            .resize(device, &self.sampler, self.fxaa.output().view(), size);
        self.bloom.resize(
            device,
            &self.sampler,
            self.afterimage.output().view(),
            post.bloom_mip_sizes(),
        );
        self.output.rebind(
            device,
            &self.sampler,
            self.afterimage.output().view(),
            self.bloom.output().view(),
        );
        tracing::debug!("render targets resized to {}x{}", size.0, size.1);
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render the animator's current state through the whole chain into
    /// `view`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        animator: &Animator,
    ) {
        self.scene.update(queue, animator);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });
        self.scene.render(&mut encoder, self.scene_target.view());
        self.fxaa.render(&mut encoder);
        self.afterimage.render(&mut encoder);
        self.bloom.render(&mut encoder);
        self.output.render(&mut encoder, view);
        queue.submit(std::iter::once(encoder.finish()));
    }
}
