use afterglow_input::{Action, InputState, Key};
use afterglow_render_wgpu::{GpuContext, WgpuRenderer};
use afterglow_scene::{Animator, SceneConfig};
use afterglow_tools::SceneInspector;
use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "afterglow-desktop", about = "Drifting cubes with trails and bloom")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML scene configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for cube placement (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Initial window width in logical pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "720")]
    height: u32,
}

/// Everything tied to a live window.
struct Session {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: WgpuRenderer,
    animator: Animator,
    input: InputState,
    show_inspector: bool,
    last_frame: Instant,
    frame_ms: f32,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Session {
    /// Feed an action to the animator. Returns `false` when the app should exit.
    fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::PointerMoved(p) => self.animator.on_pointer_move(p),
            Action::Orbit { dx, dy } => self.animator.orbit(dx, dy),
            Action::Zoom(direction) => self.animator.zoom(direction),
            Action::Resize(viewport) => {
                self.animator.on_resize(viewport);
                self.renderer
                    .resize(&self.gpu.device, &self.gpu.queue, self.animator.post());
            }
            Action::ToggleInspector => self.show_inspector = !self.show_inspector,
            Action::Quit => return false,
        }
        true
    }

    fn redraw(&mut self, egui_ctx: &EguiContext) {
        let now = Instant::now();
        self.frame_ms = (now - self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;

        self.animator.frame();

        let frame = match self.gpu.acquire() {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(e) => {
                tracing::error!("{e}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer
            .render(&self.gpu.device, &self.gpu.queue, &view, &self.animator);
        if self.show_inspector {
            self.draw_overlay(egui_ctx, &view);
        }

        frame.present();
        self.window.request_redraw();
    }

    fn draw_overlay(&mut self, egui_ctx: &EguiContext, view: &wgpu::TextureView) {
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let summary = SceneInspector::summary(&self.animator);
        let cubes = SceneInspector::cubes(self.animator.scene());
        let frame_ms = self.frame_ms;
        let full_output = egui_ctx.run(raw_input, |ctx| {
            draw_inspector(ctx, &summary, &cubes, frame_ms);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = self.gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let device = &self.gpu.device;
        let queue = &self.gpu.queue;
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        self.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn draw_inspector(
    ctx: &EguiContext,
    summary: &afterglow_tools::SceneSummary,
    cubes: &[afterglow_tools::CubeInfo],
    frame_ms: f32,
) {
    egui::SidePanel::left("inspector")
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.heading("Afterglow");
            ui.separator();
            ui.label(format!("Frame: {}  Seed: {}", summary.frame, summary.seed));
            ui.label(format!("Frame time: {frame_ms:.1} ms"));
            ui.label(format!(
                "Cubes: {} ({} accent)",
                summary.cube_count, summary.accent_cubes
            ));
            let r = summary.group_rotation;
            ui.label(format!("Rotation: ({:.4}, {:.4}, {:.4})", r.x, r.y, r.z));
            match summary.pointer {
                Some(p) => ui.label(format!("Pointer: ({:.0}, {:.0})", p.x, p.y)),
                None => ui.label("Pointer: none"),
            };
            let c = summary.camera_position;
            ui.label(format!(
                "Camera: ({:.1}, {:.1}, {:.1})  distance {:.1}",
                c[0], c[1], c[2], summary.camera_distance
            ));
            ui.label(format!(
                "Drawing buffer: {}x{}",
                summary.drawing_buffer.0, summary.drawing_buffer.1
            ));
            ui.separator();

            egui::CollapsingHeader::new("Cubes").show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(320.0)
                    .show(ui, |ui| {
                        for cube in cubes {
                            ui.monospace(cube.to_string());
                        }
                    });
            });

            ui.separator();
            ui.small("F1: Toggle Inspector | LMB drag: Orbit | Wheel: Zoom | Esc: Quit");
        });
}

struct GpuApp {
    scene_config: SceneConfig,
    initial_size: LogicalSize<u32>,
    session: Option<Session>,
    egui_ctx: EguiContext,
    failure: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(scene_config: SceneConfig, width: u32, height: u32) -> Self {
        Self {
            scene_config,
            initial_size: LogicalSize::new(width, height),
            session: None,
            egui_ctx: EguiContext::default(),
            failure: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Session> {
        let attrs = Window::default_attributes()
            .with_title("Afterglow")
            .with_inner_size(self.initial_size)
            .with_transparent(true);
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height)
            .context("initialize GPU")?;
        if !gpu.is_transparent() {
            tracing::warn!("surface does not support transparency, background will be opaque");
        }

        let input = InputState::new(size.width, size.height, window.scale_factor());
        let animator = Animator::init(input.viewport(), &self.scene_config);
        let renderer = WgpuRenderer::new(&gpu.device, gpu.format(), &animator);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);

        window.request_redraw();
        Ok(Session {
            window,
            gpu,
            renderer,
            animator,
            input,
            show_inspector: false,
            last_frame: Instant::now(),
            frame_ms: 0.0,
            egui_winit,
            egui_renderer,
        })
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(session) => self.session = Some(session),
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                self.failure = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(session) = &mut self.session else {
            return;
        };

        if session.show_inspector {
            let response = session.egui_winit.on_window_event(&session.window, &event);
            if response.consumed {
                return;
            }
        }

        let mut keep_running = true;
        match event {
            WindowEvent::CloseRequested => keep_running = false,
            WindowEvent::Resized(new_size) => {
                session.gpu.resize(new_size.width, new_size.height);
                let action = session.input.resized(new_size.width, new_size.height);
                keep_running = session.apply(action);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let action = session.input.scale_factor_changed(scale_factor);
                keep_running = session.apply(action);
            }
            WindowEvent::CursorMoved { position, .. } => {
                for action in session.input.cursor_moved(position.x, position.y) {
                    session.apply(action);
                }
            }
            WindowEvent::CursorLeft { .. } => session.input.cursor_left(),
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                session
                    .input
                    .primary_button(state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                if let Some(action) = session.input.wheel(dy) {
                    session.apply(action);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let key = match code {
                    KeyCode::F1 => Key::F1,
                    KeyCode::Escape => Key::Escape,
                    _ => Key::Other,
                };
                if let Some(action) = session.input.key_pressed(key) {
                    keep_running = session.apply(action);
                }
            }
            WindowEvent::RedrawRequested => session.redraw(&self.egui_ctx),
            _ => {}
        }

        if !keep_running {
            tracing::info!("closing after {} frames", session.animator.frame_count());
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = &self.session {
            session.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut scene_config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if cli.seed.is_some() {
        scene_config.seed = cli.seed;
    }

    tracing::info!("afterglow-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(scene_config, cli.width, cli.height);
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
