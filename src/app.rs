//! Window, event loop and the per-frame drive of the desk scene.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::{CameraConfig, CameraState};
use crate::composer::{DrawDescriptor, SceneComposer};
use crate::desk_scene;
use crate::fly_camera::FlyCameraController;
use crate::gpu::GpuContext;
use crate::image_decoder::FileImageDecoder;
use crate::input::{Input, scroll_lines};
use crate::lighting::SceneLights;
use crate::mesh::ShapeMeshes;
use crate::scene_pass::ScenePass;
use crate::shader_params::{self as names, ShaderParams};
use crate::texture::GpuTextures;
use crate::uniforms::FrameUniforms;

/// Startup settings.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Directory the scene's textures are loaded from.
    pub asset_dir: PathBuf,
    pub camera: CameraConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Desk Scene".to_string(),
            width: 800,
            height: 600,
            asset_dir: PathBuf::from("assets"),
            camera: CameraConfig::default(),
        }
    }
}

impl AppConfig {
    /// An 800×600 "Desk Scene" window loading from `assets/`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Window title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial inner size in logical pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Directory `wood.jpg` is read from.
    pub fn asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    /// Starting pose, projection and controller tuning.
    pub fn camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }
}

/// Open the window and render the desk scene until it is closed.
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DeskApp::Pending(config);
    event_loop.run_app(&mut app).context("event loop terminated abnormally")?;

    match app {
        DeskApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

enum DeskApp {
    Pending(AppConfig),
    Running(Box<Running>),
    /// Window closed and GPU resources dropped; late events are ignored.
    Closed,
    Failed(anyhow::Error),
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    composer: SceneComposer<GpuTextures, ShapeMeshes>,
    pass: ScenePass,
    objects: Vec<DrawDescriptor>,
    camera_config: CameraConfig,
    camera: CameraState,
    controller: FlyCameraController,
    input: Input,
    lights: SceneLights,
    last_frame: Instant,
}

impl ApplicationHandler for DeskApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let DeskApp::Pending(config) = self else {
            return;
        };

        match Running::start(event_loop, config) {
            Ok(running) => {
                running.window.request_redraw();
                *self = DeskApp::Running(Box::new(running));
            }
            Err(err) => {
                log::error!("startup failed: {err:#}");
                *self = DeskApp::Failed(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let DeskApp::Running(app) = self else {
            return;
        };

        app.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                app.composer.release();
                *self = DeskApp::Closed;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app.gpu.resize(size.width, size.height);
                app.camera_config.aspect = app.gpu.aspect();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                app.controller.scroll(&mut app.camera, scroll_lines(&delta));
            }
            WindowEvent::RedrawRequested => {
                app.frame();
                app.window.request_redraw();
            }
            _ => {}
        }
    }
}

impl Running {
    fn start(event_loop: &ActiveEventLoop, config: &AppConfig) -> anyhow::Result<Self> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("failed to create window")?,
        );

        let gpu = GpuContext::new(window.clone())?;
        let textures = GpuTextures::new(&gpu.device, &gpu.queue);
        let pass = ScenePass::new(&gpu, textures.layout());
        let mut composer = SceneComposer::new(textures, ShapeMeshes::new(&gpu.device));
        desk_scene::prepare(&mut composer, &FileImageDecoder, &config.asset_dir);

        let camera = CameraState::new(&config.camera);
        Ok(Self {
            window,
            gpu,
            composer,
            pass,
            objects: desk_scene::objects(),
            camera_config: config.camera.clone(),
            camera,
            controller: FlyCameraController::new(&config.camera),
            input: Input::new(),
            lights: SceneLights::desk(camera.position, camera.front),
            last_frame: Instant::now(),
        })
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.camera = self.controller.update(self.camera, &self.input, dt);
        self.lights
            .track_camera(self.camera.position, self.camera.front);

        let params = self.composer.params_mut();
        params.set_vec3(names::VIEW_POS, self.camera.position);
        params.set_bool(names::USE_LIGHTING, true);
        self.lights.push(params);
        params.set_mat4(names::VIEW, self.camera.view_matrix());
        params.set_mat4(
            names::PROJECTION,
            self.camera_config.projection_matrix(self.camera.projection),
        );

        desk_scene::render(&mut self.composer, &self.objects);
        let draws = self.composer.meshes_mut().take_draws();
        let frame = FrameUniforms::from_store(self.composer.params());

        self.pass.ensure_depth_size(&self.gpu);
        self.pass.prepare(&self.gpu, &frame, &draws);

        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                return;
            }
            Err(err) => {
                log::warn!("skipping frame: {err}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(desk_scene::CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.pass.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.pass.render(
                &mut render_pass,
                self.composer.textures().backend().bind_group(),
                self.composer.meshes(),
                &draws,
            );
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}
