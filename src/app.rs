use anyhow::Context;
use std::{sync::Arc, time::Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    gfx::{camera::camera_utils::CameraManager, rendering::RenderEngine, scene::Scene},
};

/// The table scene in a window, driven by a winit event loop
pub struct TabletopApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

/// Everything the event handlers share: window, renderer, scene and input state
struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    focused: bool,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl TabletopApp {
    /// Creates the event loop and the table scene.
    ///
    /// The window and GPU context are created once the event loop starts.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        let scene = Scene::table(CameraManager::from_config(&config.camera, aspect));
        scene.validate()?;

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                scene,
                focused: true,
                last_frame: Instant::now(),
                error: None,
            },
        })
    }

    /// Runs until the window closes or Escape is pressed
    ///
    /// # Errors
    /// Returns the error that stopped the event loop: window or GPU setup,
    /// a texture that failed to load, or an unrecoverable surface error.
    pub fn run(mut self) -> anyhow::Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop
            .run_app(&mut self.app_state)
            .context("Event loop failed")?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_config = &self.config.window;
        let window = Arc::new(
            event_loop
                .create_window(
                    WindowAttributes::default()
                        .with_title(window_config.title.clone())
                        .with_inner_size(PhysicalSize::new(window_config.width, window_config.height)),
                )
                .context("Failed to create window")?,
        );
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        let present_mode = window_config.present_mode();
        let lighting = self.config.lighting;
        let mut renderer = pollster::block_on(async move {
            RenderEngine::new(window, width, height, present_mode, lighting).await
        })
        .context("Failed to initialize GPU")?;

        renderer
            .load_scene(&self.scene, &self.config.asset_dir)
            .with_context(|| {
                format!("Failed to load scene from {}", self.config.asset_dir.display())
            })?;

        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);
        self.render_engine = Some(renderer);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state == ElementState::Pressed
            && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
        {
            event_loop.exit();
            return;
        }
        self.scene.camera_manager.process_keyboard_event(event);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;

        self.scene.update(dt);
        render_engine.update(&self.scene);
        if let Err(err) = render_engine.render_frame(&self.scene) {
            self.fail(event_loop, err.into());
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_graphics(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Focused(focused) => self.focused = focused,
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self.focused {
            self.scene.camera_manager.process_event(&event);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
