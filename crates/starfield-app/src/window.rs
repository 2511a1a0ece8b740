//! Background window, event handling, and the per-frame callback.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use starfield_config::Config;
use starfield_input::MouseState;
use starfield_render::{
    Camera, FrameEncoder, RenderContext, RenderPassBuilder, SurfaceError, SurfaceOptions,
    SurfaceResizeEvent, SurfaceWrapper, init_render_context_blocking,
};
use starfield_space::{FrameViewport, StarfieldRenderer, StarfieldScene};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::{ElementState, KeyEvent, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId, WindowLevel};

use crate::game_loop::FrameClock;
use crate::startup::{InitRetry, RetryDecision};

/// Returns [`WindowAttributes`] for a background layer built from `config`.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let window = &config.window;
    let level = if window.always_on_bottom {
        WindowLevel::AlwaysOnBottom
    } else {
        WindowLevel::Normal
    };
    let fullscreen = window.fullscreen.then_some(Fullscreen::Borderless(None));

    WindowAttributes::default()
        .with_title(window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            window.width as f64,
            window.height as f64,
        ))
        .with_transparent(window.transparent)
        .with_decorations(window.decorations)
        .with_window_level(level)
        .with_fullscreen(fullscreen)
}

/// Startup notice for a background layer that still intercepts pointer input.
fn pointer_capture_notice(config: &Config) -> Option<&'static str> {
    (!config.window.click_through).then_some(
        "Background window is not click-through and will catch desktop clicks; \
         set window.click_through or pass --click-through true to disable cursor parallax \
         and let clicks pass",
    )
}

/// Application state: window, GPU context, scene, and input.
pub struct AppState {
    config: Config,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    renderer: Option<StarfieldRenderer>,
    surface_wrapper: SurfaceWrapper,
    camera: Camera,
    scene: StarfieldScene,
    mouse: MouseState,
    clock: FrameClock,
    retry: InitRetry,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let surface_wrapper = SurfaceWrapper::new(config.window.width, config.window.height, 1.0);
        let size = surface_wrapper.physical_size();
        let retry = InitRetry::new(config.retry_interval(), config.startup.max_attempts);
        let scene = StarfieldScene::new(config.scene.seed);

        Self {
            window: None,
            gpu: None,
            renderer: None,
            surface_wrapper,
            camera: Camera::new(size.aspect_ratio()),
            scene,
            mouse: MouseState::new(),
            clock: FrameClock::new(),
            retry,
            config,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn surface_wrapper(&self) -> &SurfaceWrapper {
        &self.surface_wrapper
    }

    /// Apply a new physical window size to the camera and surface.
    pub fn handle_resize(&mut self, width: u32, height: u32) -> Option<SurfaceResizeEvent> {
        let resize = self.surface_wrapper.handle_resize(width, height)?;
        self.apply_resize(resize);
        Some(resize)
    }

    fn handle_scale_factor_changed(&mut self, scale_factor: f64) {
        let Some(window) = &self.window else {
            return;
        };
        let inner = window.inner_size();
        if let Some(resize) =
            self.surface_wrapper
                .handle_scale_factor_changed(scale_factor, inner.width, inner.height)
        {
            self.apply_resize(resize);
        }
    }

    fn apply_resize(&mut self, resize: SurfaceResizeEvent) {
        let w = resize.physical.width;
        let h = resize.physical.height;
        self.camera.set_aspect_ratio(w as f32, h as f32);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(w, h);
        }
        info!(
            "Window resized to {}x{} (scale: {:.2})",
            w, h, resize.scale_factor
        );
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Option<Arc<Window>> {
        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return None;
            }
        };

        if let Some(notice) = pointer_capture_notice(&self.config) {
            info!("{notice}");
        } else if let Err(e) = window.set_cursor_hittest(false) {
            warn!("Click-through not supported on this platform: {e}");
        }

        let inner = window.inner_size();
        self.surface_wrapper = SurfaceWrapper::new(inner.width, inner.height, window.scale_factor());
        let size = self.surface_wrapper.physical_size();
        self.camera.set_aspect_ratio(size.width as f32, size.height as f32);
        info!(
            "Window created: {}x{} (scale: {:.2})",
            size.width,
            size.height,
            window.scale_factor()
        );

        self.window = Some(window.clone());
        Some(window)
    }

    /// One attempt at bringing up the GPU. Missing adapters are retried.
    fn try_initialize_gpu(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let options = SurfaceOptions {
            vsync: self.config.window.vsync,
            transparent: self.config.window.transparent,
        };

        let mut gpu = match init_render_context_blocking(window.clone(), options) {
            Ok(gpu) => gpu,
            Err(e) if e.is_retryable() => {
                match self.retry.record_failure(Instant::now()) {
                    RetryDecision::RetryAt(at) => {
                        info!(
                            attempt = self.retry.failures(),
                            "Waiting for GPU adapter, retrying in {:?}",
                            self.retry.interval()
                        );
                        event_loop.set_control_flow(ControlFlow::WaitUntil(at));
                    }
                    RetryDecision::GiveUp => {
                        error!(
                            "No GPU adapter after {} attempts, giving up",
                            self.retry.failures()
                        );
                        event_loop.exit();
                    }
                }
                return;
            }
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = self.surface_wrapper.physical_size();
        gpu.resize(size.width, size.height);

        match StarfieldRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.surface_format,
            &self.scene,
            &self.camera,
        ) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => {
                error!("Failed to create starfield renderer: {e}");
                event_loop.exit();
                return;
            }
        }

        self.gpu = Some(gpu);
        self.clock = FrameClock::new();
        event_loop.set_control_flow(ControlFlow::Wait);
        window.request_redraw();
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(renderer)) = (&self.gpu, &mut self.renderer) else {
            return;
        };

        let frame = self.clock.tick();
        let size = self.surface_wrapper.physical_size();
        let mouse = if self.config.scene.mouse_parallax {
            self.mouse.normalized(size.width, size.height)
        } else {
            Vec2::ZERO
        };

        self.scene
            .update(frame.elapsed, frame.delta, mouse, &mut self.camera);
        renderer.update(
            &gpu.queue,
            &self.scene,
            &self.camera,
            FrameViewport {
                size: (size.width, size.height),
                scale_factor: self.surface_wrapper.scale_factor() as f32,
            },
        );
        let streaks = renderer.visible_streaks();

        let acquired = gpu.get_current_texture();
        match acquired {
            Ok(surface_texture) => {
                let mut encoder = FrameEncoder::new(&gpu.device, &gpu.queue, surface_texture);
                {
                    let builder = RenderPassBuilder::new().label("starfield-pass");
                    let mut pass = encoder.begin_render_pass(&builder);
                    renderer.render(&mut pass);
                }
                encoder.submit();
            }
            Err(SurfaceError::Lost) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
            }
        }

        if self.config.debug.log_frame_stats
            && let Some(stats) = self.clock.take_stats(Instant::now())
        {
            info!(
                frames = stats.frames,
                clamped = stats.clamped_frames,
                streaks,
                "Frame stats: {:.1} fps",
                stats.fps
            );
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ApplicationHandler for AppState {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause
            && self.window.is_some()
            && self.gpu.is_none()
        {
            self.try_initialize_gpu(event_loop);
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() && self.create_window(event_loop).is_some() {
            self.try_initialize_gpu(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                info!("Escape pressed, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size.width, new_size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.handle_scale_factor_changed(scale_factor);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position);
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        debug!(frames = self.clock.frame_count(), "Event loop exiting");
    }
}

/// Creates an event loop and runs the background until the window closes.
///
/// # Errors
///
/// Returns [`EventLoopError`] if the platform event loop cannot be created
/// or terminates abnormally.
#[instrument(skip(config))]
pub fn run_with_config(config: Config) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config);
    event_loop.run_app(&mut app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_uses_config_size() {
        let state = AppState::default();
        let size = state.surface_wrapper().physical_size();
        assert_eq!((size.width, size.height), (1280, 720));
        assert_eq!(state.camera().aspect_ratio(), 1280.0 / 720.0);
        assert!(state.renderer.is_none());
    }

    #[test]
    fn test_resize_updates_camera_aspect_exactly() {
        let mut state = AppState::default();
        let event = state.handle_resize(1920, 1080).unwrap();
        assert_eq!(state.camera().aspect_ratio(), 1920.0 / 1080.0);
        assert_eq!(event.physical.width, 1920);
        let size = state.surface_wrapper().physical_size();
        assert_eq!((size.width, size.height), (1920, 1080));
    }

    #[test]
    fn test_resize_leaves_camera_position_alone() {
        let mut state = AppState::default();
        let before = state.camera().position;
        state.handle_resize(1024, 1024);
        assert_eq!(state.camera().position, before);
        assert_eq!(state.camera().aspect_ratio(), 1.0);
    }

    #[test]
    fn test_minimized_window_clamps_surface() {
        let mut state = AppState::default();
        state.handle_resize(0, 0);
        let size = state.surface_wrapper().physical_size();
        assert_eq!((size.width, size.height), (1, 1));
        assert_eq!(state.camera().aspect_ratio(), 1.0);
    }

    #[test]
    fn test_pointer_capture_is_announced_unless_click_through() {
        let mut config = Config::default();
        assert!(pointer_capture_notice(&config).is_some());
        config.window.click_through = true;
        assert_eq!(pointer_capture_notice(&config), None);
    }

    #[test]
    fn test_window_attributes_background_layer() {
        let attrs = window_attributes_from_config(&Config::default());
        assert!(attrs.transparent);
        assert!(!attrs.decorations);
        assert_eq!(attrs.window_level, WindowLevel::AlwaysOnBottom);
        assert_eq!(attrs.fullscreen, Some(Fullscreen::Borderless(None)));
        assert_eq!(attrs.title, "Starfield");
    }

    #[test]
    fn test_window_attributes_windowed() {
        let mut config = Config::default();
        config.window.fullscreen = false;
        config.window.always_on_bottom = false;
        config.window.decorations = true;
        let attrs = window_attributes_from_config(&config);
        assert!(attrs.fullscreen.is_none());
        assert_eq!(attrs.window_level, WindowLevel::Normal);
        assert!(attrs.decorations);
    }
}
