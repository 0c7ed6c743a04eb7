//! Winit Application Runner
//!
//! Hosts a [`FrameLoop`] inside a winit event loop:
//!
//! - key presses and releases go through [`KeyBindings`] to the motion
//!   controller (auto-repeat is dropped)
//! - focus loss releases every held key
//! - resizes update the camera and the renderer
//! - each redraw runs one frame, then an egui pass over the control panel
//!   whose output goes to [`RenderSurface::render_ui`]
//! - window events reach egui first; keys it consumes (e.g. while a
//!   widget has focus) never move the actor
//!
//! ```rust,ignore
//! App::new(ViewerSettings::default())
//!     .run(MyRenderer::default(), FpsCounter::new())?;
//! ```

pub mod input;

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

pub use self::input::KeyBindings;

use crate::assets::{ActorLoader, AssetRepository};
use crate::errors::{Error, Result};
use crate::frame_loop::FrameLoop;
use crate::render::{RenderSurface, StatsOverlay};
use crate::settings::ViewerSettings;

const DEFAULT_WIDTH: f64 = 1280.0;
const DEFAULT_HEIGHT: f64 = 720.0;

/// Application builder.
pub struct App {
    settings: ViewerSettings,
    repository: Option<AssetRepository>,
    bindings: KeyBindings,
}

impl App {
    #[must_use]
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            settings,
            repository: None,
            bindings: KeyBindings::default(),
        }
    }

    /// Uses `repository` instead of one reading from the file system.
    #[must_use]
    pub fn with_repository(mut self, repository: AssetRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    #[must_use]
    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Opens the window and runs until it is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid, the asset runtime cannot
    /// start, or the event loop fails.
    pub fn run<R, S>(self, renderer: R, stats: S) -> Result<()>
    where
        R: RenderSurface + 'static,
        S: StatsOverlay + 'static,
    {
        let repository = self
            .repository
            .unwrap_or_else(|| AssetRepository::from_settings(self.settings.assets.clone()));
        let loader = ActorLoader::with_shared_runtime(Arc::new(repository))?;
        let aspect = (DEFAULT_WIDTH / DEFAULT_HEIGHT) as f32;
        let title = self.settings.title.clone();
        let frame_loop = FrameLoop::new(self.settings, loader, aspect)?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = AppRunner {
            title,
            bindings: self.bindings,
            frame_loop,
            renderer,
            stats,
            window: None,
            egui_ctx: egui::Context::default(),
            egui_state: None,
            error: None,
        };
        event_loop.run_app(&mut runner)?;

        match runner.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct AppRunner<R, S> {
    title: String,
    bindings: KeyBindings,
    frame_loop: FrameLoop,
    renderer: R,
    stats: S,
    window: Option<Arc<Window>>,
    egui_ctx: egui::Context,
    egui_state: Option<egui_winit::State>,
    error: Option<Error>,
}

impl<R: RenderSurface, S: StatsOverlay> AppRunner<R, S> {
    /// Runs the control panel for this frame and hands its output to the
    /// renderer. Asset selections made here start loads.
    fn draw_ui(&mut self) {
        let (Some(window), Some(state)) = (&self.window, &mut self.egui_state) else {
            return;
        };
        let raw_input = state.take_egui_input(window);
        let mut output = self.frame_loop.run_ui(&self.egui_ctx, raw_input);
        state.handle_platform_output(window, std::mem::take(&mut output.platform_output));
        self.renderer.render_ui(&self.egui_ctx, output);
    }
}

impl<R: RenderSurface, S: StatsOverlay> ApplicationHandler for AppRunner<R, S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(DEFAULT_WIDTH, DEFAULT_HEIGHT));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                self.error = Some(Error::Runtime(e.to_string()));
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.frame_loop
            .resize(size.width, size.height, &mut self.renderer);
        self.egui_state = Some(egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &*window,
            Some(window.scale_factor() as f32),
            None,
            None,
        ));
        self.window = Some(window);

        self.frame_loop.start();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&self.window, &mut self.egui_state) {
            (Some(window), Some(state)) => state.on_window_event(window, &event).consumed,
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                self.frame_loop.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.frame_loop
                    .resize(size.width, size.height, &mut self.renderer);
            }
            WindowEvent::Focused(false) => {
                self.frame_loop.release_keys();
            }
            WindowEvent::KeyboardInput { event, .. } if !consumed => {
                if let Some((key, pressed)) = self.bindings.translate_event(&event) {
                    self.frame_loop.set_key(key, pressed);
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame_loop.tick(&mut self.renderer, &mut self.stats);
                self.draw_ui();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
