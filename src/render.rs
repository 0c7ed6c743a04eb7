//! Interfaces to the external renderer and statistics overlay.
//!
//! The frame loop never draws anything itself. Each tick it hands the scene,
//! camera and resource registry to a [`RenderSurface`] and the frame timing to
//! a [`StatsOverlay`]. The debug panel's egui output goes to
//! [`RenderSurface::render_ui`].

use crate::resources::ResourceRegistry;
use crate::scene::{Camera, Scene};

/// Timing of the frame being produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameState {
    /// Seconds since the first frame.
    pub time: f32,
    /// Seconds since the previous frame, after clamping.
    pub dt: f32,
    pub frame_count: u64,
}

/// Something that can draw the scene.
pub trait RenderSurface {
    /// Draws one frame. World matrices are up to date when this is called.
    fn render(&mut self, scene: &Scene, camera: &Camera, resources: &ResourceRegistry);

    /// Viewport size changed.
    #[allow(unused_variables)]
    fn resize(&mut self, width: u32, height: u32) {}

    /// Paints the debug panel produced by an egui pass. Surfaces without a
    /// UI backend ignore it.
    #[allow(unused_variables)]
    fn render_ui(&mut self, ctx: &egui::Context, output: egui::FullOutput) {}
}

/// Receives per-frame timing, e.g. an FPS meter.
pub trait StatsOverlay {
    fn update(&mut self, frame: &FrameState);
}

/// Renderer that draws nothing, for headless hosts and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessSurface;

impl RenderSurface for HeadlessSurface {
    fn render(&mut self, _scene: &Scene, _camera: &Camera, _resources: &ResourceRegistry) {}
}
