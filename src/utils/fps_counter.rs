use crate::render::{FrameState, StatsOverlay};

/// Frames-per-second meter fed with per-frame deltas.
///
/// Reports a new average once at least one second of frames accumulated.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frame_count: u32,
    accumulated: f32,
    pub current_fps: f32,
}

impl FpsCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame of `dt` seconds. Returns the new average when a
    /// one-second window completes.
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        if !dt.is_finite() || dt < 0.0 {
            return None;
        }
        self.frame_count += 1;
        self.accumulated += dt;

        if self.accumulated >= 1.0 {
            self.current_fps = self.frame_count as f32 / self.accumulated;
            self.accumulated = 0.0;
            self.frame_count = 0;
            return Some(self.current_fps);
        }

        None
    }
}

impl StatsOverlay for FpsCounter {
    fn update(&mut self, frame: &FrameState) {
        if let Some(fps) = self.tick(frame.dt) {
            log::debug!("FPS: {fps:.1} (frame {})", frame.frame_count);
        }
    }
}
