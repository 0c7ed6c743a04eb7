//! Walks and jumps the configured character with W/A/S/D and Space.
//!
//! Models are read from `models/<name>.glb`. Pass a JSON settings file as
//! the first argument to override the defaults.

use marionette::{
    App, Camera, FpsCounter, RenderSurface, ResourceRegistry, Scene, ViewerSettings,
};

/// Stand-in renderer that logs the scene once in a while.
#[derive(Default)]
struct LogRenderer {
    frames: u64,
}

impl RenderSurface for LogRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera, resources: &ResourceRegistry) {
        self.frames += 1;
        if self.frames % 300 == 1 {
            let counts = resources.live_counts();
            log::info!(
                "frame {}: {} nodes, {} live resources, camera at {:?}",
                self.frames,
                scene.node_count(),
                counts.total(),
                camera.position
            );
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        log::info!("Viewport {width}x{height}");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => ViewerSettings::load(path)?,
        None => ViewerSettings::default(),
    };

    App::new(settings).run(LogRenderer::default(), FpsCounter::new())?;
    Ok(())
}
