//! Frame Loop
//!
//! [`FrameLoop`] owns everything the viewer simulates and drives it one frame
//! at a time. It knows nothing about windows: a runner (see the `app`
//! module) or a test feeds it key transitions, viewport sizes and frame
//! ticks.
//!
//! # Per-frame order
//!
//! 1. finished loads are drained and the latest one installed
//! 2. the animation player advances the bound actor
//! 3. the motion controller steps and the actor root is moved:
//!    horizontally along its local axes, vertically to the jump height
//! 4. world matrices are refreshed
//! 5. the renderer draws and the stats overlay receives the frame timing
//!
//! ```rust,ignore
//! let mut frame_loop = FrameLoop::new(settings, loader, 16.0 / 9.0)?;
//! frame_loop.start();
//! loop {
//!     frame_loop.tick(&mut renderer, &mut fps);
//! }
//! ```

use glam::Vec3;

use crate::animation::AnimationPlayer;
use crate::assets::ActorLoader;
use crate::errors::Result;
use crate::motion::{MotionController, MotionDelta, MotionKey};
use crate::render::{FrameState, RenderSurface, StatsOverlay};
use crate::resources::ResourceRegistry;
use crate::scene::{Camera, ReleaseReport, Scene, SceneActorManager};
use crate::settings::ViewerSettings;
use crate::ui::{ControlPanel, PanelContext, PanelEvent};
use crate::utils::Timer;

pub struct FrameLoop {
    settings: ViewerSettings,
    pub scene: Scene,
    pub resources: ResourceRegistry,
    pub camera: Camera,
    actors: SceneActorManager,
    player: AnimationPlayer,
    motion: MotionController,
    loader: ActorLoader,
    panel: ControlPanel,
    clock: Timer,
    time: f32,
    frame_count: u64,
}

impl FrameLoop {
    /// Creates an empty viewer. No asset is requested until
    /// [`start`](Self::start) or [`request_asset`](Self::request_asset).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSettings`](crate::errors::Error::InvalidSettings)
    /// if `settings` fail validation.
    pub fn new(settings: ViewerSettings, loader: ActorLoader, aspect: f32) -> Result<Self> {
        settings.validate()?;

        let camera = Camera::from_settings(&settings.camera, aspect);
        let motion = MotionController::new(settings.motion);
        let panel = ControlPanel::new(settings.assets.initial.clone());

        Ok(Self {
            settings,
            scene: Scene::new(),
            resources: ResourceRegistry::new(),
            camera,
            actors: SceneActorManager::new(),
            player: AnimationPlayer::new(),
            motion,
            loader,
            panel,
            clock: Timer::new(),
            time: 0.0,
            frame_count: 0,
        })
    }

    /// Requests the configured initial asset.
    pub fn start(&mut self) -> u64 {
        let initial = self.settings.assets.initial.clone();
        self.request_asset(&initial)
    }

    #[must_use]
    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    #[must_use]
    pub fn actors(&self) -> &SceneActorManager {
        &self.actors
    }

    #[must_use]
    pub fn player(&self) -> &AnimationPlayer {
        &self.player
    }

    #[must_use]
    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    #[must_use]
    pub fn loader(&self) -> &ActorLoader {
        &self.loader
    }

    #[must_use]
    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    /// Seconds simulated so far.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Starts loading `name`. The currently shown actor stays in place until
    /// the load completes; a later request supersedes this one.
    pub fn request_asset(&mut self, name: &str) -> u64 {
        if self.settings.assets.contains(name) {
            self.panel.set_selected(name);
        }
        self.loader.request(name)
    }

    /// Picks `name` as if chosen in the asset drop-down. Returns the load
    /// generation, or `None` if the selection did not change.
    pub fn select_asset(&mut self, name: &str) -> Option<u64> {
        let event = self.panel.select(&self.settings.assets.catalog, name)?;
        Some(self.handle_panel_event(event))
    }

    /// Acts on a panel event and returns the generation of the load it
    /// started.
    pub fn handle_panel_event(&mut self, event: PanelEvent) -> u64 {
        match event {
            PanelEvent::SelectAsset(name) => {
                log::info!("Asset '{name}' selected");
                self.loader.request(name)
            }
        }
    }

    /// Installs the latest finished load, if any. Returns what the swap
    /// released. Failed loads keep the current actor.
    pub fn process_load_results(&mut self) -> Option<ReleaseReport> {
        let outcome = self.loader.poll_latest()?;
        let prefab = outcome.result.ok()?;
        Some(
            self.actors
                .replace_actor(&prefab, &mut self.scene, &self.resources, &mut self.player),
        )
    }

    /// Waits for the latest request to finish and installs it.
    pub async fn wait_for_load(&mut self) -> Option<ReleaseReport> {
        let outcome = self.loader.next_outcome().await?;
        let prefab = outcome.result.ok()?;
        Some(
            self.actors
                .replace_actor(&prefab, &mut self.scene, &self.resources, &mut self.player),
        )
    }

    // ========================================================================
    // Input
    // ========================================================================

    pub fn set_key(&mut self, key: MotionKey, pressed: bool) {
        self.motion.set_key(key, pressed);
    }

    /// Drops every held direction key, e.g. when the window loses focus.
    pub fn release_keys(&mut self) {
        self.motion.release_all();
    }

    /// Updates the camera aspect and forwards the size to the renderer.
    /// Zero-sized viewports (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32, renderer: &mut impl RenderSurface) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_viewport(width, height);
        renderer.resize(width, height);
    }

    /// Draws the debug panel into an egui pass that is already running and
    /// acts on its events.
    pub fn show_panel(&mut self, ctx: &egui::Context) {
        let state = PanelContext {
            catalog: &self.settings.assets.catalog,
            pending: self.loader.pending(),
            last_error: self.loader.last_error(),
            morph_controls: self.actors.morph_controls(),
        };
        if let Some(event) = self.panel.show(ctx, state, &mut self.scene) {
            self.handle_panel_event(event);
        }
    }

    /// Runs one complete egui pass over the debug panel. The returned output
    /// is what a UI backend paints.
    pub fn run_ui(&mut self, ctx: &egui::Context, raw_input: egui::RawInput) -> egui::FullOutput {
        ctx.begin_pass(raw_input);
        self.show_panel(ctx);
        ctx.end_pass()
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Runs one frame covering the wall-clock time since the previous one.
    /// The first frame has a zero delta.
    pub fn tick(&mut self, renderer: &mut impl RenderSurface, stats: &mut impl StatsOverlay) {
        self.clock.tick();
        self.tick_with_delta(self.clock.dt_seconds(), renderer, stats);
    }

    /// Runs one frame of `dt` seconds.
    ///
    /// Without a bound actor the player and motion steps do nothing to the
    /// scene; the frame is still rendered.
    pub fn tick_with_delta(
        &mut self,
        dt: f32,
        renderer: &mut impl RenderSurface,
        stats: &mut impl StatsOverlay,
    ) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.process_load_results();
        self.player.advance(dt, &mut self.scene);
        let delta = self.motion.step(dt);
        self.apply_motion(delta);

        self.scene.update_matrix_world();
        renderer.render(&self.scene, &self.camera, &self.resources);

        self.time += dt;
        self.frame_count += 1;
        stats.update(&FrameState {
            time: self.time,
            dt,
            frame_count: self.frame_count,
        });
    }

    fn apply_motion(&mut self, delta: MotionDelta) {
        let Some(root) = self.actors.active_root() else {
            return;
        };
        let height = self.motion.height();
        let Some(node) = self.scene.get_node_mut(root) else {
            return;
        };

        if delta.dx != 0.0 || delta.dz != 0.0 {
            node.transform
                .translate_local(Vec3::new(delta.dx, 0.0, delta.dz));
        }
        node.transform.position.y = height;
    }

    /// Releases the active actor. The viewer can keep running empty.
    pub fn shutdown(&mut self) -> ReleaseReport {
        log::info!("Shutting down after {} frames", self.frame_count);
        self.actors
            .release_active(&mut self.scene, &self.resources, &mut self.player)
    }
}

impl std::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("actor", &self.actors.active().map(|a| a.name.as_str()))
            .field("nodes", &self.scene.node_count())
            .field("loader", &self.loader)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}
