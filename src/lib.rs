//! # Marionette
//!
//! Character motion and animation-state core for an interactive viewer of
//! animated models.
//!
//! Each frame the [`FrameLoop`] advances the active actor's animation,
//! integrates held movement keys and a gravity jump into its transform, and
//! hands the scene to an external renderer. Models are loaded in the
//! background and swapped in without leaking the previous actor's
//! resources; only the most recent request is ever installed.
//!
//! ## Modules
//!
//! - [`motion`]: key state and the jump arc
//! - [`animation`]: keyframe tracks, actions and the single-clip player
//! - [`assets`]: asset resolution, glTF parsing, background loading
//! - [`scene`]: node arena, camera, active-actor swaps
//! - [`resources`]: geometry, material and texture registry
//! - [`ui`]: morph slider state and the egui control panel
//! - [`app`]: winit runner (feature `winit`)

pub mod animation;
#[cfg(feature = "winit")]
pub mod app;
pub mod assets;
pub mod errors;
pub mod frame_loop;
pub mod motion;
pub mod render;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod ui;
pub mod utils;

pub use animation::{AnimationClip, AnimationPlayer, LoopMode};
#[cfg(feature = "winit")]
pub use app::{App, KeyBindings};
pub use assets::{ActorLoader, ActorPrefab, AssetRepository, GltfParser, ModelParser};
pub use errors::{Error, Result};
pub use frame_loop::FrameLoop;
pub use motion::{JumpPhase, MotionController, MotionDelta, MotionKey};
pub use render::{FrameState, HeadlessSurface, RenderSurface, StatsOverlay};
pub use resources::ResourceRegistry;
pub use scene::{Camera, NodeHandle, ReleaseReport, Scene, SceneActorManager};
pub use settings::ViewerSettings;
pub use ui::{ControlPanel, MorphControlSet};
pub use utils::{FpsCounter, Timer};
