//! Animation Player
//!
//! Owns the single mixer bound to the active actor. The player is rebuilt on
//! every actor swap and never outlives the actor it was bound to.
//!
//! | State | `advance(dt)` |
//! |-------|---------------|
//! | unbound | no-op |
//! | bound, no clips (inert) | no-op |
//! | bound, playing | advances clip 0 and writes the pose |

use std::sync::Arc;

use crate::animation::action::{AnimationAction, LoopMode};
use crate::animation::binder::Binder;
use crate::animation::clip::AnimationClip;
use crate::animation::mixer::AnimationMixer;
use crate::scene::{NodeHandle, Scene};

#[derive(Debug)]
struct Binding {
    root: NodeHandle,
    mixer: Option<AnimationMixer>,
}

#[derive(Debug, Default)]
pub struct AnimationPlayer {
    binding: Option<Binding>,
}

impl AnimationPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self { binding: None }
    }

    /// Discards any previous binding and binds to the actor rooted at `root`.
    ///
    /// With at least one clip, clip 0 starts playing in a loop from time 0.
    /// With none, the player stays bound but inert.
    pub fn bind(&mut self, scene: &Scene, root: NodeHandle, clips: &[Arc<AnimationClip>]) {
        let mixer = clips.first().map(|clip| {
            let bindings = Binder::bind(scene, root, clip);
            log::info!(
                "Playing clip '{}' ({:.2}s, {}/{} tracks bound)",
                clip.name,
                clip.duration,
                bindings.len(),
                clip.tracks.len()
            );
            let mut action = AnimationAction::new(Arc::clone(clip)).with_bindings(bindings);
            action.loop_mode = LoopMode::Loop;
            let mut mixer = AnimationMixer::new();
            mixer.add_action(action);
            mixer
        });

        if mixer.is_none() {
            log::info!("Actor has no animation clips; player is inert");
        }

        self.binding = Some(Binding { root, mixer });
    }

    /// Drops the binding. Subsequent `advance` calls are no-ops.
    pub fn unbind(&mut self) {
        self.binding = None;
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Bound to an actor that has no clip to play.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.binding.as_ref().is_some_and(|b| b.mixer.is_none())
    }

    #[must_use]
    pub fn bound_root(&self) -> Option<NodeHandle> {
        self.binding.as_ref().map(|b| b.root)
    }

    /// The action currently playing, if any.
    #[must_use]
    pub fn current_action(&self) -> Option<&AnimationAction> {
        self.mixer().and_then(|m| m.actions().first())
    }

    pub fn current_action_mut(&mut self) -> Option<&mut AnimationAction> {
        self.binding
            .as_mut()
            .and_then(|b| b.mixer.as_mut())
            .and_then(|m| m.action_mut(0))
    }

    #[must_use]
    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.binding.as_ref().and_then(|b| b.mixer.as_ref())
    }

    /// Advances playback by `dt` seconds and applies the pose.
    ///
    /// Zero, negative and non-finite deltas are ignored.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        if let Some(mixer) = self.binding.as_mut().and_then(|b| b.mixer.as_mut()) {
            mixer.update(dt, scene);
        }
    }
}
