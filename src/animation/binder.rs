use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves every track of `clip` to a node below `root`.
    ///
    /// `root` itself never matches: it is the actor's placement node and is
    /// driven by motion, not by clips. Tracks naming nodes that do not exist
    /// are skipped.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());
        let candidates: Vec<NodeHandle> = scene.descendants(root).into_iter().skip(1).collect();
        let find = |name: &str| {
            candidates
                .iter()
                .copied()
                .find(|&h| scene.get_node(h).is_some_and(|n| n.name == name))
        };

        for (track_index, track) in clip.tracks.iter().enumerate() {
            match find(&track.meta.node_name) {
                Some(node) => bindings.push(PropertyBinding {
                    track_index,
                    node,
                    target: track.meta.target,
                }),
                None => log::debug!(
                    "Clip '{}': no node named '{}', track {track_index} left unbound",
                    clip.name,
                    track.meta.node_name
                ),
            }
        }

        bindings
    }
}
