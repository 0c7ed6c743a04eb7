//! Active Actor Management
//!
//! [`SceneActorManager`] owns the one animated model currently shown and
//! performs the swap sequence when a new one arrives:
//!
//! 1. release every geometry, material and material map of the old actor
//! 2. remove the old actor's nodes from the scene
//! 3. instantiate the new prefab
//! 4. rebind the animation player
//! 5. rebuild the morph controls from scratch
//! 6. enable shadows on every mesh of the new actor

use std::sync::Arc;

use crate::animation::{AnimationClip, AnimationPlayer};
use crate::assets::prefab::ActorPrefab;
use crate::resources::ResourceRegistry;
use crate::scene::node::ShadowFlags;
use crate::scene::{NodeHandle, Scene};
use crate::ui::morph_controls::{MorphControlSet, MorphSlider};

/// The currently displayed model.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Asset name the actor was loaded from.
    pub name: String,
    pub root: NodeHandle,
    pub clips: Vec<Arc<AnimationClip>>,
}

/// What a release pass freed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseReport {
    pub nodes: usize,
    pub geometries: usize,
    pub materials: usize,
    pub textures: usize,
}

#[derive(Debug, Default)]
pub struct SceneActorManager {
    active: Option<Actor>,
    morph_controls: MorphControlSet,
}

impl SceneActorManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> Option<&Actor> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn active_root(&self) -> Option<NodeHandle> {
        self.active.as_ref().map(|a| a.root)
    }

    #[must_use]
    pub fn morph_controls(&self) -> &MorphControlSet {
        &self.morph_controls
    }

    /// Swaps the active actor for a fresh instance of `prefab`.
    ///
    /// An empty prefab is installed as an actor with no meshes. Returns what
    /// was released from the previous actor.
    pub fn replace_actor(
        &mut self,
        prefab: &ActorPrefab,
        scene: &mut Scene,
        resources: &ResourceRegistry,
        player: &mut AnimationPlayer,
    ) -> ReleaseReport {
        let report = self.release_active(scene, resources, player);

        let root = scene.instantiate(prefab, resources);
        player.bind(scene, root, &prefab.animations);
        self.rebuild_morph_controls(scene, root);
        Self::enable_shadows(scene, root);

        log::info!(
            "Installed actor '{}' ({} nodes, {} clips, {} morph sliders)",
            prefab.name,
            scene.descendants(root).len(),
            prefab.animations.len(),
            self.morph_controls.slider_count()
        );

        self.active = Some(Actor {
            name: prefab.name.clone(),
            root,
            clips: prefab.animations.clone(),
        });

        report
    }

    /// Releases the active actor's resources, removes it from the scene and
    /// unbinds the player. A no-op without an active actor.
    pub fn release_active(
        &mut self,
        scene: &mut Scene,
        resources: &ResourceRegistry,
        player: &mut AnimationPlayer,
    ) -> ReleaseReport {
        let Some(actor) = self.active.take() else {
            return ReleaseReport::default();
        };

        player.unbind();
        let report = Self::release_resources(scene, resources, actor.root);
        scene.remove_node(actor.root);
        self.morph_controls.destroy_all();
        self.morph_controls.hide();

        log::info!(
            "Released actor '{}': {} nodes, {} geometries, {} materials, {} textures",
            actor.name,
            report.nodes,
            report.geometries,
            report.materials,
            report.textures
        );
        report
    }

    /// Frees every resource referenced below `root`. Handles that are
    /// already gone (shared between meshes) are skipped.
    fn release_resources(
        scene: &Scene,
        resources: &ResourceRegistry,
        root: NodeHandle,
    ) -> ReleaseReport {
        let mut report = ReleaseReport::default();

        scene.traverse(root, |_, node| {
            report.nodes += 1;
            let Some(mesh) = node.mesh() else {
                return;
            };

            if resources.release_geometry(mesh.geometry) {
                report.geometries += 1;
            }

            if let Some(material_handle) = mesh.material {
                let map = resources.materials.get(material_handle).and_then(|m| m.map);
                if let Some(texture) = map
                    && resources.release_texture(texture)
                {
                    report.textures += 1;
                }
                if resources.release_material(material_handle) {
                    report.materials += 1;
                }
            }
        });

        report
    }

    fn rebuild_morph_controls(&mut self, scene: &Scene, root: NodeHandle) {
        self.morph_controls.destroy_all();
        self.morph_controls.hide();

        scene.traverse(root, |handle, node| {
            let Some(morph) = node.morph_targets() else {
                return;
            };
            let folder = self.morph_controls.add_folder(node.display_name(), handle);
            for (channel, name) in morph.names().iter().enumerate() {
                self.morph_controls
                    .add_control(folder, MorphSlider::new(handle, channel, name.clone()));
            }
            self.morph_controls.show();
        });
    }

    fn enable_shadows(scene: &mut Scene, root: NodeHandle) {
        for handle in scene.descendants(root) {
            if let Some(node) = scene.get_node_mut(handle)
                && node.is_mesh()
            {
                node.shadows = ShadowFlags::CAST | ShadowFlags::RECEIVE;
            }
        }
    }
}
