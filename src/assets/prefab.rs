use std::sync::Arc;

use glam::Vec4;

use crate::animation::clip::AnimationClip;
use crate::resources::{Geometry, Texture};
use crate::scene::transform::Transform;

/// Mesh attached to a prefab node. Indices point into the prefab's
/// resource tables.
#[derive(Debug, Clone, Default)]
pub struct PrefabMesh {
    pub geometry: usize,
    pub material: Option<usize>,
    pub morph_target_names: Vec<String>,
    pub morph_weights: Vec<f32>,
}

/// Prefab node: plain data with children referenced by index.
#[derive(Debug, Clone, Default)]
pub struct PrefabNode {
    pub name: Option<String>,
    pub transform: Transform,
    /// Indices into `ActorPrefab::nodes`.
    pub children_indices: Vec<usize>,
    pub mesh: Option<PrefabMesh>,
}

/// Material description with its base color map given as a texture index.
#[derive(Debug, Clone)]
pub struct PrefabMaterial {
    pub name: String,
    pub color: Vec4,
    pub metalness: f32,
    pub roughness: f32,
    pub map: Option<usize>,
    pub double_sided: bool,
}

impl Default for PrefabMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: Vec4::ONE,
            metalness: 1.0,
            roughness: 1.0,
            map: None,
            double_sided: false,
        }
    }
}

/// A fully parsed actor that has not been installed yet.
///
/// Prefabs are CPU-side data only: they hold no node handles and no
/// registry handles, so a parsed prefab can be dropped without side
/// effects. [`Scene::instantiate`](crate::scene::Scene::instantiate) turns
/// one into live nodes and resources.
#[derive(Debug, Clone, Default)]
pub struct ActorPrefab {
    /// Asset name the prefab was loaded from.
    pub name: String,
    pub nodes: Vec<PrefabNode>,
    pub root_indices: Vec<usize>,
    pub geometries: Vec<Geometry>,
    pub materials: Vec<PrefabMaterial>,
    pub textures: Vec<Texture>,
    pub animations: Vec<Arc<AnimationClip>>,
}

impl ActorPrefab {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// No renderable nodes. Such a prefab still installs as an empty actor.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mesh_count() == 0
    }

    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.mesh.is_some()).count()
    }

    /// Appends a node and returns its index.
    pub fn push_node(&mut self, node: PrefabNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

/// Thread-safe prefab reference.
pub type SharedPrefab = Arc<ActorPrefab>;
