use bitflags::bitflags;
use glam::Affine3A;
use uuid::Uuid;

use crate::animation::values::MorphWeightData;
use crate::resources::{GeometryHandle, MaterialHandle};
use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

bitflags! {
    /// Shadow participation of a mesh node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShadowFlags: u8 {
        const CAST = 1 << 0;
        const RECEIVE = 1 << 1;
    }
}

/// Named morph channels of a mesh and their current influences.
///
/// Influences always stay in `[0, 1]` and have one entry per name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MorphTargets {
    names: Vec<String>,
    influences: Vec<f32>,
}

impl MorphTargets {
    #[must_use]
    pub fn new(names: Vec<String>, initial: &[f32]) -> Self {
        let influences = (0..names.len())
            .map(|i| initial.get(i).copied().unwrap_or(0.0).clamp(0.0, 1.0))
            .collect();
        Self { names, influences }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn influences(&self) -> &[f32] {
        &self.influences
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Sets one influence, clamped to `[0, 1]`. Returns `false` for an
    /// unknown channel.
    pub fn set(&mut self, channel: usize, value: f32) -> bool {
        match self.influences.get_mut(channel) {
            Some(slot) => {
                *slot = value.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    /// Copies the leading weights of an animation sample.
    pub fn apply(&mut self, weights: &MorphWeightData) {
        for (slot, &w) in self.influences.iter_mut().zip(weights.weights.iter()) {
            *slot = w.clamp(0.0, 1.0);
        }
    }
}

/// Renderable part of a mesh node, resolved when the actor is installed.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshComponent {
    pub geometry: GeometryHandle,
    pub material: Option<MaterialHandle>,
    pub morph: MorphTargets,
}

/// What a node is, decided once at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NodeKind {
    #[default]
    Group,
    Mesh(MeshComponent),
}

/// A scene graph node.
///
/// Nodes form a tree through `parent` and `children`; use
/// [`Scene::attach`](crate::scene::Scene::attach) to keep both sides in sync.
#[derive(Debug, Clone)]
pub struct Node {
    pub uuid: Uuid,
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
    pub visible: bool,
    pub kind: NodeKind,
    pub shadows: ShadowFlags,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            kind: NodeKind::Group,
            shadows: ShadowFlags::empty(),
        }
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.kind = NodeKind::Mesh(mesh);
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }

    /// The node name, or its UUID when unnamed.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            self.uuid.to_string()
        } else {
            self.name.clone()
        }
    }

    #[must_use]
    pub fn mesh(&self) -> Option<&MeshComponent> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            NodeKind::Group => None,
        }
    }

    pub fn mesh_mut(&mut self) -> Option<&mut MeshComponent> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            NodeKind::Group => None,
        }
    }

    #[must_use]
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_))
    }

    #[must_use]
    pub fn morph_targets(&self) -> Option<&MorphTargets> {
        self.mesh().map(|m| &m.morph).filter(|m| !m.is_empty())
    }

    /// Writes sampled morph weights. Group nodes ignore the call.
    pub fn set_morph_weights(&mut self, weights: &MorphWeightData) {
        if let Some(mesh) = self.mesh_mut() {
            mesh.morph.apply(weights);
        }
    }

    /// Sets one morph influence. Returns `false` if the node has no such channel.
    pub fn set_morph_influence(&mut self, channel: usize, value: f32) -> bool {
        self.mesh_mut().is_some_and(|m| m.morph.set(channel, value))
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
