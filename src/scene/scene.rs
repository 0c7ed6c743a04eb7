use glam::{Affine3A, Vec3};
use slotmap::SlotMap;

use crate::assets::prefab::ActorPrefab;
use crate::resources::{GeometryHandle, MaterialHandle, Material, ResourceRegistry, TextureHandle};
use crate::scene::NodeHandle;
use crate::scene::node::{MeshComponent, MorphTargets, Node};

/// Arena-backed scene graph.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Adds a node at the top level.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node as the last child of `parent`. Falls back to the top level
    /// when `parent` does not exist.
    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent) {
            log::warn!("add_to_parent: parent {parent:?} missing, adding at top level");
            return self.add_node(child);
        }
        child.parent = Some(parent);
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        handle
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let Some(node) = self.nodes.get(handle) else {
            return;
        };

        match node.parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.children.retain(|&c| c != handle);
                }
            }
            None => self.root_nodes.retain(|&r| r != handle),
        }

        for descendant in self.descendants(handle) {
            self.nodes.remove(descendant);
        }
    }

    /// Re-parents `child` under `parent`, detaching it from its old parent.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself");
            return;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::error!("attach: node not found");
            return;
        }
        if self.descendants(child).contains(&parent) {
            log::warn!("Cannot attach a node below its own descendant");
            return;
        }

        match self.nodes[child].parent {
            Some(old) => {
                if let Some(p) = self.nodes.get_mut(old) {
                    p.children.retain(|&c| c != child);
                }
            }
            None => self.root_nodes.retain(|&r| r != child),
        }

        self.nodes[parent].children.push(child);
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.transform.mark_dirty();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.nodes.iter()
    }

    /// `root` and everything below it, parents before children.
    /// Empty if `root` does not exist.
    #[must_use]
    pub fn descendants(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Visits `root` and its subtree, parents before children.
    pub fn traverse(&self, root: NodeHandle, mut visit: impl FnMut(NodeHandle, &Node)) {
        for handle in self.descendants(root) {
            if let Some(node) = self.nodes.get(handle) {
                visit(handle, node);
            }
        }
    }

    /// First node named `name` in the `root` subtree, depth first.
    #[must_use]
    pub fn find_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.descendants(root)
            .into_iter()
            .find(|&h| self.nodes.get(h).is_some_and(|n| n.name == name))
    }

    // ========================================================================
    // Matrices
    // ========================================================================

    /// Recomputes world matrices for the whole graph.
    pub fn update_matrix_world(&mut self) {
        let mut stack: Vec<(NodeHandle, Affine3A, bool)> = self
            .root_nodes
            .iter()
            .rev()
            .map(|&r| (r, Affine3A::IDENTITY, false))
            .collect();

        while let Some((handle, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            let changed = node.transform.update_local_matrix() || parent_changed;
            if changed {
                let world = parent_world * node.transform.local_matrix;
                node.transform.set_world_matrix(world);
            }
            let world = node.transform.world_matrix;
            stack.extend(node.children.iter().rev().map(|&c| (c, world, changed)));
        }
    }

    /// World-space position of a node from the last matrix update.
    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.nodes
            .get(handle)
            .map(|n| Vec3::from(n.transform.world_matrix.translation))
    }

    // ========================================================================
    // Prefab instantiation
    // ========================================================================

    /// Installs `prefab` as a new top-level subtree and returns its root.
    ///
    /// Resources are registered on first use by a node, so every handle
    /// allocated here is reachable by walking the returned subtree.
    pub fn instantiate(&mut self, prefab: &ActorPrefab, resources: &ResourceRegistry) -> NodeHandle {
        let root = self.add_node(Node::new(prefab.name.clone()));
        let mut installer = ResourceInstaller::new(prefab, resources);
        let mut visited = vec![false; prefab.nodes.len()];

        let mut stack: Vec<(usize, NodeHandle)> = prefab
            .root_indices
            .iter()
            .rev()
            .map(|&i| (i, root))
            .collect();

        while let Some((index, parent)) = stack.pop() {
            let Some(source) = prefab.nodes.get(index) else {
                log::warn!("Prefab '{}': node index {index} out of range", prefab.name);
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                log::warn!("Prefab '{}': node {index} referenced twice", prefab.name);
                continue;
            }

            let mut node = Node::new(source.name.clone().unwrap_or_default())
                .with_transform(source.transform.clone());
            if let Some(mesh) = &source.mesh {
                match installer.geometry(mesh.geometry) {
                    Some(geometry) => {
                        node = node.with_mesh(MeshComponent {
                            geometry,
                            material: mesh.material.and_then(|m| installer.material(m)),
                            morph: MorphTargets::new(
                                mesh.morph_target_names.clone(),
                                &mesh.morph_weights,
                            ),
                        });
                    }
                    None => log::warn!(
                        "Prefab '{}': geometry {} missing, node kept as group",
                        prefab.name,
                        mesh.geometry
                    ),
                }
            }

            let handle = self.add_to_parent(node, parent);
            stack.extend(source.children_indices.iter().rev().map(|&c| (c, handle)));
        }

        root
    }
}

/// Registers prefab resources lazily, once per prefab index.
struct ResourceInstaller<'a> {
    prefab: &'a ActorPrefab,
    resources: &'a ResourceRegistry,
    geometries: Vec<Option<GeometryHandle>>,
    materials: Vec<Option<MaterialHandle>>,
    textures: Vec<Option<TextureHandle>>,
}

impl<'a> ResourceInstaller<'a> {
    fn new(prefab: &'a ActorPrefab, resources: &'a ResourceRegistry) -> Self {
        Self {
            prefab,
            resources,
            geometries: vec![None; prefab.geometries.len()],
            materials: vec![None; prefab.materials.len()],
            textures: vec![None; prefab.textures.len()],
        }
    }

    fn geometry(&mut self, index: usize) -> Option<GeometryHandle> {
        let slot = self.geometries.get_mut(index)?;
        if slot.is_none() {
            *slot = Some(self.resources.add_geometry(self.prefab.geometries[index].clone()));
        }
        *slot
    }

    fn texture(&mut self, index: usize) -> Option<TextureHandle> {
        let slot = self.textures.get_mut(index)?;
        if slot.is_none() {
            *slot = Some(self.resources.add_texture(self.prefab.textures[index].clone()));
        }
        *slot
    }

    fn material(&mut self, index: usize) -> Option<MaterialHandle> {
        if let Some(existing) = *self.materials.get(index)? {
            return Some(existing);
        }
        let prefab = self.prefab;
        let source = &prefab.materials[index];
        let mut material = Material::new_standard(source.color).with_name(source.name.clone());
        material.metalness = source.metalness;
        material.roughness = source.roughness;
        material.double_sided = source.double_sided;
        material.map = source.map.and_then(|t| self.texture(t));

        let handle = self.resources.add_material(material);
        self.materials[index] = Some(handle);
        Some(handle)
    }
}
