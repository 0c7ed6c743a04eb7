use slotmap::new_key_type;
use std::sync::Arc;

use crate::resources::geometry::Geometry;
use crate::resources::material::Material;
use crate::resources::storage::ResourceStorage;
use crate::resources::texture::Texture;

new_key_type! {
    pub struct GeometryHandle;
    pub struct MaterialHandle;
    pub struct TextureHandle;
}

/// Number of live entries per resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceCounts {
    pub geometries: usize,
    pub materials: usize,
    pub textures: usize,
}

impl ResourceCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.geometries + self.materials + self.textures
    }
}

/// Owner of every GPU-facing resource the scene references.
///
/// Cloning is cheap and shares the underlying storages.
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    pub geometries: Arc<ResourceStorage<GeometryHandle, Geometry>>,
    pub materials: Arc<ResourceStorage<MaterialHandle, Material>>,
    pub textures: Arc<ResourceStorage<TextureHandle, Texture>>,
}

impl ResourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&self, geometry: Geometry) -> GeometryHandle {
        self.geometries.add(geometry)
    }

    pub fn add_material(&self, material: Material) -> MaterialHandle {
        self.materials.add(material)
    }

    pub fn add_texture(&self, texture: Texture) -> TextureHandle {
        self.textures.add(texture)
    }

    /// Returns `false` if the geometry was already released.
    pub fn release_geometry(&self, handle: GeometryHandle) -> bool {
        self.geometries.remove(handle).is_some()
    }

    /// Returns `false` if the material was already released.
    pub fn release_material(&self, handle: MaterialHandle) -> bool {
        self.materials.remove(handle).is_some()
    }

    /// Returns `false` if the texture was already released.
    pub fn release_texture(&self, handle: TextureHandle) -> bool {
        self.textures.remove(handle).is_some()
    }

    #[must_use]
    pub fn live_counts(&self) -> ResourceCounts {
        ResourceCounts {
            geometries: self.geometries.len(),
            materials: self.materials.len(),
            textures: self.textures.len(),
        }
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("live", &self.live_counts())
            .finish()
    }
}
