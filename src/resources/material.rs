use glam::Vec4;
use uuid::Uuid;

use crate::resources::registry::TextureHandle;

/// Surface description of a mesh. `map` is the optional base color texture.
#[derive(Debug, Clone)]
pub struct Material {
    pub uuid: Uuid,
    pub name: String,
    pub color: Vec4,
    pub metalness: f32,
    pub roughness: f32,
    pub map: Option<TextureHandle>,
    pub double_sided: bool,
}

impl Material {
    #[must_use]
    pub fn new_standard(color: Vec4) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: String::new(),
            color,
            metalness: 0.0,
            roughness: 1.0,
            map: None,
            double_sided: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_map(mut self, map: TextureHandle) -> Self {
        self.map = Some(map);
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new_standard(Vec4::ONE)
    }
}
