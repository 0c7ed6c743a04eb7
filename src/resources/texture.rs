use uuid::Uuid;

/// Where a texture's encoded image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
    /// Encoded image embedded in the model file.
    Embedded { mime_type: String, bytes: Vec<u8> },
    /// Image referenced by a path relative to the model.
    External(String),
}

/// An image referenced by a material. Decoding is left to the renderer.
#[derive(Debug, Clone)]
pub struct Texture {
    pub uuid: Uuid,
    pub name: String,
    pub source: TextureSource,
}

impl Texture {
    #[must_use]
    pub fn new(name: impl Into<String>, source: TextureSource) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            source,
        }
    }
}
