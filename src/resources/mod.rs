//! GPU-facing resources referenced by scene nodes.

pub mod geometry;
pub mod material;
pub mod registry;
pub mod storage;
pub mod texture;

pub use geometry::{BoundingBox, Geometry};
pub use material::Material;
pub use registry::{GeometryHandle, MaterialHandle, ResourceCounts, ResourceRegistry, TextureHandle};
pub use storage::ResourceStorage;
pub use texture::{Texture, TextureSource};
