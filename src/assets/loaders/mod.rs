pub mod gltf;

pub use self::gltf::GltfParser;

use crate::assets::prefab::ActorPrefab;
use crate::errors::Result;

/// Turns the bytes of a model file into an [`ActorPrefab`].
///
/// Parsing must be all-or-nothing: either a complete prefab or an error.
pub trait ModelParser: Send + Sync {
    /// Lower-case file extensions this parser accepts, without the dot.
    fn extensions(&self) -> &[&str];

    fn parse(&self, name: &str, bytes: &[u8]) -> Result<ActorPrefab>;

    fn supports(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}
