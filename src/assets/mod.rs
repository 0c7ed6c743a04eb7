//! Asset resolution, model parsing and background loading.

pub mod io;
pub mod loader;
pub mod loaders;
pub mod prefab;
pub mod repository;

pub use io::{AssetReader, AssetReaderVariant, FileAssetReader, MemoryAssetReader};
pub use loader::{ActorLoader, LoadOutcome};
pub use loaders::{GltfParser, ModelParser};
pub use prefab::{ActorPrefab, PrefabMaterial, PrefabMesh, PrefabNode, SharedPrefab};
pub use repository::AssetRepository;
