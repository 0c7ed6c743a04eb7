use std::sync::Arc;

use crate::assets::io::AssetReaderVariant;
use crate::assets::loaders::{GltfParser, ModelParser};
use crate::assets::prefab::ActorPrefab;
use crate::errors::{Error, Result};
use crate::settings::AssetSettings;

/// Resolves asset names to model files and parses them into prefabs.
///
/// Names resolve to `<base_path>/<name>.<extension>` and must appear in the
/// configured catalog. Loading has no side effects: the returned prefab is
/// plain data until it is installed into a scene.
#[derive(Clone)]
pub struct AssetRepository {
    settings: AssetSettings,
    reader: AssetReaderVariant,
    parser: Arc<dyn ModelParser>,
}

impl AssetRepository {
    /// Repository reading from the file system at `settings.base_path`.
    #[must_use]
    pub fn from_settings(settings: AssetSettings) -> Self {
        let reader = AssetReaderVariant::file(&settings.base_path);
        Self::new(settings, reader)
    }

    #[must_use]
    pub fn new(settings: AssetSettings, reader: AssetReaderVariant) -> Self {
        Self {
            settings,
            reader,
            parser: Arc::new(GltfParser),
        }
    }

    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn ModelParser>) -> Self {
        self.parser = parser;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &AssetSettings {
        &self.settings
    }

    #[must_use]
    pub fn catalog(&self) -> &[String] {
        &self.settings.catalog
    }

    /// URI of `name` relative to the base path, or `AssetNotFound` if the
    /// name is not in the catalog.
    pub fn resolve(&self, name: &str) -> Result<String> {
        if !self.settings.contains(name) {
            return Err(Error::AssetNotFound(name.to_string()));
        }
        Ok(self.settings.uri_for(name))
    }

    /// Reads and parses `name`. Either the whole actor is returned or an
    /// error; nothing is partially produced.
    pub async fn load(&self, name: &str) -> Result<ActorPrefab> {
        let uri = self.resolve(name)?;
        if !self.parser.supports(&self.settings.extension) {
            return Err(Error::UnsupportedFormat(self.settings.extension.clone()));
        }

        let bytes = self.reader.read_bytes(&uri).await?;
        log::debug!("Read {} bytes for '{name}'", bytes.len());

        let parser = Arc::clone(&self.parser);
        let owned_name = name.to_string();
        tokio::task::spawn_blocking(move || parser.parse(&owned_name, &bytes)).await?
    }
}

impl std::fmt::Debug for AssetRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetRepository")
            .field("settings", &self.settings)
            .field("reader", &self.reader)
            .finish_non_exhaustive()
    }
}
