pub mod sizing;
pub mod loader;

use fauxar_config::ModelsConfig;
use fauxar_scene::bounds::Aabb;
use std::collections::BTreeMap;
use thiserror::Error;

pub use loader::{AssetLoader, FileLoader};
#[cfg(feature = "http")]
pub use loader::HttpLoader;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Unknown model '{0}'")]
    UnknownModel(String),
    #[error("Failed to read asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to fetch asset: {0}")]
    Fetch(String),
    #[error("Asset is not valid glTF: {0}")]
    Gltf(#[from] ::gltf::Error),
    #[error("Invalid glTF: {0}")]
    InvalidGltf(String),
    #[error("Asset has no mesh geometry")]
    NoGeometry,
}

/// A fetched asset reduced to what placement needs.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub name: String,
    pub url: String,
    /// Bounds in asset space, before normalization.
    pub bounds: Aabb,
}

/// Fixed name -> URL table of selectable models.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    entries: BTreeMap<String, String>,
    default_model: String,
}

impl ModelCatalog {
    pub fn from_config(config: &ModelsConfig) -> Self {
        Self {
            entries: config.catalog.clone(),
            default_model: config.default_model.clone(),
        }
    }

    pub fn url(&self, name: &str) -> Result<&str, AssetError> {
        self.entries
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AssetError::UnknownModel(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

/// Resolves catalog names and drives a loader.
pub struct AssetManager {
    catalog: ModelCatalog,
    loader: Box<dyn AssetLoader>,
}

impl AssetManager {
    pub fn new(catalog: ModelCatalog, loader: Box<dyn AssetLoader>) -> Self {
        Self { catalog, loader }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub async fn load(&self, name: &str) -> Result<LoadedAsset, AssetError> {
        let url = self.catalog.url(name)?;
        tracing::info!(name, url, "Loading model");
        let bytes = self.loader.fetch(url).await?;
        let bounds = sizing::bounds_from_bytes(&bytes)?;
        tracing::info!(name, size = ?bounds.size(), "Model loaded");
        Ok(LoadedAsset {
            name: name.to_string(),
            url: url.to_string(),
            bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_rejected() {
        let catalog = ModelCatalog::from_config(&ModelsConfig::default());
        assert!(catalog.url("Duck").is_ok());
        assert!(matches!(catalog.url("Teapot"), Err(AssetError::UnknownModel(n)) if n == "Teapot"));
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["BoomBox", "Duck", "Helmet"]);
    }

    #[tokio::test]
    async fn manager_loads_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.gltf");
        std::fs::write(
            &path,
            r#"{"asset":{"version":"2.0"},"nodes":[{"mesh":0}],
                "meshes":[{"primitives":[{"attributes":{"POSITION":0}}]}],
                "accessors":[{"componentType":5126,"count":8,"type":"VEC3",
                              "min":[-1,-1,-1],"max":[1,1,1]}]}"#,
        )
        .unwrap();

        let mut config = ModelsConfig::default();
        config
            .catalog
            .insert("Cube".into(), path.to_string_lossy().into_owned());
        let manager = AssetManager::new(ModelCatalog::from_config(&config), Box::new(FileLoader));

        let asset = manager.load("Cube").await.unwrap();
        assert_eq!(asset.bounds.size(), glam::Vec3::splat(2.0));

        assert!(matches!(
            manager.load("Nope").await,
            Err(AssetError::UnknownModel(_))
        ));
    }
}
