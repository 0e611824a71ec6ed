use crate::error::{Result, StoreError};
use crate::models::CityDocument;
use crate::storage::traits::DocumentRepository;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Repository backed by a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with an empty document if it does not exist yet.
    /// Returns `true` when a new file was written.
    pub async fn ensure_exists(&self) -> Result<bool> {
        if tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| StoreError::storage("checking city document", e))?
        {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::storage("creating data directory", e))?;
        }

        self.save(&CityDocument::default()).await?;
        info!("Created empty city document at {}", self.path.display());
        Ok(true)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl DocumentRepository for JsonFileRepository {
    async fn load(&self) -> Result<CityDocument> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::storage("reading city document", e))?;

        debug!("Read {} bytes from {}", raw.len(), self.path.display());

        serde_json::from_str(&raw).map_err(|e| StoreError::storage("parsing city document", e))
    }

    async fn save(&self, document: &CityDocument) -> Result<()> {
        let raw = serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::storage("serializing city document", e))?;

        // Write next to the target and rename so readers never see a half-written file
        let temp = self.temp_path();
        tokio::fs::write(&temp, raw)
            .await
            .map_err(|e| StoreError::storage("writing city document", e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StoreError::storage("replacing city document", e))?;

        debug!("Saved {} cities to {}", document.cities.len(), self.path.display());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "json-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::City;
    use serde_json::Map;

    fn city(id: &str) -> City {
        City {
            id: id.to_string(),
            ciudad: id.to_string(),
            pais: None,
            moneda: "COP".to_string(),
            ultima_actualizacion_aproximada: "2024-12".to_string(),
            nota_importante: None,
            temporadas: None,
            servicios_informales: vec![],
            extra: Map::new(),
        }
    }

    #[tokio::test]
    async fn ensure_exists_creates_an_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested").join("cities.json"));

        assert!(repo.ensure_exists().await.unwrap());
        assert!(!repo.ensure_exists().await.unwrap());
        assert!(repo.load().await.unwrap().cities.is_empty());
    }

    #[tokio::test]
    async fn save_replaces_the_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("cities.json"));

        let first = CityDocument {
            cities: vec![city("cartagena"), city("lima")],
        };
        repo.save(&first).await.unwrap();

        let second = CityDocument {
            cities: vec![city("quito")],
        };
        repo.save(&second).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), second);
        assert!(!repo.temp_path().exists());
    }

    #[tokio::test]
    async fn document_is_pretty_printed_under_a_cities_key() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("cities.json"));
        repo.save(&CityDocument {
            cities: vec![city("lima")],
        })
        .await
        .unwrap();

        let raw = std::fs::read_to_string(repo.path()).unwrap();
        assert!(raw.starts_with("{\n  \"cities\": [\n"));
    }

    #[tokio::test]
    async fn missing_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("absent.json"));

        let err = repo.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Storage { .. }));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cities.json");
        std::fs::write(&path, "{ \"cities\": [").unwrap();

        let err = JsonFileRepository::new(path).load().await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Storage {
                action: "parsing city document",
                ..
            }
        ));
    }
}
