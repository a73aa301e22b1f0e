//! Almacenamiento local de assets en filesystem
//! 
//! Implementación de `AssetStorage` sobre el filesystem local. Los assets se
//! escriben bajo un directorio raíz y se sirven desde una base URL pública.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use super::asset_store::{AssetStorage, AssetStoreError, AssetStoreResult};

pub struct LocalAssetStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAssetStorage {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolver el path destino dentro de la raíz, rechazando escapes
    fn resolve(&self, destination_path: &str) -> AssetStoreResult<PathBuf> {
        let relative = Path::new(destination_path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(AssetStoreError::InvalidPath(destination_path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    async fn ensure_parent(&self, path: &Path) -> AssetStoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AssetStorage for LocalAssetStorage {
    async fn store(&self, bytes: Bytes, destination_path: &str) -> AssetStoreResult<String> {
        let path = self.resolve(destination_path)?;
        self.ensure_parent(&path).await?;
        fs::write(&path, &bytes).await?;
        Ok(format!("{}/{}", self.public_base_url, destination_path))
    }

    async fn exists(&self, destination_path: &str) -> AssetStoreResult<bool> {
        let path = self.resolve(destination_path)?;
        Ok(path.exists())
    }

    async fn delete(&self, destination_path: &str) -> AssetStoreResult<()> {
        let path = self.resolve(destination_path)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AssetStoreError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_returns_public_url() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalAssetStorage::new(
            temp_dir.path().to_path_buf(),
            "http://cdn.example.in/assets/".to_string(),
        );

        let url = storage
            .store(Bytes::from_static(b"jpegdata"), "dealers/d1/listings/l1/0.jpg")
            .await
            .unwrap();
        assert_eq!(url, "http://cdn.example.in/assets/dealers/d1/listings/l1/0.jpg");
        assert!(storage.exists("dealers/d1/listings/l1/0.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_store_overwrites_on_retry() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalAssetStorage::new(
            temp_dir.path().to_path_buf(),
            "http://cdn.example.in".to_string(),
        );

        storage.store(Bytes::from_static(b"v1"), "a/b/0.jpg").await.unwrap();
        storage.store(Bytes::from_static(b"v2"), "a/b/0.jpg").await.unwrap();

        let written = std::fs::read(temp_dir.path().join("a/b/0.jpg")).unwrap();
        assert_eq!(written, b"v2");
    }

    #[tokio::test]
    async fn test_rejects_path_escape() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalAssetStorage::new(
            temp_dir.path().to_path_buf(),
            "http://cdn.example.in".to_string(),
        );

        let result = storage.store(Bytes::from_static(b"x"), "../outside.jpg").await;
        assert!(matches!(result, Err(AssetStoreError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalAssetStorage::new(
            temp_dir.path().to_path_buf(),
            "http://cdn.example.in".to_string(),
        );

        storage.delete("a/missing.jpg").await.unwrap();
    }
}
