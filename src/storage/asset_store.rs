//! Contrato del almacenamiento de assets
//! 
//! Este módulo define la capability de almacenamiento duradero de imágenes.
//! El contrato es estrecho a propósito: `store(bytes, destination_path)`
//! devuelve la URL pública desde la que el asset queda accesible. Los paths
//! se namespacian por dealer y por listing, y son deterministas respecto al
//! id del listing, de modo que un reintento sobrescribe en vez de duplicar.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errores del asset store
#[derive(Debug, Error)]
pub enum AssetStoreError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid destination path: {0}")]
    InvalidPath(String),
    #[error("storage error: {0}")]
    Other(String),
}

pub type AssetStoreResult<T> = Result<T, AssetStoreError>;

/// Almacenamiento de assets pluggable
#[async_trait]
pub trait AssetStorage: Send + Sync {
    /// Almacenar un asset en el path destino y devolver su URL pública
    async fn store(&self, bytes: Bytes, destination_path: &str) -> AssetStoreResult<String>;

    /// Verificar si un asset existe
    async fn exists(&self, destination_path: &str) -> AssetStoreResult<bool>;

    /// Eliminar un asset (idempotente: no falla si no existe)
    async fn delete(&self, destination_path: &str) -> AssetStoreResult<()>;
}

/// Path determinista de una imagen de listing dentro del store.
/// `index` 0 es la imagen primaria; las adicionales siguen en orden.
pub fn listing_image_path(
    dealer_id: uuid::Uuid,
    listing_id: uuid::Uuid,
    index: usize,
    extension: &str,
) -> String {
    format!(
        "dealers/{}/listings/{}/{}.{}",
        dealer_id, listing_id, index, extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_listing_image_path_is_deterministic() {
        let dealer = Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap();
        let listing = Uuid::parse_str("22222222-2222-2222-2222-222222222222").unwrap();
        let a = listing_image_path(dealer, listing, 0, "jpg");
        let b = listing_image_path(dealer, listing, 0, "jpg");
        assert_eq!(a, b);
        assert_eq!(
            a,
            "dealers/11111111-1111-1111-1111-111111111111/listings/22222222-2222-2222-2222-222222222222/0.jpg"
        );
    }
}
