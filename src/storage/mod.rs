//! Almacenamiento de assets
//! 
//! Contiene el contrato `AssetStorage` y la implementación local.

pub mod asset_store;
pub mod local;

pub use asset_store::{listing_image_path, AssetStorage, AssetStoreError};
pub use local::LocalAssetStorage;
