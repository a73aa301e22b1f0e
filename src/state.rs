//! Shared application state
//! 
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: pool de base de datos, configuración,
//! cliente HTTP, asset store y la ventana de rate limiting de submissions.

use reqwest::Client;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::SubmissionRateLimiter;
use crate::storage::{AssetStorage, LocalAssetStorage};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub http_client: Client,
    pub asset_storage: Arc<dyn AssetStorage>,
    pub submission_limiter: SubmissionRateLimiter,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let asset_storage: Arc<dyn AssetStorage> = Arc::new(LocalAssetStorage::new(
            PathBuf::from(&config.asset_storage_root),
            config.asset_base_url.clone(),
        ));

        Self {
            http_client: Client::new(),
            asset_storage,
            submission_limiter: SubmissionRateLimiter::new(&config),
            pool,
            config,
        }
    }

    /// Reemplazar el asset store (tests u otros backends)
    pub fn with_asset_storage(mut self, storage: Arc<dyn AssetStorage>) -> Self {
        self.asset_storage = storage;
        self
    }
}
