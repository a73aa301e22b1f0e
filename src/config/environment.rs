//! Configuración de variables de entorno
//! 
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    /// Base pública del sitio, usada para construir links de listings en el feed
    pub public_base_url: String,
    /// Base pública desde la que se sirven los assets almacenados
    pub asset_base_url: String,
    /// Raíz del almacenamiento local de assets
    pub asset_storage_root: String,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    /// Límite mensual de uploads por defecto para dealers nuevos
    pub default_monthly_upload_limit: i32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            asset_base_url: env::var("ASSET_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/assets".to_string()),
            asset_storage_root: env::var("ASSET_STORAGE_ROOT")
                .unwrap_or_else(|_| "./data/assets".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            rate_limit_requests: env::var("RATE_LIMIT_REQUESTS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("RATE_LIMIT_REQUESTS must be a valid number"),
            rate_limit_window: env::var("RATE_LIMIT_WINDOW")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("RATE_LIMIT_WINDOW must be a valid number"),
            default_monthly_upload_limit: env::var("MONTHLY_UPLOAD_LIMIT")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .expect("MONTHLY_UPLOAD_LIMIT must be a valid number"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL pública de la página de un listing a partir de su slug
    pub fn listing_url(&self, slug: &str) -> String {
        format!("{}/listings/{}", self.public_base_url.trim_end_matches('/'), slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_url_strips_trailing_slash() {
        let mut config = EnvironmentConfig::default();
        config.public_base_url = "https://market.example.in/".to_string();
        assert_eq!(
            config.listing_url("dlx01-maruti-suzuki-swift-a1b2c3d4"),
            "https://market.example.in/listings/dlx01-maruti-suzuki-swift-a1b2c3d4"
        );
    }
}
