//! Configuración de base de datos
//! 
//! Este módulo maneja la conexión y configuración de PostgreSQL con SQLx.
//! Los tamaños del pool son configurables por entorno porque el pipeline de
//! ingesta mantiene transacciones abiertas durante la subida de assets.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set in environment variables"),
            max_connections: env_number("DATABASE_MAX_CONNECTIONS", 20),
            min_connections: env_number("DATABASE_MIN_CONNECTIONS", 2),
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
        }
    }
}

impl DatabaseConfig {
    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .connect(&self.url)
            .await
    }
}

fn env_number(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_number_falls_back_to_default() {
        assert_eq!(env_number("DOES_NOT_EXIST_XYZ", 7), 7);
    }
}
