//! Ventana de rate limiting de submissions
//! 
//! Estado explícito a nivel de proceso con la ventana de requests por dealer.
//! Ciclo de vida de cada entrada: se crea en el primer uso, se reinicia
//! cuando su ventana expira y se poda de forma perezosa en cada acceso.
//! No hay estado mutable ambiente: el mapa vive dentro del AppState.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::EnvironmentConfig;

/// Ventana de requests de un dealer, con su expiración explícita
#[derive(Debug, Clone)]
struct SubmissionWindow {
    requests: u32,
    expires_at: Instant,
}

/// Estado process-wide de rate limiting de submissions, por dealer
#[derive(Clone)]
pub struct SubmissionRateLimiter {
    windows: Arc<RwLock<HashMap<Uuid, SubmissionWindow>>>,
    max_requests: u32,
    window_duration: Duration,
}

/// Errores de rate limiting
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Rate limit exceeded")]
    LimitExceeded,
}

impl SubmissionRateLimiter {
    /// Crear el limitador a partir de la configuración de entorno
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            max_requests: config.rate_limit_requests,
            window_duration: Duration::from_secs(config.rate_limit_window),
        }
    }

    pub fn with_limits(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
        }
    }

    /// Verificar si un dealer puede someter otra submission en esta ventana
    pub async fn check(&self, dealer_id: Uuid) -> Result<(), RateLimitError> {
        let mut windows = self.windows.write().await;
        let now = Instant::now();

        // Podar entradas expiradas
        windows.retain(|_, window| window.expires_at > now);

        let window = windows.entry(dealer_id).or_insert(SubmissionWindow {
            requests: 0,
            expires_at: now + self.window_duration,
        });

        if window.expires_at <= now {
            window.requests = 1;
            window.expires_at = now + self.window_duration;
            return Ok(());
        }

        if window.requests >= self.max_requests {
            log::warn!("Rate limit alcanzado para dealer {}", dealer_id);
            return Err(RateLimitError::LimitExceeded);
        }

        window.requests += 1;
        Ok(())
    }

    /// Cantidad de ventanas vivas (para introspección en tests)
    pub async fn active_windows(&self) -> usize {
        self.windows.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_blocks_after_max_requests() {
        let limiter = SubmissionRateLimiter::with_limits(2, Duration::from_secs(60));
        let dealer = Uuid::new_v4();

        assert!(limiter.check(dealer).await.is_ok());
        assert!(limiter.check(dealer).await.is_ok());
        assert!(matches!(
            limiter.check(dealer).await,
            Err(RateLimitError::LimitExceeded)
        ));
    }

    #[tokio::test]
    async fn test_dealers_have_independent_windows() {
        let limiter = SubmissionRateLimiter::with_limits(1, Duration::from_secs(60));
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        assert!(limiter.check(first).await.is_ok());
        assert!(limiter.check(second).await.is_ok());
        assert!(limiter.check(first).await.is_err());
    }

    #[tokio::test]
    async fn test_expired_windows_are_pruned() {
        let limiter = SubmissionRateLimiter::with_limits(1, Duration::from_millis(10));
        let dealer = Uuid::new_v4();

        assert!(limiter.check(dealer).await.is_ok());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(limiter.check(dealer).await.is_ok());
        assert_eq!(limiter.active_windows().await, 1);
    }
}
