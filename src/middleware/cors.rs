//! Middleware de CORS
//!
//! Este módulo construye la capa de CORS a partir de los orígenes
//! configurados; "*" habilita el modo permisivo de desarrollo.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;

/// Crear middleware de CORS desde la configuración
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        // Cualquier origen - solo para desarrollo
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
        ])
        .max_age(std::time::Duration::from_secs(3600))
}
