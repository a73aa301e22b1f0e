mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod storage;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use middleware::cors::cors_layer;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Vehicle Marketplace - Pipeline de ingesta de listings");
    info!("=========================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    info!("✅ Base de datos conectada");

    // Crear router de la API
    let app_state = AppState::new(pool, config.clone());

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/dealer", routes::dealer_routes::create_dealer_router())
        .nest("/api/listing", routes::listing_routes::create_listing_router())
        .nest("/api/feed", routes::feed_routes::create_feed_router())
        .layer(cors_layer(&config.cors_origins))
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🏪 Endpoints - Dealer:");
    info!("   POST /api/dealer/register - Registrar dealer");
    info!("   GET  /api/dealer/:id - Obtener dealer");
    info!("   GET  /api/dealer/:id/quota - Cuota mensual y conteos por estado");
    info!("🚗 Endpoints - Listing:");
    info!("   POST /api/listing - Quick add (submission individual)");
    info!("   POST /api/listing/batch - Submission por lotes");
    info!("   GET  /api/listing/:id - Obtener listing");
    info!("   GET  /api/listing/:id/report - Reporte de validación de la ingesta");
    info!("   GET  /api/listing/dealer/:dealer_id - Listings de un dealer");
    info!("   PUT  /api/listing/:id/status - Transición de estado (moderación)");
    info!("📤 Endpoints - Feed:");
    info!("   GET  /api/feed/:dealer_id - Feed de sindicación + exclusiones");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de health check
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "vehicle-marketplace",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
