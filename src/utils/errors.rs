//! Sistema de manejo de errores
//! 
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas. La distinción clave
//! es entre fallos de validación (los datos del dealer son inválidos)
//! y fallos de infraestructura (el sistema no pudo procesar datos válidos):
//! los códigos de respuesta son distintos porque la política de reintento
//! del cliente es distinta.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Fallo estructural de una submission: lista completa de errores,
    /// nada fue persistido ni subido.
    #[error("Submission rejected")]
    SubmissionRejected(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Monthly upload quota exceeded")]
    QuotaExceeded,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// El asset store no pudo almacenar o servir un asset
    #[error("Asset storage error: {0}")]
    StorageError(String),

    /// Fallo genérico de ingesta en los pasos 4-7 del pipeline:
    /// los datos eran válidos pero el sistema no pudo procesarlos.
    #[error("Ingestion failed: {0}")]
    IngestionFailed(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": msg })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::ValidationError(msg) => {
                tracing::warn!("Validation error: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: msg,
                        details: None,
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::SubmissionRejected(errors) => {
                tracing::warn!("Submission rejected with {} error(s)", errors.len());
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse {
                        error: "Submission Rejected".to_string(),
                        message: "The submission failed structural validation; nothing was stored"
                            .to_string(),
                        details: Some(json!({ "errors": errors })),
                        code: Some("VALIDATION_FAILED".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "Not Found".to_string(),
                    message: msg,
                    details: None,
                    code: Some("NOT_FOUND".to_string()),
                },
            ),

            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorResponse {
                    error: "Forbidden".to_string(),
                    message: msg,
                    details: None,
                    code: Some("FORBIDDEN".to_string()),
                },
            ),

            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: "Conflict".to_string(),
                    message: msg,
                    details: None,
                    code: Some("CONFLICT".to_string()),
                },
            ),

            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Bad Request".to_string(),
                    message: msg,
                    details: None,
                    code: Some("BAD_REQUEST".to_string()),
                },
            ),

            AppError::QuotaExceeded => {
                tracing::warn!("Monthly upload quota exceeded");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    ErrorResponse {
                        error: "Quota Exceeded".to_string(),
                        message: "Monthly upload quota exceeded for this dealer".to_string(),
                        details: None,
                        code: Some("QUOTA_EXCEEDED".to_string()),
                    },
                )
            }

            AppError::RateLimitExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse {
                    error: "Rate Limit Exceeded".to_string(),
                    message: "Too many requests. Please try again later".to_string(),
                    details: None,
                    code: Some("RATE_LIMIT_EXCEEDED".to_string()),
                },
            ),

            AppError::StorageError(msg) => {
                tracing::error!("Asset storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Asset Storage Error".to_string(),
                        message: "The system could not store the submitted assets".to_string(),
                        details: Some(json!({ "storage_error": msg })),
                        code: Some("INGESTION_FAILED".to_string()),
                    },
                )
            }

            AppError::IngestionFailed(msg) => {
                tracing::error!("Ingestion failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Ingestion Failed".to_string(),
                        message: "The system could not process an otherwise valid submission"
                            .to_string(),
                        details: Some(json!({ "ingestion_error": msg })),
                        code: Some("INGESTION_FAILED".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_is_distinct_from_ingestion_failure() {
        // La política de reintento difiere: 422 no se reintenta sin corregir,
        // 500 sí es reintentable.
        let rejected = AppError::SubmissionRejected(vec!["bad vin".to_string()]).into_response();
        let failed = AppError::IngestionFailed("storage down".to_string()).into_response();
        assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_conflict_error_helper() {
        let err = conflict_error("Dealer", "email", "a@b.in");
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), "Conflict: Dealer with email 'a@b.in' already exists");
    }
}
