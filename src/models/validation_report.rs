//! Modelo de ValidationReport
//! 
//! Un reporte por cada submission que llega a persistirse. Inmutable:
//! se crea una sola vez dentro de la misma ingesta que persiste el listing.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// ValidationReport - mapea exactamente a la tabla validation_reports
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ValidationReport {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub dealer_id: Uuid,
    pub checks_run: i32,
    pub checks_passed: i32,
    pub checks_failed: i32,
    pub warnings_count: i32,
    /// Detalle estructurado de los hallazgos de cada validador
    pub detail: serde_json::Value,
    /// Espeja el estado on_hold del listing
    pub review_required: bool,
    pub created_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn new(
        listing_id: Uuid,
        dealer_id: Uuid,
        checks_run: i32,
        warnings_count: i32,
        detail: serde_json::Value,
        review_required: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            listing_id,
            dealer_id,
            checks_run,
            // Un reporte sólo existe para submissions persistidas: todos los
            // checks estructurales pasaron, los fallos habrían abortado antes.
            checks_passed: checks_run,
            checks_failed: 0,
            warnings_count,
            detail,
            review_required,
            created_at: Utc::now(),
        }
    }
}
