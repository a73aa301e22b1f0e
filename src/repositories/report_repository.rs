use crate::models::validation_report::ValidationReport;
use crate::utils::errors::AppError;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar el reporte dentro de la misma transacción que persiste
    /// el listing. Los reportes son inmutables: no hay update path.
    pub async fn insert_in(
        conn: &mut PgConnection,
        report: &ValidationReport,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO validation_reports (
                id, listing_id, dealer_id, checks_run, checks_passed,
                checks_failed, warnings_count, detail, review_required, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(report.id)
        .bind(report.listing_id)
        .bind(report.dealer_id)
        .bind(report.checks_run)
        .bind(report.checks_passed)
        .bind(report.checks_failed)
        .bind(report.warnings_count)
        .bind(&report.detail)
        .bind(report.review_required)
        .bind(report.created_at)
        .execute(conn)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error inserting validation report: {}", e)))?;

        Ok(())
    }

    pub async fn find_by_listing(
        &self,
        listing_id: Uuid,
    ) -> Result<Option<ValidationReport>, AppError> {
        let report = sqlx::query_as::<_, ValidationReport>(
            "SELECT * FROM validation_reports WHERE listing_id = $1",
        )
        .bind(listing_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error finding validation report: {}", e)))?;

        Ok(report)
    }
}
