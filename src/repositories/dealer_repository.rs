use crate::models::dealer::{next_month_start, Dealer};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct DealerRepository {
    pool: PgPool,
}

impl DealerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, dealer: &Dealer) -> Result<Dealer, AppError> {
        let result = sqlx::query_as::<_, Dealer>(
            r#"
            INSERT INTO dealers (
                id, name, store_code, email, phone, address, city, state,
                is_active, monthly_upload_count, monthly_upload_limit,
                quota_reset_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(dealer.id)
        .bind(&dealer.name)
        .bind(&dealer.store_code)
        .bind(&dealer.email)
        .bind(&dealer.phone)
        .bind(&dealer.address)
        .bind(&dealer.city)
        .bind(&dealer.state)
        .bind(dealer.is_active)
        .bind(dealer.monthly_upload_count)
        .bind(dealer.monthly_upload_limit)
        .bind(dealer.quota_reset_at)
        .bind(dealer.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // Violación de unicidad (email o store_code duplicado) -> Conflict,
            // no un error genérico de base de datos
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict("A dealer with this email or store code already exists".to_string())
            }
            _ => AppError::DatabaseError(format!("Error creating dealer: {}", e)),
        })?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Dealer>, AppError> {
        let dealer = sqlx::query_as::<_, Dealer>("SELECT * FROM dealers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error finding dealer: {}", e)))?;

        Ok(dealer)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM dealers WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Error checking email: {}", e)))?;

        Ok(result.0)
    }

    pub async fn store_code_exists(&self, store_code: &str) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM dealers WHERE store_code = $1)")
                .bind(store_code)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Error checking store code: {}", e)))?;

        Ok(result.0)
    }

    /// Rotar la ventana mensual de cuota si ya expiró.
    /// Devuelve el dealer con el contador y el timestamp actualizados.
    pub async fn roll_quota_window(&self, dealer: Dealer) -> Result<Dealer, AppError> {
        let now = Utc::now();
        if now < dealer.quota_reset_at {
            return Ok(dealer);
        }

        let refreshed = sqlx::query_as::<_, Dealer>(
            r#"
            UPDATE dealers
            SET monthly_upload_count = 0, quota_reset_at = $2
            WHERE id = $1 AND quota_reset_at <= $3
            RETURNING *
            "#,
        )
        .bind(dealer.id)
        .bind(next_month_start(now))
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error rolling quota window: {}", e)))?;

        // Otro request concurrente puede haber rotado la ventana primero;
        // en ese caso releemos el estado actual.
        match refreshed {
            Some(d) => Ok(d),
            None => self
                .find_by_id(dealer.id)
                .await?
                .ok_or_else(|| AppError::NotFound("Dealer not found".to_string())),
        }
    }

    /// Incremento condicional del contador mensual, dentro de la transacción
    /// de persistencia del listing. Devuelve false si la cuota está llena:
    /// la condición en el WHERE cierra la carrera de dos submissions
    /// concurrentes leyendo un contador viejo.
    pub async fn increment_quota_in(
        conn: &mut PgConnection,
        dealer_id: Uuid,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE dealers
            SET monthly_upload_count = monthly_upload_count + 1
            WHERE id = $1 AND monthly_upload_count < monthly_upload_limit
            "#,
        )
        .bind(dealer_id)
        .execute(conn)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error incrementing quota: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }
}
