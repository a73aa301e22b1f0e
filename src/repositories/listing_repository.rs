use crate::dto::dealer_dto::ListingStatusCounts;
use crate::models::listing::{Listing, ListingStatus};
use crate::utils::errors::AppError;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct ListingRepository {
    pool: PgPool,
}

impl ListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Buscar la submission más antigua del mismo dealer con el mismo VIN
    /// normalizado. La existencia de una previa marca a la nueva como duplicada.
    pub async fn find_duplicate(
        &self,
        dealer_id: Uuid,
        normalized_vin: &str,
    ) -> Result<Option<Listing>, AppError> {
        let listing = sqlx::query_as::<_, Listing>(
            r#"
            SELECT * FROM listings
            WHERE dealer_id = $1 AND vin = $2
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(dealer_id)
        .bind(normalized_vin)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error checking duplicate VIN: {}", e)))?;

        Ok(listing)
    }

    /// Precios de los comparables aprobados: misma marca, modelo y año exactos
    pub async fn approved_comparable_prices(
        &self,
        make: &str,
        model: &str,
        year: i32,
    ) -> Result<Vec<Decimal>, AppError> {
        let rows: Vec<(Decimal,)> = sqlx::query_as(
            r#"
            SELECT price FROM listings
            WHERE make = $1 AND model = $2 AND year = $3 AND status = $4
            "#,
        )
        .bind(make)
        .bind(model)
        .bind(year)
        .bind(ListingStatus::Approved)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error loading comparables: {}", e)))?;

        Ok(rows.into_iter().map(|(price,)| price).collect())
    }

    /// Insertar un listing dentro de una transacción de ingesta
    pub async fn insert_in(conn: &mut PgConnection, listing: &Listing) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO listings (
                id, dealer_id, vin, make, model, year,
                price, mileage_km, condition, fuel_type, transmission, color, body_style,
                description, primary_image_url, image_urls, slug, status,
                validation_errors, validation_warnings, is_price_outlier, median_price,
                is_duplicate, duplicate_of_vin,
                seller_name, seller_phone, seller_address, city, state, created_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30
            )
            "#,
        )
        .bind(listing.id)
        .bind(listing.dealer_id)
        .bind(&listing.vin)
        .bind(&listing.make)
        .bind(&listing.model)
        .bind(listing.year)
        .bind(listing.price)
        .bind(listing.mileage_km)
        .bind(&listing.condition)
        .bind(&listing.fuel_type)
        .bind(&listing.transmission)
        .bind(&listing.color)
        .bind(&listing.body_style)
        .bind(&listing.description)
        .bind(&listing.primary_image_url)
        .bind(&listing.image_urls)
        .bind(&listing.slug)
        .bind(listing.status)
        .bind(&listing.validation_errors)
        .bind(&listing.validation_warnings)
        .bind(listing.is_price_outlier)
        .bind(listing.median_price)
        .bind(listing.is_duplicate)
        .bind(&listing.duplicate_of_vin)
        .bind(&listing.seller_name)
        .bind(&listing.seller_phone)
        .bind(&listing.seller_address)
        .bind(&listing.city)
        .bind(&listing.state)
        .bind(listing.created_at)
        .execute(conn)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error inserting listing: {}", e)))?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, AppError> {
        let listing = sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Error finding listing: {}", e)))?;

        Ok(listing)
    }

    pub async fn find_by_dealer(&self, dealer_id: Uuid) -> Result<Vec<Listing>, AppError> {
        let listings = sqlx::query_as::<_, Listing>(
            "SELECT * FROM listings WHERE dealer_id = $1 ORDER BY created_at DESC",
        )
        .bind(dealer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error listing listings: {}", e)))?;

        Ok(listings)
    }

    pub async fn count_by_status(&self, dealer_id: Uuid) -> Result<ListingStatusCounts, AppError> {
        let rows: Vec<(ListingStatus, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM listings WHERE dealer_id = $1 GROUP BY status",
        )
        .bind(dealer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error counting listings: {}", e)))?;

        let mut counts = ListingStatusCounts::default();
        for (status, count) in rows {
            match status {
                ListingStatus::Pending => counts.pending = count,
                ListingStatus::Approved => counts.approved = count,
                ListingStatus::OnHold => counts.on_hold = count,
                ListingStatus::Rejected => counts.rejected = count,
            }
        }

        Ok(counts)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: ListingStatus,
    ) -> Result<Listing, AppError> {
        let listing = sqlx::query_as::<_, Listing>(
            "UPDATE listings SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Error updating listing status: {}", e)))?;

        Ok(listing)
    }
}
