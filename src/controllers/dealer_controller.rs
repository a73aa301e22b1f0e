use crate::dto::dealer_dto::{
    ApiResponse, DealerResponse, QuotaResponse, RegisterDealerRequest,
};
use crate::models::dealer::Dealer;
use crate::repositories::dealer_repository::DealerRepository;
use crate::repositories::listing_repository::ListingRepository;
use crate::utils::errors::AppError;
use crate::utils::validation as field;
use sqlx::PgPool;
use uuid::Uuid;

pub struct DealerController {
    repository: DealerRepository,
    listings: ListingRepository,
    default_monthly_upload_limit: i32,
}

impl DealerController {
    pub fn new(pool: PgPool, default_monthly_upload_limit: i32) -> Self {
        Self {
            repository: DealerRepository::new(pool.clone()),
            listings: ListingRepository::new(pool),
            default_monthly_upload_limit,
        }
    }

    pub async fn register(
        &self,
        request: RegisterDealerRequest,
    ) -> Result<ApiResponse<DealerResponse>, AppError> {
        // Validar campos
        if field::validate_length(request.name.trim(), 2, 255).is_err() {
            return Err(AppError::ValidationError("Dealer name is required".to_string()));
        }
        if field::validate_store_code(&request.store_code).is_err() {
            return Err(AppError::ValidationError(
                "Store code must be 3-20 alphanumeric characters".to_string(),
            ));
        }
        if field::validate_email(&request.email).is_err() {
            return Err(AppError::ValidationError("Invalid email".to_string()));
        }
        if field::validate_phone(&request.phone).is_err() {
            return Err(AppError::ValidationError("Invalid phone number".to_string()));
        }
        if field::validate_not_empty(&request.address).is_err()
            || field::validate_not_empty(&request.city).is_err()
            || field::validate_not_empty(&request.state).is_err()
        {
            return Err(AppError::ValidationError(
                "Address, city and state are required".to_string(),
            ));
        }

        // Verificar unicidad de email y store code. El constraint de la base
        // cubre la carrera: un insert concurrente igual termina en Conflict.
        if self.repository.email_exists(&request.email).await? {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }
        if self.repository.store_code_exists(&request.store_code).await? {
            return Err(AppError::Conflict("Store code is already registered".to_string()));
        }

        let limit = request
            .monthly_upload_limit
            .unwrap_or(self.default_monthly_upload_limit);
        if field::validate_range(limit, 1, 10_000).is_err() {
            return Err(AppError::ValidationError(
                "Monthly upload limit must be between 1 and 10000".to_string(),
            ));
        }

        let dealer = Dealer::new(
            request.name.trim().to_string(),
            request.store_code.trim().to_string(),
            request.email.trim().to_lowercase(),
            request.phone.trim().to_string(),
            request.address.trim().to_string(),
            request.city.trim().to_string(),
            request.state.trim().to_string(),
            limit,
        );

        let saved = self.repository.create(&dealer).await?;

        Ok(ApiResponse::success_with_message(
            saved.into(),
            "Dealer registered successfully".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<DealerResponse, AppError> {
        let dealer = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dealer not found".to_string()))?;

        Ok(dealer.into())
    }

    /// Cuota restante y conteo de listings por estado para el dashboard
    pub async fn quota(&self, id: Uuid) -> Result<QuotaResponse, AppError> {
        let dealer = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Dealer not found".to_string()))?;
        let dealer = self.repository.roll_quota_window(dealer).await?;

        let counts = self.listings.count_by_status(dealer.id).await?;

        Ok(QuotaResponse {
            dealer_id: dealer.id,
            monthly_upload_limit: dealer.monthly_upload_limit,
            monthly_upload_count: dealer.monthly_upload_count,
            remaining: dealer.remaining_quota(),
            quota_reset_at: dealer.quota_reset_at,
            listings: counts,
        })
    }
}
