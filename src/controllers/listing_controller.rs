use crate::dto::dealer_dto::ApiResponse;
use crate::dto::listing_dto::{
    BatchSubmitRequest, BatchSubmitResponse, ListingResponse, SubmissionResponse,
    SubmitListingRequest, UpdateListingStatusRequest,
};
use crate::models::validation_report::ValidationReport;
use crate::repositories::listing_repository::ListingRepository;
use crate::repositories::report_repository::ReportRepository;
use crate::services::ingestion_service::IngestionService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use uuid::Uuid;

pub struct ListingController {
    repository: ListingRepository,
    reports: ReportRepository,
    ingestion: IngestionService,
    state: AppState,
}

impl ListingController {
    pub fn new(state: AppState) -> Self {
        Self {
            repository: ListingRepository::new(state.pool.clone()),
            reports: ReportRepository::new(state.pool.clone()),
            ingestion: IngestionService::new(
                state.pool.clone(),
                state.asset_storage.clone(),
                state.http_client.clone(),
            ),
            state,
        }
    }

    /// Quick add: una submission individual por el pipeline completo
    pub async fn submit(
        &self,
        request: SubmitListingRequest,
    ) -> Result<ApiResponse<SubmissionResponse>, AppError> {
        self.state
            .submission_limiter
            .check(request.dealer_id)
            .await
            .map_err(|_| AppError::RateLimitExceeded)?;

        let response = self.ingestion.submit(request).await?;

        Ok(ApiResponse::success_with_message(
            response,
            "Listing submitted successfully".to_string(),
        ))
    }

    /// Batch: múltiples submissions, un resultado por ítem
    pub async fn submit_batch(
        &self,
        request: BatchSubmitRequest,
    ) -> Result<BatchSubmitResponse, AppError> {
        if request.submissions.is_empty() {
            return Err(AppError::BadRequest("Batch is empty".to_string()));
        }
        if let Some(first) = request.submissions.first() {
            self.state
                .submission_limiter
                .check(first.dealer_id)
                .await
                .map_err(|_| AppError::RateLimitExceeded)?;
        }

        Ok(self.ingestion.submit_batch(request).await)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ListingResponse, AppError> {
        let listing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

        Ok(listing.into())
    }

    pub async fn list_by_dealer(&self, dealer_id: Uuid) -> Result<Vec<ListingResponse>, AppError> {
        let listings = self.repository.find_by_dealer(dealer_id).await?;
        Ok(listings.into_iter().map(Into::into).collect())
    }

    /// Reporte de validación de la ingesta que persistió el listing
    pub async fn get_report(&self, listing_id: Uuid) -> Result<ValidationReport, AppError> {
        self.reports
            .find_by_listing(listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Validation report not found".to_string()))
    }

    /// Transición de estado aplicada por moderación, fuera del write path
    /// del pipeline de ingesta
    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateListingStatusRequest,
    ) -> Result<ApiResponse<ListingResponse>, AppError> {
        let listing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

        if !listing.status.can_transition_to(request.status) {
            return Err(AppError::ValidationError(format!(
                "Cannot transition listing from {} to {}",
                listing.status.as_str(),
                request.status.as_str()
            )));
        }

        let updated = self.repository.update_status(id, request.status).await?;

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Listing status updated".to_string(),
        ))
    }
}
