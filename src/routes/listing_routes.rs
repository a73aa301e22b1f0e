use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::listing_controller::ListingController;
use crate::dto::dealer_dto::ApiResponse;
use crate::dto::listing_dto::{
    BatchSubmitRequest, BatchSubmitResponse, ListingResponse, SubmissionResponse,
    SubmitListingRequest, UpdateListingStatusRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_listing_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_listing))
        .route("/batch", post(submit_batch))
        .route("/:id", get(get_listing))
        .route("/:id/report", get(get_listing_report))
        .route("/:id/status", put(update_listing_status))
        .route("/dealer/:dealer_id", get(list_dealer_listings))
}

async fn submit_listing(
    State(state): State<AppState>,
    Json(request): Json<SubmitListingRequest>,
) -> Result<Json<ApiResponse<SubmissionResponse>>, AppError> {
    let controller = ListingController::new(state);
    let response = controller.submit(request).await?;
    Ok(Json(response))
}

async fn submit_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchSubmitRequest>,
) -> Result<Json<BatchSubmitResponse>, AppError> {
    let controller = ListingController::new(state);
    let response = controller.submit_batch(request).await?;
    Ok(Json(response))
}

async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListingResponse>, AppError> {
    let controller = ListingController::new(state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn get_listing_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<crate::models::validation_report::ValidationReport>, AppError> {
    let controller = ListingController::new(state);
    let response = controller.get_report(id).await?;
    Ok(Json(response))
}

async fn list_dealer_listings(
    State(state): State<AppState>,
    Path(dealer_id): Path<Uuid>,
) -> Result<Json<Vec<ListingResponse>>, AppError> {
    let controller = ListingController::new(state);
    let response = controller.list_by_dealer(dealer_id).await?;
    Ok(Json(response))
}

async fn update_listing_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateListingStatusRequest>,
) -> Result<Json<ApiResponse<ListingResponse>>, AppError> {
    let controller = ListingController::new(state);
    let response = controller.update_status(id, request).await?;
    Ok(Json(response))
}
