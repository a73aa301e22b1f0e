use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::dealer_controller::DealerController;
use crate::dto::dealer_dto::{ApiResponse, DealerResponse, QuotaResponse, RegisterDealerRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dealer_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_dealer))
        .route("/:id", get(get_dealer))
        .route("/:id/quota", get(get_quota))
}

async fn register_dealer(
    State(state): State<AppState>,
    Json(request): Json<RegisterDealerRequest>,
) -> Result<Json<ApiResponse<DealerResponse>>, AppError> {
    let controller =
        DealerController::new(state.pool.clone(), state.config.default_monthly_upload_limit);
    let response = controller.register(request).await?;
    Ok(Json(response))
}

async fn get_dealer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DealerResponse>, AppError> {
    let controller =
        DealerController::new(state.pool.clone(), state.config.default_monthly_upload_limit);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn get_quota(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuotaResponse>, AppError> {
    let controller =
        DealerController::new(state.pool.clone(), state.config.default_monthly_upload_limit);
    let response = controller.quota(id).await?;
    Ok(Json(response))
}
