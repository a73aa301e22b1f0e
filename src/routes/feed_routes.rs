use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::feed_controller::FeedController;
use crate::dto::feed_dto::FeedResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_feed_router() -> Router<AppState> {
    Router::new().route("/:dealer_id", get(get_feed))
}

async fn get_feed(
    State(state): State<AppState>,
    Path(dealer_id): Path<Uuid>,
) -> Result<Json<FeedResponse>, AppError> {
    let controller = FeedController::new(state.pool.clone(), state.config.clone());
    let response = controller.generate(dealer_id).await?;
    Ok(Json(response))
}
