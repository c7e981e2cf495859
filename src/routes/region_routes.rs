use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::region_controller::RegionController;
use crate::dto::common::ApiResponse;
use crate::dto::region_dto::{CreateRegionRequest, RegionResponse};
use crate::models::user::Actor;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_region_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_region))
        .route("/", get(list_regions))
}

async fn create_region(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateRegionRequest>,
) -> Result<Json<ApiResponse<RegionResponse>>, AppError> {
    let controller = RegionController::new(&state);
    let response = controller.create(&actor, request).await?;
    Ok(Json(response))
}

async fn list_regions(
    State(state): State<AppState>,
    _actor: Actor,
) -> Result<Json<Vec<RegionResponse>>, AppError> {
    let controller = RegionController::new(&state);
    let response = controller.list().await?;
    Ok(Json(response))
}
