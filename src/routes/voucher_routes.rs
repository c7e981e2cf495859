use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::voucher_controller::VoucherController;
use crate::dto::common::ApiResponse;
use crate::dto::voucher_dto::{
    BulkStatusRequest, BulkStatusResponse, CreateVoucherRequest, UpdateVoucherStatusRequest,
    VoucherListQuery, VoucherResponse,
};
use crate::models::status_log::VoucherStatusLog;
use crate::models::user::Actor;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_voucher_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_voucher))
        .route("/", get(list_vouchers))
        .route("/bulk-status", post(bulk_update_status))
        .route("/:id", get(get_voucher))
        .route("/:id/status", post(update_status))
        .route("/:id/logs", get(get_logs))
}

async fn create_voucher(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateVoucherRequest>,
) -> Result<Json<ApiResponse<VoucherResponse>>, AppError> {
    let controller = VoucherController::new(&state);
    let response = controller.create(&actor, request).await?;
    Ok(Json(response))
}

async fn list_vouchers(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<VoucherListQuery>,
) -> Result<Json<Vec<VoucherResponse>>, AppError> {
    let controller = VoucherController::new(&state);
    let response = controller.list(&actor, query).await?;
    Ok(Json(response))
}

async fn get_voucher(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
) -> Result<Json<VoucherResponse>, AppError> {
    let controller = VoucherController::new(&state);
    let response = controller.get(&actor, id).await?;
    Ok(Json(response))
}

async fn update_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
    Json(request): Json<UpdateVoucherStatusRequest>,
) -> Result<Json<ApiResponse<VoucherResponse>>, AppError> {
    let controller = VoucherController::new(&state);
    let response = controller.update_status(&actor, id, request).await?;
    Ok(Json(response))
}

async fn bulk_update_status(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<BulkStatusRequest>,
) -> Result<Json<BulkStatusResponse>, AppError> {
    let controller = VoucherController::new(&state);
    let response = controller.bulk_update_status(&actor, request).await?;
    Ok(Json(response))
}

async fn get_logs(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
) -> Result<Json<Vec<VoucherStatusLog>>, AppError> {
    let controller = VoucherController::new(&state);
    let response = controller.logs(&actor, id).await?;
    Ok(Json(response))
}
