use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};

use crate::controllers::consignment_controller::ConsignmentController;
use crate::dto::common::ApiResponse;
use crate::dto::consignment_dto::{
    AttachVouchersRequest, ConsignmentResponse, CreateConsignmentRequest,
    UpdateConsignmentStatusRequest,
};
use crate::dto::voucher_dto::VoucherResponse;
use crate::models::status_log::ConsignmentStatusLog;
use crate::models::user::Actor;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_consignment_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_consignment))
        .route("/", get(list_consignments))
        .route("/:id", get(get_consignment))
        .route("/:id/status", post(update_status))
        .route("/:id/logs", get(get_logs))
        .route("/:id/vouchers", get(list_vouchers))
        .route("/:id/vouchers", post(attach_vouchers))
        .route("/:id/vouchers/:voucher_id", delete(detach_voucher))
}

async fn create_consignment(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CreateConsignmentRequest>,
) -> Result<Json<ApiResponse<ConsignmentResponse>>, AppError> {
    let controller = ConsignmentController::new(&state);
    let response = controller.create(&actor, request).await?;
    Ok(Json(response))
}

async fn list_consignments(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<ConsignmentResponse>>, AppError> {
    let controller = ConsignmentController::new(&state);
    let response = controller.list(&actor).await?;
    Ok(Json(response))
}

async fn get_consignment(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
) -> Result<Json<ConsignmentResponse>, AppError> {
    let controller = ConsignmentController::new(&state);
    let response = controller.get(&actor, id).await?;
    Ok(Json(response))
}

async fn update_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
    Json(request): Json<UpdateConsignmentStatusRequest>,
) -> Result<Json<ApiResponse<ConsignmentResponse>>, AppError> {
    let controller = ConsignmentController::new(&state);
    let response = controller.update_status(&actor, id, request).await?;
    Ok(Json(response))
}

async fn get_logs(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ConsignmentStatusLog>>, AppError> {
    let controller = ConsignmentController::new(&state);
    let response = controller.logs(&actor, id).await?;
    Ok(Json(response))
}

async fn list_vouchers(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
) -> Result<Json<Vec<VoucherResponse>>, AppError> {
    let controller = ConsignmentController::new(&state);
    let response = controller.vouchers(&actor, id).await?;
    Ok(Json(response))
}

async fn attach_vouchers(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<i64>,
    Json(request): Json<AttachVouchersRequest>,
) -> Result<Json<ApiResponse<Vec<VoucherResponse>>>, AppError> {
    let controller = ConsignmentController::new(&state);
    let response = controller.attach_vouchers(&actor, id, request).await?;
    Ok(Json(response))
}

async fn detach_voucher(
    State(state): State<AppState>,
    actor: Actor,
    Path((id, voucher_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<VoucherResponse>>, AppError> {
    let controller = ConsignmentController::new(&state);
    let response = controller.detach_voucher(&actor, id, voucher_id).await?;
    Ok(Json(response))
}
