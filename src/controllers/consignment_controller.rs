//! Consignment workflow orchestration

use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::consignment_dto::{
    AttachVouchersRequest, ConsignmentResponse, CreateConsignmentRequest,
    UpdateConsignmentStatusRequest,
};
use crate::dto::voucher_dto::VoucherResponse;
use crate::models::consignment::{Consignment, ConsignmentStatus};
use crate::models::status_log::ConsignmentStatusLog;
use crate::models::user::Actor;
use crate::repositories::consignment_repository::{ConsignmentRepository, NewConsignment};
use crate::repositories::status_log_repository::StatusLogRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::voucher_repository::VoucherRepository;
use crate::services::codes::format_consignment_code;
use crate::services::notes::{append_note, render_note_block};
use crate::services::transitions::{check_consignment_transition, TransitionPolicy};
use crate::services::visibility::consignment_scope;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{ensure_driver, missing_ids};

pub struct ConsignmentController {
    pool: PgPool,
    consignments: ConsignmentRepository,
    vouchers: VoucherRepository,
    users: UserRepository,
    logs: StatusLogRepository,
    code_prefix: String,
    policy: TransitionPolicy,
}

impl ConsignmentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
            consignments: ConsignmentRepository::new(state.pool.clone()),
            vouchers: VoucherRepository::new(state.pool.clone()),
            users: UserRepository::new(state.pool.clone()),
            logs: StatusLogRepository::new(state.pool.clone()),
            code_prefix: state.config.consignment_prefix.clone(),
            policy: state.transition_policy(),
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateConsignmentRequest,
    ) -> Result<ApiResponse<ConsignmentResponse>, AppError> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins may create consignments".to_string(),
            ));
        }

        request.validate()?;

        if let Some(driver_id) = request.driver_id {
            let driver = self.users.find_by_id(driver_id).await?;
            ensure_driver(driver_id, driver.as_ref())?;
        }

        let today = Utc::now().date_naive();

        let mut tx = self.pool.begin().await?;

        let sequence = ConsignmentRepository::next_day_sequence(&mut tx, today).await?;
        let code = format_consignment_code(&self.code_prefix, today, sequence)?;

        let creation_note = render_note_block(
            Utc::now(),
            &actor.username,
            None,
            ConsignmentStatus::Pending.as_str(),
            request.note.as_deref(),
        );

        let consignment = ConsignmentRepository::create(
            &mut tx,
            &NewConsignment {
                code: &code,
                name: &request.name,
                driver_id: request.driver_id,
                route: request.route.as_deref(),
                expected_delivery_date: request.expected_delivery_date,
                notes: &creation_note,
                created_by: actor.id,
            },
        )
        .await?;

        StatusLogRepository::insert_consignment_log(
            &mut tx,
            consignment.id,
            None,
            ConsignmentStatus::Pending,
            request.note.as_deref(),
            actor.id,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(code = %consignment.code, actor = actor.id, "consignment created");

        Ok(ApiResponse::success_with_message(
            consignment.into(),
            "Consignment created successfully".to_string(),
        ))
    }

    pub async fn list(&self, actor: &Actor) -> Result<Vec<ConsignmentResponse>, AppError> {
        let scope = consignment_scope(actor);
        let consignments = self.consignments.list(&scope).await?;

        Ok(consignments
            .into_iter()
            .map(ConsignmentResponse::from)
            .collect())
    }

    pub async fn get(&self, actor: &Actor, id: i64) -> Result<ConsignmentResponse, AppError> {
        let consignment = self.visible_consignment(actor, id).await?;

        Ok(consignment.into())
    }

    /// Vouchers currently attached to a visible consignment
    pub async fn vouchers(
        &self,
        actor: &Actor,
        id: i64,
    ) -> Result<Vec<VoucherResponse>, AppError> {
        self.visible_consignment(actor, id).await?;

        let vouchers = self.vouchers.list_by_consignment(id).await?;

        Ok(vouchers.into_iter().map(VoucherResponse::from).collect())
    }

    pub async fn logs(
        &self,
        actor: &Actor,
        id: i64,
    ) -> Result<Vec<ConsignmentStatusLog>, AppError> {
        self.visible_consignment(actor, id).await?;

        self.logs.list_for_consignment(id).await
    }

    pub async fn update_status(
        &self,
        actor: &Actor,
        id: i64,
        request: UpdateConsignmentStatusRequest,
    ) -> Result<ApiResponse<ConsignmentResponse>, AppError> {
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        let consignment = ConsignmentRepository::find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Consignment", id))?;

        let scope = consignment_scope(actor);
        if !scope.allows(&consignment) {
            return Err(not_found_error("Consignment", id));
        }

        let decision =
            check_consignment_transition(actor, &consignment, request.status, &self.policy);
        if !decision.allowed {
            return Err(AppError::Forbidden(
                decision
                    .reason
                    .unwrap_or("status change not permitted")
                    .to_string(),
            ));
        }

        let block = render_note_block(
            Utc::now(),
            &actor.username,
            Some(consignment.status.as_str()),
            request.status.as_str(),
            request.note.as_deref(),
        );
        let notes = append_note(&consignment.notes, &block);

        let updated =
            ConsignmentRepository::update_status(&mut tx, id, request.status, &notes).await?;

        StatusLogRepository::insert_consignment_log(
            &mut tx,
            id,
            Some(consignment.status),
            request.status,
            request.note.as_deref(),
            actor.id,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            consignment = id,
            from = consignment.status.as_str(),
            to = request.status.as_str(),
            actor = actor.id,
            "consignment status changed"
        );

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Consignment status updated".to_string(),
        ))
    }

    pub async fn attach_vouchers(
        &self,
        actor: &Actor,
        id: i64,
        request: AttachVouchersRequest,
    ) -> Result<ApiResponse<Vec<VoucherResponse>>, AppError> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins may change consignment membership".to_string(),
            ));
        }

        request.validate()?;

        let consignment = self.open_consignment(id).await?;

        // Reject the whole batch up front when any id is unknown, then
        // apply the membership change in one transaction.
        let existing = self.vouchers.find_by_ids(&request.voucher_ids).await?;
        let found: Vec<i64> = existing.iter().map(|v| v.id).collect();
        let missing = missing_ids(&request.voucher_ids, &found);
        if !missing.is_empty() {
            return Err(AppError::NotFound(format!(
                "Vouchers with ids {:?} not found",
                missing
            )));
        }

        let mut tx = self.pool.begin().await?;

        let mut attached = Vec::with_capacity(request.voucher_ids.len());
        for voucher_id in &request.voucher_ids {
            let voucher =
                VoucherRepository::set_consignment(&mut tx, *voucher_id, Some(consignment.id))
                    .await?;
            attached.push(voucher.into());
        }

        tx.commit().await?;

        tracing::info!(
            consignment = consignment.id,
            count = attached.len(),
            actor = actor.id,
            "vouchers attached"
        );

        Ok(ApiResponse::success_with_message(
            attached,
            "Vouchers attached to consignment".to_string(),
        ))
    }

    pub async fn detach_voucher(
        &self,
        actor: &Actor,
        id: i64,
        voucher_id: i64,
    ) -> Result<ApiResponse<VoucherResponse>, AppError> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins may change consignment membership".to_string(),
            ));
        }

        let consignment = self.open_consignment(id).await?;

        let voucher = self
            .vouchers
            .find_by_id(voucher_id)
            .await?
            .ok_or_else(|| not_found_error("Voucher", voucher_id))?;
        if voucher.consignment_id != Some(consignment.id) {
            return Err(AppError::BadRequest(format!(
                "Voucher '{}' is not part of consignment '{}'",
                voucher.code, consignment.code
            )));
        }

        let mut tx = self.pool.begin().await?;
        let detached = VoucherRepository::set_consignment(&mut tx, voucher_id, None).await?;
        tx.commit().await?;

        Ok(ApiResponse::success_with_message(
            detached.into(),
            "Voucher detached from consignment".to_string(),
        ))
    }

    /// Load a consignment that still accepts membership changes
    async fn open_consignment(&self, id: i64) -> Result<Consignment, AppError> {
        let consignment = self
            .consignments
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Consignment", id))?;

        if consignment.status.is_closed() {
            return Err(AppError::Conflict(format!(
                "Consignment '{}' is {} and no longer accepts changes",
                consignment.code,
                consignment.status.as_str()
            )));
        }

        Ok(consignment)
    }

    async fn visible_consignment(&self, actor: &Actor, id: i64) -> Result<Consignment, AppError> {
        let consignment = self
            .consignments
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Consignment", id))?;

        let scope = consignment_scope(actor);
        if !scope.allows(&consignment) {
            return Err(not_found_error("Consignment", id));
        }

        Ok(consignment)
    }
}
