//! Voucher workflow orchestration
//!
//! Every multi-step write here runs in one transaction: sequence
//! allocation + voucher insert + creation log, or status update +
//! audit log. If any step fails, the whole write rolls back, so a
//! voucher can never exist without its counter increment or its log
//! entry.

use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::voucher_dto::{
    BulkStatusOutcome, BulkStatusRequest, BulkStatusResponse, CreateVoucherRequest,
    UpdateVoucherStatusRequest, VoucherListQuery, VoucherResponse,
};
use crate::models::consignment::Consignment;
use crate::models::status_log::VoucherStatusLog;
use crate::models::user::Actor;
use crate::models::voucher::{Voucher, VoucherStatus};
use crate::repositories::consignment_repository::ConsignmentRepository;
use crate::repositories::region_repository::RegionRepository;
use crate::repositories::status_log_repository::StatusLogRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::voucher_repository::{NewVoucher, VoucherRepository};
use crate::services::codes::format_voucher_code;
use crate::services::notes::{append_note, render_note_block};
use crate::services::transitions::{check_voucher_transition, TransitionContext, TransitionPolicy};
use crate::services::visibility::voucher_scope;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::{ensure_distinct_regions, ensure_driver, ensure_positive};

pub struct VoucherController {
    pool: PgPool,
    vouchers: VoucherRepository,
    regions: RegionRepository,
    consignments: ConsignmentRepository,
    users: UserRepository,
    logs: StatusLogRepository,
    code_width: usize,
    policy: TransitionPolicy,
}

impl VoucherController {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
            vouchers: VoucherRepository::new(state.pool.clone()),
            regions: RegionRepository::new(state.pool.clone()),
            consignments: ConsignmentRepository::new(state.pool.clone()),
            users: UserRepository::new(state.pool.clone()),
            logs: StatusLogRepository::new(state.pool.clone()),
            code_width: state.config.voucher_code_width,
            policy: state.transition_policy(),
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateVoucherRequest,
    ) -> Result<ApiResponse<VoucherResponse>, AppError> {
        if actor.is_driver() {
            return Err(AppError::Forbidden(
                "Drivers may not create vouchers".to_string(),
            ));
        }

        request.validate()?;
        ensure_distinct_regions(request.origin_region_id, request.destination_region_id)?;
        ensure_positive("weight_kg", request.weight_kg)?;
        ensure_positive("total_amount", request.total_amount)?;

        if let Some(driver_id) = request.driver_id {
            let driver = self.users.find_by_id(driver_id).await?;
            ensure_driver(driver_id, driver.as_ref())?;
        }

        let origin = self
            .regions
            .find_by_id(request.origin_region_id)
            .await?
            .ok_or_else(|| not_found_error("Region", request.origin_region_id))?;
        if self
            .regions
            .find_by_id(request.destination_region_id)
            .await?
            .is_none()
        {
            return Err(not_found_error("Region", request.destination_region_id));
        }

        let mut tx = self.pool.begin().await?;

        let sequence = RegionRepository::allocate_sequence(&mut tx, origin.id).await?;
        let code = format_voucher_code(&origin.code_prefix, sequence, self.code_width)?;

        let creation_note = render_note_block(
            Utc::now(),
            &actor.username,
            None,
            VoucherStatus::Pending.as_str(),
            request.note.as_deref(),
        );

        let voucher = VoucherRepository::create(
            &mut tx,
            &NewVoucher {
                code: &code,
                sender_name: &request.sender_name,
                sender_phone: &request.sender_phone,
                sender_address: &request.sender_address,
                receiver_name: &request.receiver_name,
                receiver_phone: &request.receiver_phone,
                receiver_address: &request.receiver_address,
                weight_kg: request.weight_kg,
                currency: &request.currency,
                total_amount: request.total_amount,
                payment_method: request.payment_method,
                delivery_type: request.delivery_type,
                notes: &creation_note,
                origin_region_id: request.origin_region_id,
                destination_region_id: request.destination_region_id,
                driver_id: request.driver_id,
                created_by: actor.id,
            },
        )
        .await?;

        StatusLogRepository::insert_voucher_log(
            &mut tx,
            voucher.id,
            None,
            VoucherStatus::Pending,
            request.note.as_deref(),
            actor.id,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(code = %voucher.code, actor = actor.id, "voucher created");

        Ok(ApiResponse::success_with_message(
            voucher.into(),
            "Voucher created successfully".to_string(),
        ))
    }

    pub async fn list(
        &self,
        actor: &Actor,
        query: VoucherListQuery,
    ) -> Result<Vec<VoucherResponse>, AppError> {
        let scope = voucher_scope(actor);
        let vouchers = self.vouchers.list(&scope, query.status).await?;

        Ok(vouchers.into_iter().map(VoucherResponse::from).collect())
    }

    pub async fn get(&self, actor: &Actor, id: i64) -> Result<VoucherResponse, AppError> {
        let voucher = self.visible_voucher(actor, id).await?;

        Ok(voucher.into())
    }

    pub async fn logs(&self, actor: &Actor, id: i64) -> Result<Vec<VoucherStatusLog>, AppError> {
        self.visible_voucher(actor, id).await?;

        self.logs.list_for_voucher(id).await
    }

    pub async fn update_status(
        &self,
        actor: &Actor,
        id: i64,
        request: UpdateVoucherStatusRequest,
    ) -> Result<ApiResponse<VoucherResponse>, AppError> {
        request.validate()?;

        let ctx = TransitionContext::primary_view(request.pod_image_path.is_some());
        let voucher = self
            .apply_status_change(
                actor,
                id,
                request.status,
                request.note.as_deref(),
                request.pod_image_path.as_deref(),
                &ctx,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            voucher.into(),
            "Voucher status updated".to_string(),
        ))
    }

    /// Bulk path: the creator shortcut does not apply here, and each
    /// voucher is updated in its own transaction so one denied row
    /// does not roll back the rest.
    pub async fn bulk_update_status(
        &self,
        actor: &Actor,
        request: BulkStatusRequest,
    ) -> Result<BulkStatusResponse, AppError> {
        request.validate()?;

        let ctx = TransitionContext::bulk_update();
        let mut outcomes = Vec::with_capacity(request.voucher_ids.len());
        let mut updated = 0;

        for voucher_id in &request.voucher_ids {
            match self
                .apply_status_change(
                    actor,
                    *voucher_id,
                    request.status,
                    request.note.as_deref(),
                    None,
                    &ctx,
                )
                .await
            {
                Ok(_) => {
                    updated += 1;
                    outcomes.push(BulkStatusOutcome {
                        voucher_id: *voucher_id,
                        updated: true,
                        error: None,
                    });
                }
                Err(AppError::Database(e)) => return Err(AppError::Database(e)),
                Err(e) => outcomes.push(BulkStatusOutcome {
                    voucher_id: *voucher_id,
                    updated: false,
                    error: Some(e.to_string()),
                }),
            }
        }

        Ok(BulkStatusResponse {
            updated,
            skipped: outcomes.len() - updated,
            outcomes,
        })
    }

    /// One status change: lock the row, check visibility, check the
    /// transition, then write the new status and its audit log entry
    /// atomically.
    async fn apply_status_change(
        &self,
        actor: &Actor,
        id: i64,
        status: VoucherStatus,
        note: Option<&str>,
        pod_image_path: Option<&str>,
        ctx: &TransitionContext,
    ) -> Result<Voucher, AppError> {
        let mut tx = self.pool.begin().await?;

        let voucher = VoucherRepository::find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| not_found_error("Voucher", id))?;

        let consignment = self.voucher_consignment(&voucher).await?;

        let scope = voucher_scope(actor);
        if !scope.allows(&voucher, consignment.as_ref()) {
            // Invisible rows are reported as missing, not forbidden
            return Err(not_found_error("Voucher", id));
        }

        let decision = check_voucher_transition(
            actor,
            &voucher,
            consignment.as_ref(),
            status,
            ctx,
            &self.policy,
        );
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
            Some(voucher.status.as_str()),
            status.as_str(),
            note,
        );
        let notes = append_note(&voucher.notes, &block);

        let updated =
            VoucherRepository::update_status(&mut tx, id, status, &notes, pod_image_path).await?;

        StatusLogRepository::insert_voucher_log(
            &mut tx,
            id,
            Some(voucher.status),
            status,
            note,
            actor.id,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            voucher = id,
            from = voucher.status.as_str(),
            to = status.as_str(),
            actor = actor.id,
            "voucher status changed"
        );

        Ok(updated)
    }

    async fn visible_voucher(&self, actor: &Actor, id: i64) -> Result<Voucher, AppError> {
        let voucher = self
            .vouchers
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Voucher", id))?;

        let consignment = self.voucher_consignment(&voucher).await?;

        let scope = voucher_scope(actor);
        if !scope.allows(&voucher, consignment.as_ref()) {
            return Err(not_found_error("Voucher", id));
        }

        Ok(voucher)
    }

    async fn voucher_consignment(
        &self,
        voucher: &Voucher,
    ) -> Result<Option<Consignment>, AppError> {
        match voucher.consignment_id {
            Some(consignment_id) => self.consignments.find_by_id(consignment_id).await,
            None => Ok(None),
        }
    }
}
