use sqlx::{PgPool, Postgres, Transaction};

use crate::models::consignment::ConsignmentStatus;
use crate::models::status_log::{ConsignmentStatusLog, VoucherStatusLog};
use crate::models::voucher::VoucherStatus;
use crate::utils::errors::AppResult;

/// Append-only writes to the status history tables.
///
/// Inserts take the caller's open transaction: a failed log write
/// fails the enclosing status update, never the other way around. The
/// legacy system sometimes logged outside the transaction and dropped
/// logger errors; here the audit trail and the status write commit or
/// roll back together.
pub struct StatusLogRepository {
    pool: PgPool,
}

impl StatusLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_voucher_log(
        tx: &mut Transaction<'_, Postgres>,
        voucher_id: i64,
        old_status: Option<VoucherStatus>,
        new_status: VoucherStatus,
        note: Option<&str>,
        actor_id: i64,
    ) -> AppResult<VoucherStatusLog> {
        let entry = sqlx::query_as::<_, VoucherStatusLog>(
            r#"
            INSERT INTO voucher_status_logs (voucher_id, old_status, new_status, note, actor_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(voucher_id)
        .bind(old_status)
        .bind(new_status)
        .bind(note)
        .bind(actor_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(entry)
    }

    pub async fn insert_consignment_log(
        tx: &mut Transaction<'_, Postgres>,
        consignment_id: i64,
        old_status: Option<ConsignmentStatus>,
        new_status: ConsignmentStatus,
        note: Option<&str>,
        actor_id: i64,
    ) -> AppResult<ConsignmentStatusLog> {
        let entry = sqlx::query_as::<_, ConsignmentStatusLog>(
            r#"
            INSERT INTO consignment_status_logs (consignment_id, old_status, new_status, note, actor_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(consignment_id)
        .bind(old_status)
        .bind(new_status)
        .bind(note)
        .bind(actor_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(entry)
    }

    pub async fn list_for_voucher(
        &self,
        voucher_id: i64,
    ) -> AppResult<Vec<VoucherStatusLog>> {
        let entries = sqlx::query_as::<_, VoucherStatusLog>(
            "SELECT * FROM voucher_status_logs WHERE voucher_id = $1 ORDER BY created_at",
        )
        .bind(voucher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn list_for_consignment(
        &self,
        consignment_id: i64,
    ) -> AppResult<Vec<ConsignmentStatusLog>> {
        let entries = sqlx::query_as::<_, ConsignmentStatusLog>(
            "SELECT * FROM consignment_status_logs WHERE consignment_id = $1 ORDER BY created_at",
        )
        .bind(consignment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
