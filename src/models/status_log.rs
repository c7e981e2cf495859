//! Status history models
//!
//! Append-only audit records, one row per status transition.
//! `old_status` is NULL for the creation entry. Rows are never
//! updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::consignment::ConsignmentStatus;
use super::voucher::VoucherStatus;

/// Audit record for a voucher status change
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VoucherStatusLog {
    pub id: i64,
    pub voucher_id: i64,
    pub old_status: Option<VoucherStatus>,
    pub new_status: VoucherStatus,
    pub note: Option<String>,
    pub actor_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Audit record for a consignment status change
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConsignmentStatusLog {
    pub id: i64,
    pub consignment_id: i64,
    pub old_status: Option<ConsignmentStatus>,
    pub new_status: ConsignmentStatus,
    pub note: Option<String>,
    pub actor_id: i64,
    pub created_at: DateTime<Utc>,
}
