//! Region model
//!
//! Reference entity: every voucher travels between two regions, and
//! each region owns the sequence counter used for its voucher codes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Region - maps exactly to the regions table.
/// `last_sequence` is only ever mutated through the atomic allocator
/// in `RegionRepository::allocate_sequence`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Region {
    pub id: i64,
    pub name: String,
    pub code_prefix: String,
    pub last_sequence: i64,
    pub price_per_kg: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
