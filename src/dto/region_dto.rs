use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::region::Region;

/// Request to create a new region
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRegionRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    /// Uppercase prefix used in voucher codes, e.g. "MAN"
    #[validate(length(min = 2, max = 5))]
    pub code_prefix: String,

    pub price_per_kg: Decimal,
}

/// Region response for the API (counter excluded)
#[derive(Debug, Serialize)]
pub struct RegionResponse {
    pub id: i64,
    pub name: String,
    pub code_prefix: String,
    pub price_per_kg: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Region> for RegionResponse {
    fn from(r: Region) -> Self {
        Self {
            id: r.id,
            name: r.name,
            code_prefix: r.code_prefix,
            price_per_kg: r.price_per_kg,
            active: r.active,
            created_at: r.created_at,
        }
    }
}
