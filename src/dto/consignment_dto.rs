use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::consignment::{Consignment, ConsignmentStatus};

/// Request to create a new consignment
#[derive(Debug, Deserialize, Validate)]
pub struct CreateConsignmentRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    pub driver_id: Option<i64>,

    #[validate(length(max = 500))]
    pub route: Option<String>,

    pub expected_delivery_date: Option<NaiveDate>,

    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

/// Request to change a consignment's status
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateConsignmentStatusRequest {
    pub status: ConsignmentStatus,

    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

/// Request to attach vouchers to a consignment
#[derive(Debug, Deserialize, Validate)]
pub struct AttachVouchersRequest {
    #[validate(length(min = 1, max = 200))]
    pub voucher_ids: Vec<i64>,
}

/// Consignment response for the API
#[derive(Debug, Serialize)]
pub struct ConsignmentResponse {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub driver_id: Option<i64>,
    pub route: Option<String>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub status: ConsignmentStatus,
    pub status_label: String,
    pub notes: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Consignment> for ConsignmentResponse {
    fn from(c: Consignment) -> Self {
        Self {
            id: c.id,
            code: c.code,
            name: c.name,
            driver_id: c.driver_id,
            route: c.route,
            expected_delivery_date: c.expected_delivery_date,
            status_label: c.status.as_str().to_string(),
            status: c.status,
            notes: c.notes,
            created_by: c.created_by,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
