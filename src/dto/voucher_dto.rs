use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::voucher::{DeliveryType, PaymentMethod, Voucher, VoucherStatus};

/// Request to create a new voucher
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVoucherRequest {
    #[validate(length(min = 2, max = 100))]
    pub sender_name: String,

    #[validate(length(min = 4, max = 20))]
    pub sender_phone: String,

    #[validate(length(min = 5, max = 500))]
    pub sender_address: String,

    #[validate(length(min = 2, max = 100))]
    pub receiver_name: String,

    #[validate(length(min = 4, max = 20))]
    pub receiver_phone: String,

    #[validate(length(min = 5, max = 500))]
    pub receiver_address: String,

    pub weight_kg: Decimal,

    #[validate(length(min = 3, max = 3))]
    pub currency: String,

    pub total_amount: Decimal,

    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,

    pub origin_region_id: i64,
    pub destination_region_id: i64,

    pub driver_id: Option<i64>,

    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

/// Request to change a voucher's status
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVoucherStatusRequest {
    pub status: VoucherStatus,

    #[validate(length(max = 1000))]
    pub note: Option<String>,

    /// Stored path of the proof-of-delivery image, supplied by the
    /// upload collaborator
    #[validate(length(max = 500))]
    pub pod_image_path: Option<String>,
}

/// Request to change status of several vouchers at once
#[derive(Debug, Deserialize, Validate)]
pub struct BulkStatusRequest {
    #[validate(length(min = 1, max = 200))]
    pub voucher_ids: Vec<i64>,

    pub status: VoucherStatus,

    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

/// Per-voucher outcome of a bulk status update
#[derive(Debug, Serialize)]
pub struct BulkStatusOutcome {
    pub voucher_id: i64,
    pub updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for a bulk status update
#[derive(Debug, Serialize)]
pub struct BulkStatusResponse {
    pub updated: usize,
    pub skipped: usize,
    pub outcomes: Vec<BulkStatusOutcome>,
}

/// Query parameters for voucher listing
#[derive(Debug, Deserialize)]
pub struct VoucherListQuery {
    pub status: Option<VoucherStatus>,
}

/// Voucher response for the API
#[derive(Debug, Serialize)]
pub struct VoucherResponse {
    pub id: i64,
    pub code: String,
    pub sender_name: String,
    pub sender_phone: String,
    pub sender_address: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub receiver_address: String,
    pub weight_kg: Decimal,
    pub currency: String,
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub delivery_type: DeliveryType,
    pub status: VoucherStatus,
    pub status_label: String,
    pub notes: String,
    pub origin_region_id: i64,
    pub destination_region_id: i64,
    pub consignment_id: Option<i64>,
    pub driver_id: Option<i64>,
    pub pod_image_path: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Voucher> for VoucherResponse {
    fn from(v: Voucher) -> Self {
        Self {
            id: v.id,
            code: v.code,
            sender_name: v.sender_name,
            sender_phone: v.sender_phone,
            sender_address: v.sender_address,
            receiver_name: v.receiver_name,
            receiver_phone: v.receiver_phone,
            receiver_address: v.receiver_address,
            weight_kg: v.weight_kg,
            currency: v.currency,
            total_amount: v.total_amount,
            payment_method: v.payment_method,
            delivery_type: v.delivery_type,
            status_label: v.status.as_str().to_string(),
            status: v.status,
            notes: v.notes,
            origin_region_id: v.origin_region_id,
            destination_region_id: v.destination_region_id,
            consignment_id: v.consignment_id,
            driver_id: v.driver_id,
            pod_image_path: v.pod_image_path,
            created_by: v.created_by,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}
