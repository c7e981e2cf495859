//! Voucher model
//!
//! A voucher is a single shipment order between an origin and a
//! destination region. Vouchers are never hard-deleted; terminal
//! states are status flags only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Voucher lifecycle - maps to the ENUM voucher_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "voucher_status", rename_all = "snake_case")]
pub enum VoucherStatus {
    Pending,
    InTransit,
    Delivered,
    Received,
    Cancelled,
    Returned,
}

impl VoucherStatus {
    /// Human-readable label, used in log notes and responses
    pub fn as_str(&self) -> &'static str {
        match self {
            VoucherStatus::Pending => "Pending",
            VoucherStatus::InTransit => "In Transit",
            VoucherStatus::Delivered => "Delivered",
            VoucherStatus::Received => "Received",
            VoucherStatus::Cancelled => "Cancelled",
            VoucherStatus::Returned => "Returned",
        }
    }

    /// Terminal states are never left under the strict policy
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VoucherStatus::Delivered | VoucherStatus::Cancelled | VoucherStatus::Returned
        )
    }
}

impl std::fmt::Display for VoucherStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment method - maps to the ENUM payment_method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    CashOnDelivery,
}

/// Delivery type - maps to the ENUM delivery_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "delivery_type", rename_all = "snake_case")]
pub enum DeliveryType {
    HomeDelivery,
    HubPickup,
}

/// Voucher - maps exactly to the vouchers table.
/// `code` is minted once at creation and is immutable afterwards.
/// `notes` is a projection of the structured status log, kept for
/// display only; the log table is the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Voucher {
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
