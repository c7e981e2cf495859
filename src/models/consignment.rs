//! Consignment model
//!
//! A consignment batches vouchers onto one driver/route. Vouchers can
//! be attached and detached while the consignment is still open.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Consignment lifecycle - maps to the ENUM consignment_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "consignment_status", rename_all = "snake_case")]
pub enum ConsignmentStatus {
    Pending,
    Departed,
    InTransit,
    ArrivedAtHub,
    OutForDelivery,
    Completed,
    Cancelled,
}

impl ConsignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsignmentStatus::Pending => "Pending",
            ConsignmentStatus::Departed => "Departed",
            ConsignmentStatus::InTransit => "In Transit",
            ConsignmentStatus::ArrivedAtHub => "Arrived at Hub",
            ConsignmentStatus::OutForDelivery => "Out for Delivery",
            ConsignmentStatus::Completed => "Completed",
            ConsignmentStatus::Cancelled => "Cancelled",
        }
    }

    /// Closed consignments accept no membership changes
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            ConsignmentStatus::Completed | ConsignmentStatus::Cancelled
        )
    }
}

impl std::fmt::Display for ConsignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consignment - maps exactly to the consignments table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Consignment {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub driver_id: Option<i64>,
    pub route: Option<String>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub status: ConsignmentStatus,
    pub notes: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
