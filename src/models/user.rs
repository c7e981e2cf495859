//! User and actor model
//!
//! Staff, admin and driver accounts. Role and home region together
//! determine visibility and transition permissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// System roles - maps to the ENUM user_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Myanmar,
    Malay,
    Staff,
    Driver,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Myanmar => "myanmar",
            UserRole::Malay => "malay",
            UserRole::Staff => "staff",
            UserRole::Driver => "driver",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "myanmar" => Some(UserRole::Myanmar),
            "malay" => Some(UserRole::Malay),
            "staff" => Some(UserRole::Staff),
            "driver" => Some(UserRole::Driver),
            _ => None,
        }
    }

    /// Regional roles are scoped to a home region
    pub fn is_regional(&self) -> bool {
        matches!(self, UserRole::Myanmar | UserRole::Malay)
    }
}

/// User - maps exactly to the users table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    pub region_id: Option<i64>,
    pub currency: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// The authenticated caller of a request, extracted from JWT claims.
/// Passed explicitly into the transition validator and visibility
/// filter instead of being read from ambient session state.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    pub region_id: Option<i64>,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_driver(&self) -> bool {
        self.role == UserRole::Driver
    }

    /// Home region of a regional staff actor, if any
    pub fn home_region(&self) -> Option<i64> {
        if self.role.is_regional() {
            self.region_id
        } else {
            None
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            region_id: user.region_id,
        }
    }
}
