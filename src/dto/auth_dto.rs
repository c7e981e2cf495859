use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::UserRole;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 2, max = 100))]
    pub username: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

/// Login response with the issued token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthenticatedUser,
}

/// The authenticated user, without credentials
#[derive(Debug, Serialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub region_id: Option<i64>,
    pub currency: String,
}
