//! Login handling
//!
//! Thin identity layer: verifies credentials and issues the JWT the
//! rest of the system reads the actor from. Authentication mechanics
//! beyond this are out of scope.

use validator::Validate;

use crate::dto::auth_dto::{AuthenticatedUser, LoginRequest, LoginResponse};
use crate::repositories::user_repository::UserRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::generate_token;

pub struct AuthController {
    users: UserRepository,
    state: AppState,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: UserRepository::new(state.pool.clone()),
            state: state.clone(),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let user = self
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !user.active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        let valid = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;
        if !valid {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let token = generate_token(&user, &self.state.config)?;

        tracing::info!(user = user.id, "user logged in");

        Ok(LoginResponse {
            token,
            user: AuthenticatedUser {
                id: user.id,
                username: user.username,
                full_name: user.full_name,
                role: user.role,
                region_id: user.region_id,
                currency: user.currency,
            },
        })
    }
}
