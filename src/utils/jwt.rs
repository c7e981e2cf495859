//! JWT utilities
//!
//! Token minting and the `Actor` request extractor. The token carries
//! everything the transition validator and visibility filter need
//! (id, role, home region), so request handlers never touch session
//! state.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    config::environment::EnvironmentConfig,
    models::user::{Actor, User, UserRole},
    state::AppState,
    utils::errors::AppError,
};

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String, // user id
    pub username: String,
    pub role: String,
    pub region_id: Option<i64>,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at timestamp
}

/// Generate a JWT token for a user
pub fn generate_token(user: &User, config: &EnvironmentConfig) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.jwt_expiration as i64);

    let claims = JwtClaims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: user.role.as_str().to_string(),
        region_id: user.region_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generating token: {}", e)))
}

/// Verify and decode a JWT token
pub fn verify_token(token: &str, config: &EnvironmentConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}

/// Turn verified claims into the request actor
pub fn actor_from_claims(claims: &JwtClaims) -> Result<Actor, AppError> {
    let id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Jwt("Invalid subject in token".to_string()))?;
    let role = UserRole::from_str(&claims.role)
        .ok_or_else(|| AppError::Jwt(format!("Unknown role '{}' in token", claims.role)))?;

    Ok(Actor {
        id,
        username: claims.username.clone(),
        role,
        region_id: claims.region_id,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Expected a Bearer token".to_string()))?;

        let claims = verify_token(token, &state.config)?;
        actor_from_claims(&claims)
    }
}
