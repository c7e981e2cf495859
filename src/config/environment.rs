//! Environment configuration
//!
//! This module handles environment variables and runtime configuration.

use std::env;

/// Width of the zero-padded sequence part of voucher codes.
/// Codes are strictly increasing per prefix as long as this width
/// is never exceeded, so it must not be lowered once in production.
pub const DEFAULT_VOUCHER_CODE_WIDTH: usize = 7;

/// Environment configuration
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub voucher_code_width: usize,
    pub consignment_prefix: String,
    pub strict_transitions: bool,
}

impl EnvironmentConfig {
    /// Load configuration from environment variables.
    /// JWT_SECRET is the only variable without a fallback.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            jwt_expiration: env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()?,
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string())
                .collect(),
            voucher_code_width: env::var("VOUCHER_CODE_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_VOUCHER_CODE_WIDTH),
            consignment_prefix: env::var("CONSIGNMENT_PREFIX")
                .unwrap_or_else(|_| "CON".to_string()),
            strict_transitions: env::var("STRICT_TRANSITIONS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "test".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiration: 86400,
            cors_origins: Vec::new(),
            voucher_code_width: DEFAULT_VOUCHER_CODE_WIDTH,
            consignment_prefix: "CON".to_string(),
            strict_transitions: false,
        }
    }
}
