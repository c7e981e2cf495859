//! Shared application state
//!
//! Passed through the axum router to every handler. Holds only the
//! connection pool and configuration; business data is never cached
//! across requests.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::transitions::TransitionPolicy;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self { pool, config }
    }

    /// Transition policy selected by configuration. Permissive is the
    /// legacy-faithful default; strict mode is opt-in.
    pub fn transition_policy(&self) -> TransitionPolicy {
        if self.config.strict_transitions {
            TransitionPolicy::strict()
        } else {
            TransitionPolicy::permissive()
        }
    }
}
