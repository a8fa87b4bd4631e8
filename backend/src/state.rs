//! Application state management
//!
//! Shared state passed to every request handler via Axum's state
//! extraction. All fields are cheap to clone.

use crate::auth::JwtService;
use crate::clock::{SharedClock, SystemClock};
use crate::config::AppConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Time source for every service timestamp
    pub clock: SharedClock,
    /// Prometheus render handle; `None` when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state backed by the wall clock
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        Self::with_clock(db, config, Arc::new(SystemClock))
    }

    /// Create state with an explicit clock
    pub fn with_clock(db: PgPool, config: AppConfig, clock: SharedClock) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry_secs);

        Self {
            db,
            config: Arc::new(config),
            jwt,
            clock,
            metrics: None,
        }
    }

    /// Attach the Prometheus handle served on `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }
}
