//! Route definitions for the Workout Tracker API
//!
//! This module organizes all API routes and applies middleware.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

mod achievements;
mod exercise;
mod goals;
mod health;
mod hydration;
mod nutrition;
mod stats;
mod workout;


pub use achievements::achievement_routes;
pub use exercise::exercise_routes;
pub use goals::goals_routes;
pub use hydration::hydration_routes;
pub use nutrition::nutrition_routes;
pub use stats::stats_routes;
pub use workout::workout_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(health::metrics))
        .nest("/api/v1", api_routes())
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Workout Tracker API v1" }))
        .nest("/exercises", exercise::exercise_routes())
        .nest("/workouts", workout::workout_routes())
        .nest("/goals", goals::goals_routes())
        .nest("/nutrition", nutrition::nutrition_routes())
        .nest("/hydration", hydration::hydration_routes())
        .nest("/stats", stats::stats_routes())
        .nest("/achievements", achievements::achievement_routes())
}

/// Parse a path id, naming the resource in the error
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation(format!("Invalid {} ID", resource)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "goal").unwrap(), id);

        match parse_id("not-a-uuid", "goal") {
            Err(ApiError::Validation(msg)) => assert_eq!(msg, "Invalid goal ID"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
