//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories. Ownership is checked here, never in the repositories.

pub mod achievements;
pub mod estimator;
pub mod exercise;
pub mod goals;
pub mod hydration;
pub mod nutrition;
pub mod statistics;
pub mod workout;

pub use achievements::AchievementService;
pub use exercise::ExerciseService;
pub use goals::GoalsService;
pub use hydration::HydrationService;
pub use nutrition::NutritionService;
pub use statistics::StatisticsService;
pub use workout::WorkoutService;

use crate::error::ApiError;
use crate::repositories::UserRepository;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

/// Reject callers whose token names a user this service has never seen
pub(crate) async fn ensure_user(conn: &mut PgConnection, user_id: Uuid) -> Result<(), ApiError> {
    let exists = UserRepository::exists(conn, user_id)
        .await
        .map_err(ApiError::Internal)?;
    if exists {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("Unknown user".to_string()))
    }
}

pub(crate) fn decimal_from_f64(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default().round_dp(2)
}

pub(crate) fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_round_trip_keeps_two_places() {
        assert_eq!(decimal_from_f64(102.456), Decimal::new(10246, 2));
        assert_eq!(decimal_to_f64(Decimal::new(8050, 2)), 80.5);
        assert_eq!(decimal_from_f64(f64::NAN), Decimal::ZERO);
    }
}
