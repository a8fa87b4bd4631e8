//! Hydration tracking service
//!
//! Water intake logging, daily progress toward the user's goal and a
//! per-day history. Users without a goal of their own are measured against
//! [`DEFAULT_DAILY_GOAL_ML`].

use crate::clock::Clock;
use crate::error::ApiError;
use crate::repositories::{
    CreateWaterIntake, HydrationGoalRepository, WaterIntakeRecord, WaterIntakeRepository,
};
use crate::services::ensure_user;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;
use workout_tracker_shared::types::LogWaterRequest;
use workout_tracker_shared::validation::{validate_hydration_goal, validate_water_amount};

/// Daily goal applied until the user sets one (about ten cups)
pub const DEFAULT_DAILY_GOAL_ML: i32 = 2500;

/// Longest history window served in one request
pub const MAX_HISTORY_DAYS: i64 = 366;

const DEFAULT_BEVERAGE: &str = "water";

/// Effective daily goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationGoal {
    pub daily_goal_ml: i32,
    pub is_custom: bool,
}

/// Progress for one day
#[derive(Debug, Clone)]
pub struct DailyHydration {
    pub date: NaiveDate,
    pub total_ml: i64,
    pub goal_ml: i32,
    pub progress_percent: f64,
    pub goal_met: bool,
    pub entry_count: i64,
    pub entries: Vec<WaterIntakeRecord>,
}

/// Hydration service
pub struct HydrationService;

impl HydrationService {
    pub async fn log_water(
        pool: &PgPool,
        user_id: Uuid,
        request: LogWaterRequest,
        clock: &dyn Clock,
    ) -> Result<WaterIntakeRecord, ApiError> {
        validate_water_amount(request.amount_ml).map_err(ApiError::Validation)?;

        let mut conn = pool.acquire().await?;
        ensure_user(&mut conn, user_id).await?;

        let entry = WaterIntakeRepository::create(
            &mut conn,
            CreateWaterIntake {
                user_id,
                amount_ml: request.amount_ml,
                beverage_type: request
                    .beverage_type
                    .unwrap_or_else(|| DEFAULT_BEVERAGE.to_string()),
                consumed_at: request.consumed_at.unwrap_or_else(|| clock.now()),
                notes: request.notes,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        debug!(user_id = %user_id, amount_ml = entry.amount_ml, "Water intake logged");
        Ok(entry)
    }

    /// Entries and progress for one UTC day
    pub async fn get_daily_summary(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailyHydration, ApiError> {
        let mut conn = pool.acquire().await?;
        let goal = Self::effective_goal(&mut conn, user_id).await?;
        let entries = WaterIntakeRepository::get_by_date(&mut conn, user_id, date)
            .await
            .map_err(ApiError::Internal)?;

        let total_ml: i64 = entries.iter().map(|e| i64::from(e.amount_ml)).sum();

        Ok(DailyHydration {
            date,
            total_ml,
            goal_ml: goal.daily_goal_ml,
            progress_percent: progress_percent(total_ml, goal.daily_goal_ml),
            goal_met: is_goal_met(total_ml, goal.daily_goal_ml),
            entry_count: entries.len() as i64,
            entries,
        })
    }

    /// Daily totals over an inclusive range, newest first. Every day is
    /// measured against the current goal.
    pub async fn get_history(
        pool: &PgPool,
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyHydration>, ApiError> {
        if start_date > end_date {
            return Err(ApiError::Validation(
                "start_date must not be after end_date".to_string(),
            ));
        }
        if (end_date - start_date).num_days() >= MAX_HISTORY_DAYS {
            return Err(ApiError::Validation(format!(
                "History is limited to {} days",
                MAX_HISTORY_DAYS
            )));
        }

        let mut conn = pool.acquire().await?;
        let goal = Self::effective_goal(&mut conn, user_id).await?;
        let totals =
            WaterIntakeRepository::get_daily_totals(&mut conn, user_id, start_date, end_date)
                .await
                .map_err(ApiError::Internal)?;

        Ok(totals
            .into_iter()
            .map(|day| DailyHydration {
                date: day.date,
                total_ml: day.total_ml,
                goal_ml: goal.daily_goal_ml,
                progress_percent: progress_percent(day.total_ml, goal.daily_goal_ml),
                goal_met: is_goal_met(day.total_ml, goal.daily_goal_ml),
                entry_count: day.entry_count,
                entries: Vec::new(),
            })
            .collect())
    }

    pub async fn get_goal(pool: &PgPool, user_id: Uuid) -> Result<HydrationGoal, ApiError> {
        let mut conn = pool.acquire().await?;
        Self::effective_goal(&mut conn, user_id).await
    }

    pub async fn set_goal(
        pool: &PgPool,
        user_id: Uuid,
        daily_goal_ml: i32,
        clock: &dyn Clock,
    ) -> Result<HydrationGoal, ApiError> {
        validate_hydration_goal(daily_goal_ml).map_err(ApiError::Validation)?;

        let mut conn = pool.acquire().await?;
        ensure_user(&mut conn, user_id).await?;

        let record = HydrationGoalRepository::upsert(&mut conn, user_id, daily_goal_ml, clock.now())
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, daily_goal_ml = record.daily_goal_ml, "Hydration goal set");
        Ok(HydrationGoal {
            daily_goal_ml: record.daily_goal_ml,
            is_custom: true,
        })
    }

    pub async fn delete_entry(
        pool: &PgPool,
        user_id: Uuid,
        entry_id: Uuid,
    ) -> Result<(), ApiError> {
        let mut conn = pool.acquire().await?;
        let deleted = WaterIntakeRepository::delete(&mut conn, entry_id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Water intake entry not found".to_string()));
        }
        Ok(())
    }

    async fn effective_goal(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<HydrationGoal, ApiError> {
        let record = HydrationGoalRepository::get_by_user(conn, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(match record {
            Some(record) => HydrationGoal {
                daily_goal_ml: record.daily_goal_ml,
                is_custom: true,
            },
            None => HydrationGoal {
                daily_goal_ml: DEFAULT_DAILY_GOAL_ML,
                is_custom: false,
            },
        })
    }
}

/// Share of the goal consumed, one decimal place; may exceed 100
pub fn progress_percent(consumed_ml: i64, goal_ml: i32) -> f64 {
    if goal_ml <= 0 {
        return 0.0;
    }
    let raw = consumed_ml as f64 / f64::from(goal_ml) * 100.0;
    (raw * 10.0).round() / 10.0
}

pub fn is_goal_met(consumed_ml: i64, goal_ml: i32) -> bool {
    goal_ml > 0 && consumed_ml >= i64::from(goal_ml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 2500, 0.0)]
    #[case(1250, 2500, 50.0)]
    #[case(2500, 2500, 100.0)]
    #[case(1000, 3000, 33.3)]
    #[case(3000, 2500, 120.0)]
    #[case(500, 0, 0.0)]
    fn test_progress_percent(#[case] consumed: i64, #[case] goal: i32, #[case] expected: f64) {
        assert_eq!(progress_percent(consumed, goal), expected);
    }

    proptest! {
        #[test]
        fn prop_goal_met_exactly_at_goal(goal in 1i32..20_000, extra in 0i64..5_000) {
            let goal_total = i64::from(goal);
            prop_assert!(is_goal_met(goal_total + extra, goal));
            prop_assert!(!is_goal_met(goal_total - 1, goal));
        }

        #[test]
        fn prop_progress_agrees_with_goal_met(consumed in 0i64..30_000, goal in 1i32..20_000) {
            if is_goal_met(consumed, goal) {
                prop_assert!(progress_percent(consumed, goal) >= 100.0);
            }
        }
    }

    #[test]
    fn test_zero_goal_is_never_met() {
        assert!(!is_goal_met(10_000, 0));
    }
}
