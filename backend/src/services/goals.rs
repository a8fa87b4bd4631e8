//! Goals service for goal setting and progress tracking
//!
//! Provides business logic for:
//! - Goal creation and management
//! - Progress logging with automatic activation and completion
//! - Score recomputation and achievement evaluation on every change

use crate::clock::Clock;
use crate::config::ScoringConfig;
use crate::error::ApiError;
use crate::repositories::{
    CreateGoal, GoalProgressRepository, GoalRecord, GoalRepository, SaveGoal, UserScoreRecord,
};
use crate::services::achievements::{AchievementService, UnlockedAchievement};
use crate::services::statistics::StatisticsService;
use crate::services::{decimal_from_f64, decimal_to_f64, ensure_user};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;
use workout_tracker_shared::types::{
    CreateGoalRequest, LogGoalProgressRequest, UpdateGoalRequest,
};
use workout_tracker_shared::validation::{validate_positive_amount, validate_priority};
use workout_tracker_shared::GoalStatus;

/// Goal after a mutation, with the score it produced
#[derive(Debug, Clone)]
pub struct GoalUpdate {
    pub goal: GoalRecord,
    pub score: UserScoreRecord,
    pub unlocked: Vec<UnlockedAchievement>,
}

/// Progress state of a goal, as numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    pub current: f64,
    pub target: f64,
    pub status: GoalStatus,
}

/// Goals service
pub struct GoalsService;

impl GoalsService {
    /// Create a new goal; goals start as not_started
    pub async fn create_goal(
        pool: &PgPool,
        user_id: Uuid,
        request: CreateGoalRequest,
    ) -> Result<GoalRecord, ApiError> {
        validate_positive_amount(request.target_value, "target_value").map_err(ApiError::Validation)?;
        validate_priority(request.priority).map_err(ApiError::Validation)?;

        let mut conn = pool.acquire().await?;
        ensure_user(&mut conn, user_id).await?;

        let goal = GoalRepository::create(
            &mut conn,
            CreateGoal {
                user_id,
                title: request.title,
                description: request.description,
                category: request.category,
                target_value: decimal_from_f64(request.target_value),
                unit: request.unit,
                target_date: request.target_date,
                priority: request.priority,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, goal_id = %goal.id, "Goal created");
        Ok(goal)
    }

    /// List goals, optionally filtered
    pub async fn get_goals(
        pool: &PgPool,
        user_id: Uuid,
        status: Option<GoalStatus>,
        category: Option<&str>,
    ) -> Result<Vec<GoalRecord>, ApiError> {
        let mut conn = pool.acquire().await?;
        GoalRepository::get_by_user(&mut conn, user_id, status.map(|s| s.as_str()), category)
            .await
            .map_err(ApiError::Internal)
    }

    /// Get a single goal
    pub async fn get_goal(pool: &PgPool, user_id: Uuid, goal_id: Uuid) -> Result<GoalRecord, ApiError> {
        let mut conn = pool.acquire().await?;
        GoalRepository::get_by_id(&mut conn, goal_id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Goal not found".to_string()))
    }

    /// Update a goal. Entering `completed` stamps `completed_at`; leaving it
    /// clears the stamp. The score is recomputed in the same transaction.
    pub async fn update_goal(
        pool: &PgPool,
        user_id: Uuid,
        goal_id: Uuid,
        request: UpdateGoalRequest,
        scoring: &ScoringConfig,
        clock: &dyn Clock,
    ) -> Result<GoalUpdate, ApiError> {
        if let Some(priority) = request.priority {
            validate_priority(priority).map_err(ApiError::Validation)?;
        }
        if let Some(target) = request.target_value {
            validate_positive_amount(target, "target_value").map_err(ApiError::Validation)?;
        }

        let mut tx = pool.begin().await?;
        let goal = Self::lock_owned(&mut tx, user_id, goal_id).await?;
        let current_status = Self::status_of(&goal)?;
        let next_status = request.status.unwrap_or(current_status);

        let save = SaveGoal {
            title: request.title.unwrap_or_else(|| goal.title.clone()),
            description: request.description.or_else(|| goal.description.clone()),
            target_value: request
                .target_value
                .map(decimal_from_f64)
                .unwrap_or(goal.target_value),
            current_value: goal.current_value,
            target_date: request.target_date.or(goal.target_date),
            priority: request.priority.unwrap_or(goal.priority),
            status: next_status.as_str().to_string(),
            completed_at: completed_at_for(next_status, goal.completed_at, clock.now()),
        };

        let goal = GoalRepository::save(&mut tx, goal_id, &save)
            .await
            .map_err(ApiError::Internal)?;
        let update = Self::rescore(&mut tx, user_id, goal, scoring, clock).await?;
        tx.commit().await?;

        if next_status != current_status {
            info!(
                user_id = %user_id,
                goal_id = %goal_id,
                from = %current_status,
                to = %next_status,
                "Goal status changed"
            );
        }
        Ok(update)
    }

    /// Log progress toward a goal
    pub async fn log_progress(
        pool: &PgPool,
        user_id: Uuid,
        goal_id: Uuid,
        request: LogGoalProgressRequest,
        scoring: &ScoringConfig,
        clock: &dyn Clock,
    ) -> Result<GoalUpdate, ApiError> {
        validate_positive_amount(request.amount, "amount").map_err(ApiError::Validation)?;

        let mut tx = pool.begin().await?;
        let goal = Self::lock_owned(&mut tx, user_id, goal_id).await?;
        let status = Self::status_of(&goal)?;

        let progress = apply_progress(
            GoalProgress {
                current: decimal_to_f64(goal.current_value),
                target: decimal_to_f64(goal.target_value),
                status,
            },
            request.amount,
        )?;

        let now = clock.now();
        GoalProgressRepository::create(
            &mut tx,
            goal_id,
            user_id,
            decimal_from_f64(request.amount),
            request.note.as_deref(),
            now,
        )
        .await
        .map_err(ApiError::Internal)?;

        let save = SaveGoal {
            title: goal.title.clone(),
            description: goal.description.clone(),
            target_value: goal.target_value,
            current_value: goal.current_value + decimal_from_f64(request.amount),
            target_date: goal.target_date,
            priority: goal.priority,
            status: progress.status.as_str().to_string(),
            completed_at: completed_at_for(progress.status, goal.completed_at, now),
        };

        let goal = GoalRepository::save(&mut tx, goal_id, &save)
            .await
            .map_err(ApiError::Internal)?;
        let update = Self::rescore(&mut tx, user_id, goal, scoring, clock).await?;
        tx.commit().await?;

        if progress.status == GoalStatus::Completed {
            info!(user_id = %user_id, goal_id = %goal_id, "Goal completed");
        }
        Ok(update)
    }

    /// Delete a goal; the score no longer counts it afterwards
    pub async fn delete_goal(
        pool: &PgPool,
        user_id: Uuid,
        goal_id: Uuid,
        scoring: &ScoringConfig,
        clock: &dyn Clock,
    ) -> Result<(), ApiError> {
        let mut tx = pool.begin().await?;
        let deleted = GoalRepository::delete(&mut tx, goal_id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Goal not found".to_string()));
        }

        StatisticsService::recompute_user_score(&mut tx, user_id, scoring, clock).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn lock_owned(
        conn: &mut PgConnection,
        user_id: Uuid,
        goal_id: Uuid,
    ) -> Result<GoalRecord, ApiError> {
        GoalRepository::lock_for_update(conn, goal_id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Goal not found".to_string()))
    }

    async fn rescore(
        conn: &mut PgConnection,
        user_id: Uuid,
        goal: GoalRecord,
        scoring: &ScoringConfig,
        clock: &dyn Clock,
    ) -> Result<GoalUpdate, ApiError> {
        let score = StatisticsService::recompute_user_score(conn, user_id, scoring, clock).await?;
        let (score, unlocked) =
            AchievementService::evaluate(conn, user_id, score, scoring, clock).await?;
        Ok(GoalUpdate {
            goal,
            score,
            unlocked,
        })
    }

    fn status_of(goal: &GoalRecord) -> Result<GoalStatus, ApiError> {
        goal.status.parse::<GoalStatus>().map_err(ApiError::from)
    }
}

/// Add `amount` to a goal. The first progress activates it; reaching the
/// target completes it. Completed and paused goals take no progress.
pub fn apply_progress(progress: GoalProgress, amount: f64) -> Result<GoalProgress, ApiError> {
    match progress.status {
        GoalStatus::Completed => {
            return Err(ApiError::InvalidState("Goal is already completed".to_string()))
        }
        GoalStatus::Paused => {
            return Err(ApiError::InvalidState(
                "Resume the goal before logging progress".to_string(),
            ))
        }
        GoalStatus::NotStarted | GoalStatus::Active => {}
    }

    let current = progress.current + amount;
    let status = if current >= progress.target {
        GoalStatus::Completed
    } else {
        GoalStatus::Active
    };

    Ok(GoalProgress {
        current,
        target: progress.target,
        status,
    })
}

/// `min(100, current / target * 100)`; zero for a non-positive target
pub fn completion_percentage(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (current / target * 100.0).clamp(0.0, 100.0)
}

/// Keep the original completion time while completed; clear it otherwise
fn completed_at_for(
    status: GoalStatus,
    previous: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match status {
        GoalStatus::Completed => Some(previous.unwrap_or(now)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn progress(current: f64, target: f64, status: GoalStatus) -> GoalProgress {
        GoalProgress {
            current,
            target,
            status,
        }
    }

    #[test]
    fn test_first_progress_activates() {
        let next = apply_progress(progress(0.0, 10.0, GoalStatus::NotStarted), 2.0).unwrap();
        assert_eq!(next.current, 2.0);
        assert_eq!(next.status, GoalStatus::Active);
    }

    #[test]
    fn test_reaching_target_completes() {
        let next = apply_progress(progress(8.0, 10.0, GoalStatus::Active), 2.0).unwrap();
        assert_eq!(next.status, GoalStatus::Completed);

        let overshoot = apply_progress(progress(0.0, 5.0, GoalStatus::NotStarted), 50.0).unwrap();
        assert_eq!(overshoot.status, GoalStatus::Completed);
    }

    #[rstest]
    #[case(GoalStatus::Completed)]
    #[case(GoalStatus::Paused)]
    fn test_closed_goals_reject_progress(#[case] status: GoalStatus) {
        let result = apply_progress(progress(1.0, 10.0, status), 1.0);
        assert!(matches!(result, Err(ApiError::InvalidState(_))));
    }

    #[rstest]
    #[case(0.0, 100.0, 0.0)]
    #[case(25.0, 100.0, 25.0)]
    #[case(150.0, 100.0, 100.0)]
    #[case(5.0, 0.0, 0.0)]
    fn test_completion_percentage(#[case] current: f64, #[case] target: f64, #[case] expected: f64) {
        assert_eq!(completion_percentage(current, target), expected);
    }

    #[test]
    fn test_completed_at_preserved_while_completed() {
        let earlier = Utc::now() - chrono::Duration::days(3);
        let now = Utc::now();
        assert_eq!(completed_at_for(GoalStatus::Completed, Some(earlier), now), Some(earlier));
        assert_eq!(completed_at_for(GoalStatus::Completed, None, now), Some(now));
        assert_eq!(completed_at_for(GoalStatus::Active, Some(earlier), now), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_completion_percentage_bounded(current in -100.0f64..1000.0, target in 0.01f64..500.0) {
            let pct = completion_percentage(current, target);
            prop_assert!((0.0..=100.0).contains(&pct));
        }

        #[test]
        fn test_progress_never_decreases(current in 0.0f64..100.0, amount in 0.01f64..50.0) {
            let next = apply_progress(progress(current, 1000.0, GoalStatus::Active), amount).unwrap();
            prop_assert!(next.current > current);
        }
    }
}
