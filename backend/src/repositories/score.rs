//! User score repository and the aggregate queries feeding it

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

/// Score row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserScoreRecord {
    pub user_id: Uuid,
    pub total_points: i64,
    pub level: i32,
    pub level_progress: i32,
    pub current_streak: i32,
    pub best_streak: i32,
    pub goals_completed: i32,
    pub weekly_goals_completed: i32,
    pub monthly_goals_completed: i32,
    pub achievements_unlocked: i32,
    pub workouts_completed: i32,
    pub total_workout_minutes: i64,
    pub total_calories_burned: i64,
    pub updated_at: DateTime<Utc>,
}

impl UserScoreRecord {
    pub fn values(&self) -> ScoreValues {
        ScoreValues {
            total_points: self.total_points,
            level: self.level,
            level_progress: self.level_progress,
            current_streak: self.current_streak,
            best_streak: self.best_streak,
            goals_completed: self.goals_completed,
            weekly_goals_completed: self.weekly_goals_completed,
            monthly_goals_completed: self.monthly_goals_completed,
            achievements_unlocked: self.achievements_unlocked,
            workouts_completed: self.workouts_completed,
            total_workout_minutes: self.total_workout_minutes,
            total_calories_burned: self.total_calories_burned,
        }
    }
}

/// Score values computed by the statistics service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreValues {
    pub total_points: i64,
    pub level: i32,
    pub level_progress: i32,
    pub current_streak: i32,
    pub best_streak: i32,
    pub goals_completed: i32,
    pub weekly_goals_completed: i32,
    pub monthly_goals_completed: i32,
    pub achievements_unlocked: i32,
    pub workouts_completed: i32,
    pub total_workout_minutes: i64,
    pub total_calories_burned: i64,
}

/// Totals over a user's completed workouts
#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct WorkoutTotals {
    pub workouts_completed: i64,
    pub total_minutes: i64,
    pub total_calories: i64,
}

/// User score repository
pub struct UserScoreRepository;

impl UserScoreRepository {
    /// Get the score row for a user
    pub async fn get(conn: &mut PgConnection, user_id: Uuid) -> Result<Option<UserScoreRecord>> {
        let record = sqlx::query_as::<_, UserScoreRecord>(
            r#"
            SELECT user_id, total_points, level, level_progress, current_streak, best_streak,
                   goals_completed, weekly_goals_completed, monthly_goals_completed,
                   achievements_unlocked, workouts_completed, total_workout_minutes,
                   total_calories_burned, updated_at
            FROM user_scores
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Insert or overwrite the single score row of a user
    pub async fn upsert(
        conn: &mut PgConnection,
        user_id: Uuid,
        values: &ScoreValues,
        updated_at: DateTime<Utc>,
    ) -> Result<UserScoreRecord> {
        let record = sqlx::query_as::<_, UserScoreRecord>(
            r#"
            INSERT INTO user_scores (
                user_id, total_points, level, level_progress, current_streak, best_streak,
                goals_completed, weekly_goals_completed, monthly_goals_completed,
                achievements_unlocked, workouts_completed, total_workout_minutes,
                total_calories_burned, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (user_id) DO UPDATE SET
                total_points = EXCLUDED.total_points,
                level = EXCLUDED.level,
                level_progress = EXCLUDED.level_progress,
                current_streak = EXCLUDED.current_streak,
                best_streak = EXCLUDED.best_streak,
                goals_completed = EXCLUDED.goals_completed,
                weekly_goals_completed = EXCLUDED.weekly_goals_completed,
                monthly_goals_completed = EXCLUDED.monthly_goals_completed,
                achievements_unlocked = EXCLUDED.achievements_unlocked,
                workouts_completed = EXCLUDED.workouts_completed,
                total_workout_minutes = EXCLUDED.total_workout_minutes,
                total_calories_burned = EXCLUDED.total_calories_burned,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, total_points, level, level_progress, current_streak, best_streak,
                      goals_completed, weekly_goals_completed, monthly_goals_completed,
                      achievements_unlocked, workouts_completed, total_workout_minutes,
                      total_calories_burned, updated_at
            "#,
        )
        .bind(user_id)
        .bind(values.total_points)
        .bind(values.level)
        .bind(values.level_progress)
        .bind(values.current_streak)
        .bind(values.best_streak)
        .bind(values.goals_completed)
        .bind(values.weekly_goals_completed)
        .bind(values.monthly_goals_completed)
        .bind(values.achievements_unlocked)
        .bind(values.workouts_completed)
        .bind(values.total_workout_minutes)
        .bind(values.total_calories_burned)
        .bind(updated_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Distinct UTC days with a completed workout or logged goal progress
    pub async fn activity_dates(conn: &mut PgConnection, user_id: Uuid) -> Result<Vec<NaiveDate>> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT day FROM (
                SELECT (completed_at AT TIME ZONE 'UTC')::DATE AS day
                FROM workouts
                WHERE user_id = $1 AND status = 'completed'
                UNION
                SELECT (logged_at AT TIME ZONE 'UTC')::DATE AS day
                FROM goal_progress_entries
                WHERE user_id = $1
            ) days
            ORDER BY day
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(dates)
    }

    /// Count, minutes and calories over all completed workouts
    pub async fn workout_totals(conn: &mut PgConnection, user_id: Uuid) -> Result<WorkoutTotals> {
        let totals = sqlx::query_as::<_, WorkoutTotals>(
            r#"
            SELECT COUNT(*) AS workouts_completed,
                   COALESCE(SUM(actual_duration), 0)::BIGINT AS total_minutes,
                   COALESCE(SUM(actual_calories), 0)::BIGINT AS total_calories
            FROM workouts
            WHERE user_id = $1 AND status = 'completed'
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(totals)
    }
}
