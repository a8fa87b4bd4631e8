//! Water intake and hydration goal repositories

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

// ============================================================================
// Water Intake
// ============================================================================

/// Water intake record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WaterIntakeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_ml: i32,
    pub beverage_type: String,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for logging water intake
#[derive(Debug, Clone)]
pub struct CreateWaterIntake {
    pub user_id: Uuid,
    pub amount_ml: i32,
    pub beverage_type: String,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Intake totals for one UTC day
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyWaterTotal {
    pub date: NaiveDate,
    pub total_ml: i64,
    pub entry_count: i64,
}

/// Water intake repository
pub struct WaterIntakeRepository;

impl WaterIntakeRepository {
    pub async fn create(
        conn: &mut PgConnection,
        input: CreateWaterIntake,
    ) -> Result<WaterIntakeRecord> {
        let record = sqlx::query_as::<_, WaterIntakeRecord>(
            r#"
            INSERT INTO water_intake_entries (user_id, amount_ml, beverage_type, consumed_at, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, amount_ml, beverage_type, consumed_at, notes, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(input.amount_ml)
        .bind(&input.beverage_type)
        .bind(input.consumed_at)
        .bind(&input.notes)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Entries for one UTC day, oldest first
    pub async fn get_by_date(
        conn: &mut PgConnection,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<WaterIntakeRecord>> {
        let records = sqlx::query_as::<_, WaterIntakeRecord>(
            r#"
            SELECT id, user_id, amount_ml, beverage_type, consumed_at, notes, created_at
            FROM water_intake_entries
            WHERE user_id = $1 AND (consumed_at AT TIME ZONE 'UTC')::DATE = $2
            ORDER BY consumed_at ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }

    /// Per-day totals over an inclusive range, newest day first.
    /// Days without entries are omitted.
    pub async fn get_daily_totals(
        conn: &mut PgConnection,
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyWaterTotal>> {
        let totals = sqlx::query_as::<_, DailyWaterTotal>(
            r#"
            SELECT
                (consumed_at AT TIME ZONE 'UTC')::DATE AS date,
                SUM(amount_ml)::BIGINT AS total_ml,
                COUNT(*)::BIGINT AS entry_count
            FROM water_intake_entries
            WHERE user_id = $1
              AND (consumed_at AT TIME ZONE 'UTC')::DATE BETWEEN $2 AND $3
            GROUP BY 1
            ORDER BY 1 DESC
            "#,
        )
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&mut *conn)
        .await?;

        Ok(totals)
    }

    pub async fn delete(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM water_intake_entries WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&mut *conn)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Hydration Goals
// ============================================================================

/// Hydration goal record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HydrationGoalRecord {
    pub user_id: Uuid,
    pub daily_goal_ml: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Hydration goal repository
pub struct HydrationGoalRepository;

impl HydrationGoalRepository {
    pub async fn get_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Option<HydrationGoalRecord>> {
        let record = sqlx::query_as::<_, HydrationGoalRecord>(
            r#"
            SELECT user_id, daily_goal_ml, created_at, updated_at
            FROM hydration_goals
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Create or replace the user's daily goal
    pub async fn upsert(
        conn: &mut PgConnection,
        user_id: Uuid,
        daily_goal_ml: i32,
        now: DateTime<Utc>,
    ) -> Result<HydrationGoalRecord> {
        let record = sqlx::query_as::<_, HydrationGoalRecord>(
            r#"
            INSERT INTO hydration_goals (user_id, daily_goal_ml, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (user_id) DO UPDATE SET
                daily_goal_ml = EXCLUDED.daily_goal_ml,
                updated_at = EXCLUDED.updated_at
            RETURNING user_id, daily_goal_ml, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(daily_goal_ml)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }
}
