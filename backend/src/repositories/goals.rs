//! Goals repository for database operations

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

// ============================================================================
// Goals
// ============================================================================

/// Goal record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub target_value: Decimal,
    pub current_value: Decimal,
    pub unit: String,
    pub target_date: Option<NaiveDate>,
    pub status: String,
    pub priority: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a goal
#[derive(Debug, Clone)]
pub struct CreateGoal {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub target_value: Decimal,
    pub unit: String,
    pub target_date: Option<NaiveDate>,
    pub priority: i32,
}

/// Full replacement of the mutable goal fields.
/// The service merges the request onto the current row before saving.
#[derive(Debug, Clone)]
pub struct SaveGoal {
    pub title: String,
    pub description: Option<String>,
    pub target_value: Decimal,
    pub current_value: Decimal,
    pub target_date: Option<NaiveDate>,
    pub priority: i32,
    pub status: String,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Goal repository
pub struct GoalRepository;

impl GoalRepository {
    /// Create a new goal
    pub async fn create(conn: &mut PgConnection, input: CreateGoal) -> Result<GoalRecord> {
        let record = sqlx::query_as::<_, GoalRecord>(
            r#"
            INSERT INTO goals (user_id, title, description, category, target_value, unit,
                               target_date, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, title, description, category, target_value, current_value,
                      unit, target_date, status, priority, completed_at, created_at, updated_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.target_value)
        .bind(&input.unit)
        .bind(input.target_date)
        .bind(input.priority)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Get a goal owned by the user
    pub async fn get_by_id(
        conn: &mut PgConnection,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GoalRecord>> {
        let record = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, title, description, category, target_value, current_value,
                   unit, target_date, status, priority, completed_at, created_at, updated_at
            FROM goals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Same as `get_by_id`, holding the row lock for the transaction
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GoalRecord>> {
        let record = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, title, description, category, target_value, current_value,
                   unit, target_date, status, priority, completed_at, created_at, updated_at
            FROM goals
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Get all goals for a user, highest priority first
    pub async fn get_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
        status: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<GoalRecord>> {
        let records = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, title, description, category, target_value, current_value,
                   unit, target_date, status, priority, completed_at, created_at, updated_at
            FROM goals
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR status = $2)
              AND ($3::TEXT IS NULL OR category = $3)
            ORDER BY priority DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(category)
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }

    /// Persist merged goal fields
    pub async fn save(conn: &mut PgConnection, id: Uuid, input: &SaveGoal) -> Result<GoalRecord> {
        let record = sqlx::query_as::<_, GoalRecord>(
            r#"
            UPDATE goals SET
                title = $2,
                description = $3,
                target_value = $4,
                current_value = $5,
                target_date = $6,
                priority = $7,
                status = $8,
                completed_at = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, title, description, category, target_value, current_value,
                      unit, target_date, status, priority, completed_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.target_value)
        .bind(input.current_value)
        .bind(input.target_date)
        .bind(input.priority)
        .bind(&input.status)
        .bind(input.completed_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Delete a goal
    pub async fn delete(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM goals WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Completion timestamps of every completed goal
    pub async fn completion_times(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Vec<DateTime<Utc>>> {
        let times = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT completed_at
            FROM goals
            WHERE user_id = $1 AND status = 'completed' AND completed_at IS NOT NULL
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(times)
    }
}

// ============================================================================
// Goal Progress
// ============================================================================

/// Progress entry record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalProgressRecord {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub note: Option<String>,
    pub logged_at: DateTime<Utc>,
}

/// Goal progress repository
pub struct GoalProgressRepository;

impl GoalProgressRepository {
    /// Record one logged amount
    pub async fn create(
        conn: &mut PgConnection,
        goal_id: Uuid,
        user_id: Uuid,
        amount: Decimal,
        note: Option<&str>,
        logged_at: DateTime<Utc>,
    ) -> Result<GoalProgressRecord> {
        let record = sqlx::query_as::<_, GoalProgressRecord>(
            r#"
            INSERT INTO goal_progress_entries (goal_id, user_id, amount, note, logged_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, goal_id, user_id, amount, note, logged_at
            "#,
        )
        .bind(goal_id)
        .bind(user_id)
        .bind(amount)
        .bind(note)
        .bind(logged_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }
}
