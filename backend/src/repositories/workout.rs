//! Workout and workout-exercise repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

// ============================================================================
// Workouts
// ============================================================================

/// Workout record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_template: bool,
    pub is_public: bool,
    pub template_id: Option<Uuid>,
    pub difficulty: Option<String>,
    pub workout_type: Option<String>,
    pub focus: Option<String>,
    pub intensity: Option<String>,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub estimated_duration: Option<i32>,
    pub estimated_calories: Option<i32>,
    pub actual_duration: Option<i32>,
    pub actual_calories: Option<i32>,
    pub completion_percentage: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a workout
#[derive(Debug, Clone)]
pub struct CreateWorkout {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_template: bool,
    pub is_public: bool,
    pub template_id: Option<Uuid>,
    pub difficulty: Option<String>,
    pub workout_type: Option<String>,
    pub focus: Option<String>,
    pub intensity: Option<String>,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub estimated_duration: Option<i32>,
    pub estimated_calories: Option<i32>,
}

/// Values written when a session completes
#[derive(Debug, Clone)]
pub struct CompleteWorkout {
    pub completed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub actual_duration: i32,
    pub actual_calories: i32,
    pub completion_percentage: i32,
}

/// Workout repository
pub struct WorkoutRepository;

impl WorkoutRepository {
    /// Create a new workout
    pub async fn create(conn: &mut PgConnection, input: CreateWorkout) -> Result<WorkoutRecord> {
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            INSERT INTO workouts (
                user_id, name, description, is_template, is_public, template_id,
                difficulty, workout_type, focus, intensity, status, started_at,
                estimated_duration, estimated_calories
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, user_id, name, description, is_template, is_public, template_id,
                      difficulty, workout_type, focus, intensity, status, started_at,
                      completed_at, estimated_duration, estimated_calories, actual_duration,
                      actual_calories, completion_percentage, notes, created_at, updated_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_template)
        .bind(input.is_public)
        .bind(input.template_id)
        .bind(&input.difficulty)
        .bind(&input.workout_type)
        .bind(&input.focus)
        .bind(&input.intensity)
        .bind(&input.status)
        .bind(input.started_at)
        .bind(input.estimated_duration)
        .bind(input.estimated_calories)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Get a workout by ID regardless of owner; services check ownership
    pub async fn get_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<WorkoutRecord>> {
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, description, is_template, is_public, template_id,
                   difficulty, workout_type, focus, intensity, status, started_at,
                   completed_at, estimated_duration, estimated_calories, actual_duration,
                   actual_calories, completion_percentage, notes, created_at, updated_at
            FROM workouts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Load a workout and hold its row lock until the transaction ends
    pub async fn lock_for_update(conn: &mut PgConnection, id: Uuid) -> Result<Option<WorkoutRecord>> {
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, description, is_template, is_public, template_id,
                   difficulty, workout_type, focus, intensity, status, started_at,
                   completed_at, estimated_duration, estimated_calories, actual_duration,
                   actual_calories, completion_percentage, notes, created_at, updated_at
            FROM workouts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// List a user's workouts, newest first
    pub async fn list_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
        status: Option<&str>,
        is_template: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkoutRecord>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, description, is_template, is_public, template_id,
                   difficulty, workout_type, focus, intensity, status, started_at,
                   completed_at, estimated_duration, estimated_calories, actual_duration,
                   actual_calories, completion_percentage, notes, created_at, updated_at
            FROM workouts
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR status = $2)
              AND ($3::BOOLEAN IS NULL OR is_template = $3)
            ORDER BY created_at DESC, id
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(is_template)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }

    /// Count a user's workouts under the same filters as `list_by_user`
    pub async fn count_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
        status: Option<&str>,
        is_template: Option<bool>,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM workouts
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR status = $2)
              AND ($3::BOOLEAN IS NULL OR is_template = $3)
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(is_template)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count)
    }

    /// Templates the user may start from: their own plus every public one
    pub async fn list_visible_templates(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Vec<WorkoutRecord>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, description, is_template, is_public, template_id,
                   difficulty, workout_type, focus, intensity, status, started_at,
                   completed_at, estimated_duration, estimated_calories, actual_duration,
                   actual_calories, completion_percentage, notes, created_at, updated_at
            FROM workouts
            WHERE is_template AND (user_id = $1 OR is_public)
            ORDER BY (user_id = $1) DESC, name
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }

    /// Whether the user currently has a session in progress
    pub async fn has_in_progress(conn: &mut PgConnection, user_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM workouts WHERE user_id = $1 AND status = 'in_progress')"#,
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(exists)
    }

    /// Move a workout from `from` to `to`.
    ///
    /// Returns `None` when the row is no longer in `from`, so a concurrent
    /// transition wins cleanly. `started_at` is only overwritten when given.
    pub async fn transition(
        conn: &mut PgConnection,
        id: Uuid,
        from: &str,
        to: &str,
        started_at: Option<DateTime<Utc>>,
    ) -> Result<Option<WorkoutRecord>> {
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            UPDATE workouts SET
                status = $3,
                started_at = COALESCE($4, started_at),
                updated_at = NOW()
            WHERE id = $1 AND status = $2 AND NOT is_template
            RETURNING id, user_id, name, description, is_template, is_public, template_id,
                      difficulty, workout_type, focus, intensity, status, started_at,
                      completed_at, estimated_duration, estimated_calories, actual_duration,
                      actual_calories, completion_percentage, notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(started_at)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Complete an in-progress session; `None` if it is no longer in progress
    pub async fn mark_completed(
        conn: &mut PgConnection,
        id: Uuid,
        input: &CompleteWorkout,
    ) -> Result<Option<WorkoutRecord>> {
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            UPDATE workouts SET
                status = 'completed',
                completed_at = $2,
                notes = COALESCE($3, notes),
                actual_duration = $4,
                actual_calories = $5,
                completion_percentage = $6,
                updated_at = NOW()
            WHERE id = $1 AND status = 'in_progress'
            RETURNING id, user_id, name, description, is_template, is_public, template_id,
                      difficulty, workout_type, focus, intensity, status, started_at,
                      completed_at, estimated_duration, estimated_calories, actual_duration,
                      actual_calories, completion_percentage, notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(input.completed_at)
        .bind(&input.notes)
        .bind(input.actual_duration)
        .bind(input.actual_calories)
        .bind(input.completion_percentage)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Store refreshed planning estimates
    pub async fn update_estimates(
        conn: &mut PgConnection,
        id: Uuid,
        estimated_duration: i32,
        estimated_calories: i32,
    ) -> Result<Option<WorkoutRecord>> {
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            UPDATE workouts SET
                estimated_duration = $2,
                estimated_calories = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, name, description, is_template, is_public, template_id,
                      difficulty, workout_type, focus, intensity, status, started_at,
                      completed_at, estimated_duration, estimated_calories, actual_duration,
                      actual_calories, completion_percentage, notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(estimated_duration)
        .bind(estimated_calories)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Delete a workout owned by the user unless it is in progress
    pub async fn delete(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"DELETE FROM workouts WHERE id = $1 AND user_id = $2 AND status <> 'in_progress'"#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Completed sessions whose completion falls inside `[start, end)`
    pub async fn list_completed_in_range(
        conn: &mut PgConnection,
        user_id: Uuid,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<WorkoutRecord>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, description, is_template, is_public, template_id,
                   difficulty, workout_type, focus, intensity, status, started_at,
                   completed_at, estimated_duration, estimated_calories, actual_duration,
                   actual_calories, completion_percentage, notes, created_at, updated_at
            FROM workouts
            WHERE user_id = $1
              AND status = 'completed'
              AND ($2::TIMESTAMPTZ IS NULL OR completed_at >= $2)
              AND ($3::TIMESTAMPTZ IS NULL OR completed_at < $3)
            ORDER BY completed_at
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }
}

// ============================================================================
// Workout Exercises
// ============================================================================

/// Workout exercise entry joined with its catalog name and calorie rate
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutExerciseRecord {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub calorie_rate: Decimal,
    pub sort_order: i32,
    pub planned_sets: i32,
    pub planned_reps: Option<i32>,
    pub planned_weight_kg: Option<Decimal>,
    pub planned_duration_seconds: Option<i32>,
    pub planned_rest_seconds: i32,
    pub actual_sets: Option<i32>,
    pub actual_reps: Option<i32>,
    pub actual_weight_kg: Option<Decimal>,
    pub actual_duration_seconds: Option<i32>,
    pub actual_rest_seconds: Option<i32>,
    pub is_personal_record: bool,
    pub one_rep_max: Option<Decimal>,
}

/// Input for appending a planned entry
#[derive(Debug, Clone)]
pub struct AddWorkoutExercise {
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub sort_order: i32,
    pub planned_sets: i32,
    pub planned_reps: Option<i32>,
    pub planned_weight_kg: Option<Decimal>,
    pub planned_duration_seconds: Option<i32>,
    pub planned_rest_seconds: i32,
}

/// Input for recording what was actually performed
#[derive(Debug, Clone)]
pub struct RecordActuals {
    pub actual_sets: i32,
    pub actual_reps: Option<i32>,
    pub actual_weight_kg: Option<Decimal>,
    pub actual_duration_seconds: Option<i32>,
    pub actual_rest_seconds: Option<i32>,
    pub one_rep_max: Option<Decimal>,
    pub is_personal_record: bool,
}

/// Workout exercise repository
pub struct WorkoutExerciseRepository;

impl WorkoutExerciseRepository {
    /// Append a planned entry
    pub async fn create(
        conn: &mut PgConnection,
        input: AddWorkoutExercise,
    ) -> Result<WorkoutExerciseRecord> {
        let record = sqlx::query_as::<_, WorkoutExerciseRecord>(
            r#"
            WITH inserted AS (
                INSERT INTO workout_exercises (
                    workout_id, exercise_id, sort_order, planned_sets, planned_reps,
                    planned_weight_kg, planned_duration_seconds, planned_rest_seconds
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            )
            SELECT i.id, i.workout_id, i.exercise_id, e.name AS exercise_name, e.calorie_rate,
                   i.sort_order, i.planned_sets, i.planned_reps, i.planned_weight_kg,
                   i.planned_duration_seconds, i.planned_rest_seconds, i.actual_sets,
                   i.actual_reps, i.actual_weight_kg, i.actual_duration_seconds,
                   i.actual_rest_seconds, i.is_personal_record, i.one_rep_max
            FROM inserted i
            JOIN exercises e ON e.id = i.exercise_id
            "#,
        )
        .bind(input.workout_id)
        .bind(input.exercise_id)
        .bind(input.sort_order)
        .bind(input.planned_sets)
        .bind(input.planned_reps)
        .bind(input.planned_weight_kg)
        .bind(input.planned_duration_seconds)
        .bind(input.planned_rest_seconds)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Copy every planned entry of `template_id` into `workout_id`.
    /// Order and planned fields are preserved; actual fields stay empty.
    pub async fn copy_planned(
        conn: &mut PgConnection,
        template_id: Uuid,
        workout_id: Uuid,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO workout_exercises (
                workout_id, exercise_id, sort_order, planned_sets, planned_reps,
                planned_weight_kg, planned_duration_seconds, planned_rest_seconds
            )
            SELECT $2, exercise_id, sort_order, planned_sets, planned_reps,
                   planned_weight_kg, planned_duration_seconds, planned_rest_seconds
            FROM workout_exercises
            WHERE workout_id = $1
            ORDER BY sort_order
            "#,
        )
        .bind(template_id)
        .bind(workout_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// All entries of a workout in order
    pub async fn list_by_workout(
        conn: &mut PgConnection,
        workout_id: Uuid,
    ) -> Result<Vec<WorkoutExerciseRecord>> {
        let records = sqlx::query_as::<_, WorkoutExerciseRecord>(
            r#"
            SELECT we.id, we.workout_id, we.exercise_id, e.name AS exercise_name, e.calorie_rate,
                   we.sort_order, we.planned_sets, we.planned_reps, we.planned_weight_kg,
                   we.planned_duration_seconds, we.planned_rest_seconds, we.actual_sets,
                   we.actual_reps, we.actual_weight_kg, we.actual_duration_seconds,
                   we.actual_rest_seconds, we.is_personal_record, we.one_rep_max
            FROM workout_exercises we
            JOIN exercises e ON e.id = we.exercise_id
            WHERE we.workout_id = $1
            ORDER BY we.sort_order
            "#,
        )
        .bind(workout_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }

    /// Get one entry, scoped to its workout
    pub async fn get_in_workout(
        conn: &mut PgConnection,
        workout_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<WorkoutExerciseRecord>> {
        let record = sqlx::query_as::<_, WorkoutExerciseRecord>(
            r#"
            SELECT we.id, we.workout_id, we.exercise_id, e.name AS exercise_name, e.calorie_rate,
                   we.sort_order, we.planned_sets, we.planned_reps, we.planned_weight_kg,
                   we.planned_duration_seconds, we.planned_rest_seconds, we.actual_sets,
                   we.actual_reps, we.actual_weight_kg, we.actual_duration_seconds,
                   we.actual_rest_seconds, we.is_personal_record, we.one_rep_max
            FROM workout_exercises we
            JOIN exercises e ON e.id = we.exercise_id
            WHERE we.workout_id = $1 AND we.id = $2
            "#,
        )
        .bind(workout_id)
        .bind(entry_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Next free order index within a workout
    pub async fn next_sort_order(conn: &mut PgConnection, workout_id: Uuid) -> Result<i32> {
        let next = sqlx::query_scalar::<_, i32>(
            r#"SELECT COALESCE(MAX(sort_order) + 1, 0) FROM workout_exercises WHERE workout_id = $1"#,
        )
        .bind(workout_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(next)
    }

    /// Store performed values on an entry
    pub async fn record_actuals(
        conn: &mut PgConnection,
        entry_id: Uuid,
        input: &RecordActuals,
    ) -> Result<WorkoutExerciseRecord> {
        let record = sqlx::query_as::<_, WorkoutExerciseRecord>(
            r#"
            WITH updated AS (
                UPDATE workout_exercises SET
                    actual_sets = $2,
                    actual_reps = $3,
                    actual_weight_kg = $4,
                    actual_duration_seconds = $5,
                    actual_rest_seconds = $6,
                    one_rep_max = $7,
                    is_personal_record = $8,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT u.id, u.workout_id, u.exercise_id, e.name AS exercise_name, e.calorie_rate,
                   u.sort_order, u.planned_sets, u.planned_reps, u.planned_weight_kg,
                   u.planned_duration_seconds, u.planned_rest_seconds, u.actual_sets,
                   u.actual_reps, u.actual_weight_kg, u.actual_duration_seconds,
                   u.actual_rest_seconds, u.is_personal_record, u.one_rep_max
            FROM updated u
            JOIN exercises e ON e.id = u.exercise_id
            "#,
        )
        .bind(entry_id)
        .bind(input.actual_sets)
        .bind(input.actual_reps)
        .bind(input.actual_weight_kg)
        .bind(input.actual_duration_seconds)
        .bind(input.actual_rest_seconds)
        .bind(input.one_rep_max)
        .bind(input.is_personal_record)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Best one-rep-max the user has recorded for an exercise, ignoring one
    /// entry. Cancelled sessions and templates do not count.
    pub async fn best_one_rep_max(
        conn: &mut PgConnection,
        user_id: Uuid,
        exercise_id: Uuid,
        excluding_entry: Uuid,
    ) -> Result<Option<Decimal>> {
        let best = sqlx::query_scalar::<_, Option<Decimal>>(
            r#"
            SELECT MAX(we.one_rep_max)
            FROM workout_exercises we
            JOIN workouts w ON w.id = we.workout_id
            WHERE w.user_id = $1
              AND we.exercise_id = $2
              AND we.id <> $3
              AND w.is_template = FALSE
              AND w.status IN ('in_progress', 'completed')
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .bind(excluding_entry)
        .fetch_one(&mut *conn)
        .await?;

        Ok(best)
    }
}
