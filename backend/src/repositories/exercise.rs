//! Exercise catalog repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

/// Exercise record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: Uuid,
    pub name: String,
    pub body_part: String,
    pub category: String,
    pub difficulty: String,
    pub calorie_rate: Decimal,
    pub equipment: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog entry written by seeding
#[derive(Debug, Clone)]
pub struct CreateExercise {
    pub name: String,
    pub body_part: String,
    pub category: String,
    pub difficulty: String,
    pub calorie_rate: Decimal,
    pub equipment: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
}

/// Catalog filters; `None` matches everything
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
    pub body_part: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub search: Option<String>,
    pub limit: i64,
}

/// Exercise repository
pub struct ExerciseRepository;

impl ExerciseRepository {
    /// Insert a catalog entry unless one with the same name exists.
    /// Returns `true` when a row was written.
    pub async fn insert_if_absent(conn: &mut PgConnection, input: &CreateExercise) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO exercises (name, body_part, category, difficulty, calorie_rate,
                                   equipment, description, instructions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(&input.name)
        .bind(&input.body_part)
        .bind(&input.category)
        .bind(&input.difficulty)
        .bind(input.calorie_rate)
        .bind(&input.equipment)
        .bind(&input.description)
        .bind(&input.instructions)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List catalog entries matching the filter
    pub async fn list(conn: &mut PgConnection, filter: &ExerciseFilter) -> Result<Vec<ExerciseRecord>> {
        let records = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, name, body_part, category, difficulty, calorie_rate,
                   equipment, description, instructions, created_at, updated_at
            FROM exercises
            WHERE ($1::TEXT IS NULL OR body_part = $1)
              AND ($2::TEXT IS NULL OR category = $2)
              AND ($3::TEXT IS NULL OR difficulty = $3)
              AND ($4::TEXT IS NULL OR LOWER(name) LIKE LOWER($4))
            ORDER BY body_part, name
            LIMIT $5
            "#,
        )
        .bind(&filter.body_part)
        .bind(&filter.category)
        .bind(&filter.difficulty)
        .bind(filter.search.as_ref().map(|s| format!("%{}%", s)))
        .bind(filter.limit)
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }

    /// Get exercise by ID
    pub async fn get_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<ExerciseRecord>> {
        let record = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, name, body_part, category, difficulty, calorie_rate,
                   equipment, description, instructions, created_at, updated_at
            FROM exercises
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Fetch several exercises at once; missing ids are simply absent
    pub async fn get_by_ids(conn: &mut PgConnection, ids: &[Uuid]) -> Result<Vec<ExerciseRecord>> {
        let records = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, name, body_part, category, difficulty, calorie_rate,
                   equipment, description, instructions, created_at, updated_at
            FROM exercises
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }

    /// Look up an exercise id by its unique name (seeding)
    pub async fn find_id_by_name(conn: &mut PgConnection, name: &str) -> Result<Option<Uuid>> {
        let id = sqlx::query_scalar::<_, Uuid>(r#"SELECT id FROM exercises WHERE name = $1"#)
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(id)
    }
}
