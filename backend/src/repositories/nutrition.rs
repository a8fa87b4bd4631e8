//! Meal entry repository for database operations

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

/// Meal entry record from database. Nutrients are totals for all servings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealEntryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub meal_type: String,
    pub servings: Decimal,
    pub calories: Decimal,
    pub protein_g: Decimal,
    pub carbohydrates_g: Decimal,
    pub fat_g: Decimal,
    pub fiber_g: Decimal,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for logging a meal
#[derive(Debug, Clone)]
pub struct CreateMealEntry {
    pub user_id: Uuid,
    pub name: String,
    pub meal_type: String,
    pub servings: Decimal,
    pub calories: Decimal,
    pub protein_g: Decimal,
    pub carbohydrates_g: Decimal,
    pub fat_g: Decimal,
    pub fiber_g: Decimal,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Meal entry repository
pub struct MealEntryRepository;

impl MealEntryRepository {
    pub async fn create(conn: &mut PgConnection, input: CreateMealEntry) -> Result<MealEntryRecord> {
        let record = sqlx::query_as::<_, MealEntryRecord>(
            r#"
            INSERT INTO meal_entries (
                user_id, name, meal_type, servings,
                calories, protein_g, carbohydrates_g, fat_g, fiber_g,
                consumed_at, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, user_id, name, meal_type, servings,
                      calories, protein_g, carbohydrates_g, fat_g, fiber_g,
                      consumed_at, notes, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.name)
        .bind(&input.meal_type)
        .bind(input.servings)
        .bind(input.calories)
        .bind(input.protein_g)
        .bind(input.carbohydrates_g)
        .bind(input.fat_g)
        .bind(input.fiber_g)
        .bind(input.consumed_at)
        .bind(&input.notes)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Entries consumed on a UTC calendar day, oldest first
    pub async fn get_by_date(
        conn: &mut PgConnection,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<MealEntryRecord>> {
        let records = sqlx::query_as::<_, MealEntryRecord>(
            r#"
            SELECT id, user_id, name, meal_type, servings,
                   calories, protein_g, carbohydrates_g, fat_g, fiber_g,
                   consumed_at, notes, created_at
            FROM meal_entries
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

    pub async fn delete(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meal_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
