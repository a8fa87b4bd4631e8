//! Exercise catalog service
//!
//! Read-only access to the seeded exercise catalog.

use crate::error::ApiError;
use crate::repositories::{ExerciseFilter, ExerciseRecord, ExerciseRepository};
use crate::services::decimal_to_f64;
use sqlx::PgPool;
use uuid::Uuid;
use workout_tracker_shared::types::ExerciseCatalogQuery;
use workout_tracker_shared::Difficulty;

/// Upper bound on one catalog page
const MAX_CATALOG_PAGE: i64 = 500;

/// Catalog exercise
#[derive(Debug, Clone)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub body_part: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub calorie_rate: f64,
    pub equipment: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
}

/// Exercise service for business logic
pub struct ExerciseService;

impl ExerciseService {
    /// Browse the catalog
    pub async fn list_exercises(
        pool: &PgPool,
        query: ExerciseCatalogQuery,
    ) -> Result<Vec<Exercise>, ApiError> {
        let filter = ExerciseFilter {
            body_part: query.body_part,
            category: query.category,
            difficulty: query.difficulty.map(|d| d.as_str().to_string()),
            search: query.search.filter(|s| !s.trim().is_empty()),
            limit: query.limit.clamp(1, MAX_CATALOG_PAGE),
        };

        let mut conn = pool.acquire().await?;
        let records = ExerciseRepository::list(&mut conn, &filter)
            .await
            .map_err(ApiError::Internal)?;

        records.into_iter().map(Self::record_to_exercise).collect()
    }

    /// Get one catalog entry
    pub async fn get_exercise(pool: &PgPool, id: Uuid) -> Result<Exercise, ApiError> {
        let mut conn = pool.acquire().await?;
        let record = ExerciseRepository::get_by_id(&mut conn, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Exercise not found".to_string()))?;

        Self::record_to_exercise(record)
    }

    /// Convert database record to Exercise
    fn record_to_exercise(record: ExerciseRecord) -> Result<Exercise, ApiError> {
        Ok(Exercise {
            id: record.id,
            name: record.name,
            body_part: record.body_part,
            category: record.category,
            difficulty: record.difficulty.parse()?,
            calorie_rate: decimal_to_f64(record.calorie_rate),
            equipment: record.equipment,
            description: record.description,
            instructions: record.instructions,
        })
    }
}
