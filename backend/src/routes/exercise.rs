//! Exercise catalog API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::parse_id;
use crate::services::exercise::{Exercise, ExerciseService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use workout_tracker_shared::types::{ExerciseCatalogQuery, ExerciseResponse};

/// Create exercise catalog routes
pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exercises))
        .route("/:id", get(get_exercise))
}

/// GET /api/v1/exercises - Browse the catalog by body part, category,
/// difficulty or name
async fn list_exercises(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ExerciseCatalogQuery>,
) -> Result<Json<Vec<ExerciseResponse>>, ApiError> {
    let exercises = ExerciseService::list_exercises(state.db(), query).await?;
    Ok(Json(exercises.into_iter().map(exercise_response).collect()))
}

/// GET /api/v1/exercises/:id
async fn get_exercise(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ExerciseResponse>, ApiError> {
    let exercise_id = parse_id(&id, "exercise")?;
    let exercise = ExerciseService::get_exercise(state.db(), exercise_id).await?;
    Ok(Json(exercise_response(exercise)))
}

fn exercise_response(exercise: Exercise) -> ExerciseResponse {
    ExerciseResponse {
        id: exercise.id,
        name: exercise.name,
        body_part: exercise.body_part,
        category: exercise.category,
        difficulty: exercise.difficulty,
        calorie_rate: exercise.calorie_rate,
        equipment: exercise.equipment,
        description: exercise.description,
        instructions: exercise.instructions,
    }
}
