//! Workout API routes
//!
//! Templates, planned workouts and sessions share one resource. Lifecycle
//! changes are explicit POST actions rather than status writes.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::{WorkoutExerciseRecord, WorkoutRecord};
use crate::routes::achievements::unlocked_response;
use crate::routes::parse_id;
use crate::routes::stats::score_response;
use crate::services::decimal_to_f64;
use crate::services::workout::{WorkoutCompletion, WorkoutDetail};
use crate::services::WorkoutService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use validator::Validate;
use workout_tracker_shared::Difficulty;
use workout_tracker_shared::types::{
    CompleteWorkoutRequest, CompleteWorkoutResponse, CreateWorkoutRequest, EstimateRequest,
    EstimateResponse, PlannedExerciseInput, RecordExerciseRequest, StartWorkoutRequest,
    WorkoutDetailResponse, WorkoutExerciseResponse, WorkoutListQuery, WorkoutListResponse,
    WorkoutResponse,
};

/// Create workout routes
pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route("/start", post(start_workout))
        .route("/estimate", post(estimate_workout))
        .route("/templates", get(list_templates))
        .route("/:id", get(get_workout).delete(delete_workout))
        .route("/:id/begin", post(begin_workout))
        .route("/:id/complete", post(complete_workout))
        .route("/:id/cancel", post(cancel_workout))
        .route("/:id/exercises", post(add_exercise))
        .route("/:id/exercises/:entry_id", put(record_exercise))
}

// ============================================================================
// Authoring
// ============================================================================

/// POST /api/v1/workouts - Create a template or a planned workout
async fn create_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateWorkoutRequest>,
) -> Result<Json<WorkoutDetailResponse>, ApiError> {
    req.validate()?;

    let detail = WorkoutService::create_workout(state.db(), auth.user_id, req).await?;

    Ok(Json(detail_response(detail)?))
}

/// POST /api/v1/workouts/:id/exercises - Append a planned exercise
async fn add_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<PlannedExerciseInput>,
) -> Result<Json<WorkoutDetailResponse>, ApiError> {
    let workout_id = parse_id(&id, "workout")?;
    req.validate()?;

    let detail = WorkoutService::add_exercise(state.db(), auth.user_id, workout_id, req).await?;

    Ok(Json(detail_response(detail)?))
}

/// POST /api/v1/workouts/estimate - Estimate duration and calories
/// without saving anything
async fn estimate_workout(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, ApiError> {
    req.validate()?;

    let estimate = WorkoutService::estimate(state.db(), &req.exercises).await?;

    Ok(Json(EstimateResponse {
        estimated_duration: estimate.duration_minutes,
        estimated_calories: estimate.calories,
    }))
}

// ============================================================================
// Lifecycle
// ============================================================================

/// POST /api/v1/workouts/start - Start a session from a template, or an
/// empty one when no template is given
async fn start_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<StartWorkoutRequest>,
) -> Result<Json<WorkoutDetailResponse>, ApiError> {
    req.validate()?;

    let detail = WorkoutService::start_workout(
        state.db(),
        auth.user_id,
        req,
        &state.config().workouts,
        state.clock().as_ref(),
    )
    .await?;

    Ok(Json(detail_response(detail)?))
}

/// POST /api/v1/workouts/:id/begin - Move a planned workout to in_progress
async fn begin_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<WorkoutDetailResponse>, ApiError> {
    let workout_id = parse_id(&id, "workout")?;

    let detail = WorkoutService::begin_workout(
        state.db(),
        auth.user_id,
        workout_id,
        &state.config().workouts,
        state.clock().as_ref(),
    )
    .await?;

    Ok(Json(detail_response(detail)?))
}

/// PUT /api/v1/workouts/:id/exercises/:entry_id - Record what was actually done
async fn record_exercise(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, entry_id)): Path<(String, String)>,
    Json(req): Json<RecordExerciseRequest>,
) -> Result<Json<WorkoutExerciseResponse>, ApiError> {
    let workout_id = parse_id(&id, "workout")?;
    let entry_id = parse_id(&entry_id, "exercise entry")?;
    req.validate()?;

    let entry =
        WorkoutService::record_exercise(state.db(), auth.user_id, workout_id, entry_id, req)
            .await?;

    Ok(Json(exercise_entry_response(entry)))
}

/// POST /api/v1/workouts/:id/complete - Finish a session
///
/// The response carries the recomputed score and any achievements the
/// session unlocked.
async fn complete_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<CompleteWorkoutRequest>,
) -> Result<Json<CompleteWorkoutResponse>, ApiError> {
    let workout_id = parse_id(&id, "workout")?;
    req.validate()?;

    let completion = WorkoutService::complete_workout(
        state.db(),
        auth.user_id,
        workout_id,
        req,
        &state.config().scoring,
        state.clock().as_ref(),
    )
    .await?;

    Ok(Json(completion_response(completion)?))
}

/// POST /api/v1/workouts/:id/cancel - Abandon a planned or running session
async fn cancel_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<WorkoutDetailResponse>, ApiError> {
    let workout_id = parse_id(&id, "workout")?;

    let detail = WorkoutService::cancel_workout(state.db(), auth.user_id, workout_id).await?;

    Ok(Json(detail_response(detail)?))
}

// ============================================================================
// Queries
// ============================================================================

/// GET /api/v1/workouts - List workouts with pagination
async fn list_workouts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<WorkoutListQuery>,
) -> Result<Json<WorkoutListResponse>, ApiError> {
    let page = WorkoutService::list_workouts(
        state.db(),
        auth.user_id,
        query.status,
        query.is_template,
        query.limit,
        query.offset,
    )
    .await?;

    let items = page
        .items
        .into_iter()
        .map(workout_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(WorkoutListResponse {
        items,
        total_count: page.total_count,
        has_more: page.has_more,
    }))
}

/// GET /api/v1/workouts/templates - Own and public templates
async fn list_templates(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<WorkoutResponse>>, ApiError> {
    let templates = WorkoutService::list_templates(state.db(), auth.user_id).await?;

    let templates = templates
        .into_iter()
        .map(workout_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(templates))
}

/// GET /api/v1/workouts/:id - Workout with its exercise entries
async fn get_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<WorkoutDetailResponse>, ApiError> {
    let workout_id = parse_id(&id, "workout")?;

    let detail = WorkoutService::get_workout(state.db(), auth.user_id, workout_id).await?;

    Ok(Json(detail_response(detail)?))
}

/// DELETE /api/v1/workouts/:id
async fn delete_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let workout_id = parse_id(&id, "workout")?;

    WorkoutService::delete_workout(
        state.db(),
        auth.user_id,
        workout_id,
        &state.config().scoring,
        state.clock().as_ref(),
    )
    .await?;

    Ok(Json(serde_json::json!({"deleted": true})))
}

// ============================================================================
// Response mapping
// ============================================================================

fn workout_response(workout: WorkoutRecord) -> Result<WorkoutResponse, ApiError> {
    let difficulty: Option<Difficulty> =
        workout.difficulty.as_deref().map(str::parse).transpose()?;

    Ok(WorkoutResponse {
        id: workout.id,
        user_id: workout.user_id,
        name: workout.name,
        description: workout.description,
        is_template: workout.is_template,
        is_public: workout.is_public,
        template_id: workout.template_id,
        difficulty,
        workout_type: workout.workout_type,
        focus: workout.focus,
        intensity: workout.intensity,
        status: workout.status.parse()?,
        started_at: workout.started_at,
        completed_at: workout.completed_at,
        estimated_duration: workout.estimated_duration,
        estimated_calories: workout.estimated_calories,
        actual_duration: workout.actual_duration,
        actual_calories: workout.actual_calories,
        completion_percentage: workout.completion_percentage,
        notes: workout.notes,
        created_at: workout.created_at,
    })
}

fn exercise_entry_response(entry: WorkoutExerciseRecord) -> WorkoutExerciseResponse {
    WorkoutExerciseResponse {
        id: entry.id,
        exercise_id: entry.exercise_id,
        exercise_name: entry.exercise_name,
        sort_order: entry.sort_order,
        planned_sets: entry.planned_sets,
        planned_reps: entry.planned_reps,
        planned_weight_kg: entry.planned_weight_kg.map(decimal_to_f64),
        planned_duration_seconds: entry.planned_duration_seconds,
        planned_rest_seconds: entry.planned_rest_seconds,
        actual_sets: entry.actual_sets,
        actual_reps: entry.actual_reps,
        actual_weight_kg: entry.actual_weight_kg.map(decimal_to_f64),
        actual_duration_seconds: entry.actual_duration_seconds,
        actual_rest_seconds: entry.actual_rest_seconds,
        is_personal_record: entry.is_personal_record,
        one_rep_max: entry.one_rep_max.map(decimal_to_f64),
    }
}

fn detail_response(detail: WorkoutDetail) -> Result<WorkoutDetailResponse, ApiError> {
    Ok(WorkoutDetailResponse {
        workout: workout_response(detail.workout)?,
        exercises: detail
            .exercises
            .into_iter()
            .map(exercise_entry_response)
            .collect(),
    })
}

fn completion_response(completion: WorkoutCompletion) -> Result<CompleteWorkoutResponse, ApiError> {
    Ok(CompleteWorkoutResponse {
        workout: detail_response(completion.workout)?,
        score: score_response(completion.score),
        unlocked_achievements: completion
            .unlocked
            .into_iter()
            .map(unlocked_response)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;
    use workout_tracker_shared::WorkoutStatus;

    fn workout(status: &str, difficulty: Option<&str>) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Push day".to_string(),
            description: None,
            is_template: false,
            is_public: false,
            template_id: None,
            difficulty: difficulty.map(str::to_string),
            workout_type: Some("strength".to_string()),
            focus: None,
            intensity: None,
            status: status.to_string(),
            started_at: None,
            completed_at: None,
            estimated_duration: Some(45),
            estimated_calories: Some(320),
            actual_duration: None,
            actual_calories: None,
            completion_percentage: 0,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_workout_response_parses_text_columns() {
        let response = workout_response(workout("in_progress", Some("advanced"))).unwrap();
        assert_eq!(response.status, WorkoutStatus::InProgress);
        assert_eq!(response.difficulty, Some(Difficulty::Advanced));
        assert_eq!(response.estimated_duration, Some(45));
    }

    #[test]
    fn test_workout_response_without_difficulty() {
        let response = workout_response(workout("planned", None)).unwrap();
        assert!(response.difficulty.is_none());
    }

    #[test]
    fn test_workout_response_rejects_unknown_status() {
        let result = workout_response(workout("paused", None));
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }

    #[test]
    fn test_entry_response_converts_decimals() {
        let entry = WorkoutExerciseRecord {
            id: Uuid::new_v4(),
            workout_id: Uuid::new_v4(),
            exercise_id: Uuid::new_v4(),
            exercise_name: "Bench Press".to_string(),
            calorie_rate: Decimal::new(6, 0),
            sort_order: 0,
            planned_sets: 3,
            planned_reps: Some(8),
            planned_weight_kg: Some(Decimal::new(800, 1)),
            planned_duration_seconds: None,
            planned_rest_seconds: 90,
            actual_sets: Some(3),
            actual_reps: Some(8),
            actual_weight_kg: Some(Decimal::new(825, 1)),
            actual_duration_seconds: None,
            actual_rest_seconds: None,
            is_personal_record: true,
            one_rep_max: Some(Decimal::new(10450, 2)),
        };

        let response = exercise_entry_response(entry);
        assert_eq!(response.planned_weight_kg, Some(80.0));
        assert_eq!(response.actual_weight_kg, Some(82.5));
        assert_eq!(response.one_rep_max, Some(104.5));
        assert!(response.is_personal_record);
    }
}
