//! Goals API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::GoalRecord;
use crate::routes::achievements::unlocked_response;
use crate::routes::parse_id;
use crate::routes::stats::score_response;
use crate::services::decimal_to_f64;
use crate::services::goals::{completion_percentage, GoalUpdate, GoalsService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;
use workout_tracker_shared::types::{
    CreateGoalRequest, GoalResponse, GoalUpdateResponse, GoalsListQuery, GoalsListResponse,
    LogGoalProgressRequest, UpdateGoalRequest,
};

/// Create goals routes
pub fn goals_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_goal).get(list_goals))
        .route("/:id", get(get_goal).put(update_goal).delete(delete_goal))
        .route("/:id/progress", post(log_progress))
}

/// POST /api/v1/goals - Create a new goal
async fn create_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateGoalRequest>,
) -> Result<Json<GoalResponse>, ApiError> {
    req.validate()?;

    let goal = GoalsService::create_goal(state.db(), auth.user_id, req).await?;

    Ok(Json(goal_response(goal)?))
}

/// GET /api/v1/goals - List goals, highest priority first
async fn list_goals(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<GoalsListQuery>,
) -> Result<Json<GoalsListResponse>, ApiError> {
    let goals = GoalsService::get_goals(
        state.db(),
        auth.user_id,
        query.status,
        query.category.as_deref(),
    )
    .await?;

    let goals = goals
        .into_iter()
        .map(goal_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(GoalsListResponse { goals }))
}

/// GET /api/v1/goals/:id - Get a specific goal
async fn get_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<GoalResponse>, ApiError> {
    let goal_id = parse_id(&id, "goal")?;

    let goal = GoalsService::get_goal(state.db(), auth.user_id, goal_id).await?;

    Ok(Json(goal_response(goal)?))
}

/// PUT /api/v1/goals/:id - Update a goal
///
/// Returns the recomputed score and anything the change unlocked.
async fn update_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateGoalRequest>,
) -> Result<Json<GoalUpdateResponse>, ApiError> {
    let goal_id = parse_id(&id, "goal")?;
    req.validate()?;

    let update = GoalsService::update_goal(
        state.db(),
        auth.user_id,
        goal_id,
        req,
        &state.config().scoring,
        state.clock().as_ref(),
    )
    .await?;

    Ok(Json(update_response(update)?))
}

/// DELETE /api/v1/goals/:id - Delete a goal and its progress log
async fn delete_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let goal_id = parse_id(&id, "goal")?;

    GoalsService::delete_goal(
        state.db(),
        auth.user_id,
        goal_id,
        &state.config().scoring,
        state.clock().as_ref(),
    )
    .await?;

    Ok(Json(serde_json::json!({"deleted": true})))
}

/// POST /api/v1/goals/:id/progress - Add to a goal's current value
async fn log_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<LogGoalProgressRequest>,
) -> Result<Json<GoalUpdateResponse>, ApiError> {
    let goal_id = parse_id(&id, "goal")?;
    req.validate()?;

    let update = GoalsService::log_progress(
        state.db(),
        auth.user_id,
        goal_id,
        req,
        &state.config().scoring,
        state.clock().as_ref(),
    )
    .await?;

    Ok(Json(update_response(update)?))
}

fn goal_response(goal: GoalRecord) -> Result<GoalResponse, ApiError> {
    let target_value = decimal_to_f64(goal.target_value);
    let current_value = decimal_to_f64(goal.current_value);

    Ok(GoalResponse {
        id: goal.id,
        title: goal.title,
        description: goal.description,
        category: goal.category,
        target_value,
        current_value,
        unit: goal.unit,
        target_date: goal.target_date,
        status: goal.status.parse()?,
        priority: goal.priority,
        completion_percentage: completion_percentage(current_value, target_value),
        completed_at: goal.completed_at,
        created_at: goal.created_at,
    })
}

fn update_response(update: GoalUpdate) -> Result<GoalUpdateResponse, ApiError> {
    Ok(GoalUpdateResponse {
        goal: goal_response(update.goal)?,
        score: score_response(update.score),
        unlocked_achievements: update.unlocked.into_iter().map(unlocked_response).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;
    use workout_tracker_shared::GoalStatus;

    fn record(status: &str, current: Decimal) -> GoalRecord {
        GoalRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Run 100km".to_string(),
            description: None,
            category: "cardio".to_string(),
            target_value: Decimal::new(100, 0),
            current_value: current,
            unit: "km".to_string(),
            target_date: None,
            status: status.to_string(),
            priority: 2,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_goal_response_reports_percentage() {
        let response = goal_response(record("active", Decimal::new(255, 1))).unwrap();
        assert_eq!(response.status, GoalStatus::Active);
        assert_eq!(response.current_value, 25.5);
        assert!((response.completion_percentage - 25.5).abs() < 1e-9);
    }

    #[test]
    fn test_goal_response_rejects_unknown_status() {
        let result = goal_response(record("abandoned", Decimal::ZERO));
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }
}
