//! Statistics API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::UserScoreRecord;
use crate::routes::achievements::unlocked_response;
use crate::services::statistics::WorkoutSummary;
use crate::services::{AchievementService, StatisticsService};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use workout_tracker_shared::types::{
    EvaluateAchievementsResponse, UserScoreResponse, WorkoutSummaryQuery, WorkoutSummaryResponse,
    WorkoutTypeSummaryResponse,
};

/// Create statistics routes
pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/score", get(get_score))
        .route("/recompute", post(recompute_score))
        .route("/workouts", get(get_workout_summary))
}

/// GET /api/v1/stats/score - Current score, computed on first access
async fn get_score(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserScoreResponse>, ApiError> {
    let score = StatisticsService::get_score(
        state.db(),
        auth.user_id,
        &state.config().scoring,
        state.clock().as_ref(),
    )
    .await?;

    Ok(Json(score_response(score)))
}

/// POST /api/v1/stats/recompute - Rebuild the score from history
///
/// Also evaluates achievements, since a recompute can move a statistic
/// across a threshold.
async fn recompute_score(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<EvaluateAchievementsResponse>, ApiError> {
    let (score, unlocked) = AchievementService::recompute_and_evaluate(
        state.db(),
        auth.user_id,
        &state.config().scoring,
        state.clock().as_ref(),
    )
    .await?;

    Ok(Json(EvaluateAchievementsResponse {
        unlocked_achievements: unlocked.into_iter().map(unlocked_response).collect(),
        score: score_response(score),
    }))
}

/// GET /api/v1/stats/workouts - Completed workout totals, both dates inclusive
async fn get_workout_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<WorkoutSummaryQuery>,
) -> Result<Json<WorkoutSummaryResponse>, ApiError> {
    let summary =
        StatisticsService::workout_summary(state.db(), auth.user_id, query.start, query.end).await?;

    Ok(Json(summary_response(summary)))
}

pub(crate) fn score_response(score: UserScoreRecord) -> UserScoreResponse {
    UserScoreResponse {
        total_points: score.total_points,
        level: score.level,
        level_progress: score.level_progress,
        current_streak: score.current_streak,
        best_streak: score.best_streak,
        goals_completed: score.goals_completed,
        weekly_goals_completed: score.weekly_goals_completed,
        monthly_goals_completed: score.monthly_goals_completed,
        achievements_unlocked: score.achievements_unlocked,
        workouts_completed: score.workouts_completed,
        total_workout_minutes: score.total_workout_minutes,
        total_calories_burned: score.total_calories_burned,
        updated_at: score.updated_at,
    }
}

fn summary_response(summary: WorkoutSummary) -> WorkoutSummaryResponse {
    WorkoutSummaryResponse {
        total_workouts: summary.total_workouts,
        total_duration_minutes: summary.total_duration_minutes,
        total_calories: summary.total_calories,
        average_duration_minutes: summary.average_duration_minutes,
        average_calories: summary.average_calories,
        average_completion_percentage: summary.average_completion_percentage,
        by_type: summary
            .by_type
            .into_iter()
            .map(|t| WorkoutTypeSummaryResponse {
                workout_type: t.workout_type,
                count: t.count,
                total_duration_minutes: t.total_duration_minutes,
                total_calories: t.total_calories,
            })
            .collect(),
    }
}
