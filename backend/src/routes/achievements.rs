//! Achievement API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::stats::score_response;
use crate::services::achievements::{AchievementStatus, UnlockedAchievement};
use crate::services::AchievementService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use workout_tracker_shared::types::{
    AchievementResponse, EvaluateAchievementsResponse, UnlockedAchievementResponse,
};

/// Create achievement routes
pub fn achievement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_achievements))
        .route("/unlocked", get(list_unlocked))
        .route("/evaluate", post(evaluate_achievements))
}

/// GET /api/v1/achievements - Active catalog with unlock state
async fn list_achievements(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<AchievementResponse>>, ApiError> {
    let achievements = AchievementService::list_achievements(state.db(), auth.user_id).await?;
    Ok(Json(achievements.into_iter().map(achievement_response).collect()))
}

/// GET /api/v1/achievements/unlocked - Unlocks, oldest first
async fn list_unlocked(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<UnlockedAchievementResponse>>, ApiError> {
    let unlocked = AchievementService::list_unlocked(state.db(), auth.user_id).await?;
    Ok(Json(unlocked.into_iter().map(unlocked_response).collect()))
}

/// POST /api/v1/achievements/evaluate - Recompute the score and unlock
/// whatever it now satisfies
async fn evaluate_achievements(
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

fn achievement_response(status: AchievementStatus) -> AchievementResponse {
    let achievement = status.achievement;
    AchievementResponse {
        id: achievement.id,
        key: achievement.key,
        name: achievement.name,
        description: achievement.description,
        category: achievement.category,
        rarity: achievement.rarity,
        points: achievement.points,
        requirement: achievement.requirement,
        unlocked: status.unlocked_at.is_some(),
        unlocked_at: status.unlocked_at,
    }
}

pub(crate) fn unlocked_response(unlocked: UnlockedAchievement) -> UnlockedAchievementResponse {
    UnlockedAchievementResponse {
        achievement_id: unlocked.achievement_id,
        key: unlocked.key,
        name: unlocked.name,
        points_earned: unlocked.points_earned,
        unlocked_at: unlocked.unlocked_at,
    }
}
