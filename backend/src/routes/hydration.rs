//! Hydration tracking API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::WaterIntakeRecord;
use crate::routes::parse_id;
use crate::services::hydration::{DailyHydration, HydrationGoal, HydrationService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use validator::Validate;
use workout_tracker_shared::types::{
    DailyHydrationResponse, DailyHydrationSummaryResponse, DateQuery, HydrationGoalResponse,
    HydrationHistoryQuery, HydrationHistoryResponse, LogWaterRequest, SetHydrationGoalRequest,
    WaterIntakeResponse,
};

/// Create hydration routes
pub fn hydration_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(log_water))
        .route("/daily", get(get_daily_summary))
        .route("/goal", get(get_goal).put(set_goal))
        .route("/history", get(get_history))
        .route("/:id", delete(delete_entry))
}

/// POST /api/v1/hydration - Log water intake
async fn log_water(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogWaterRequest>,
) -> Result<Json<WaterIntakeResponse>, ApiError> {
    req.validate()?;

    let entry =
        HydrationService::log_water(state.db(), auth.user_id, req, state.clock().as_ref()).await?;

    Ok(Json(intake_response(entry)))
}

/// GET /api/v1/hydration/daily?date=YYYY-MM-DD - Progress for a day
async fn get_daily_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyHydrationResponse>, ApiError> {
    let date = query.date.unwrap_or_else(|| state.clock().today());

    let daily = HydrationService::get_daily_summary(state.db(), auth.user_id, date).await?;

    Ok(Json(DailyHydrationResponse {
        date: daily.date,
        total_ml: daily.total_ml,
        goal_ml: daily.goal_ml,
        progress_percent: daily.progress_percent,
        goal_met: daily.goal_met,
        entry_count: daily.entry_count,
        entries: daily.entries.into_iter().map(intake_response).collect(),
    }))
}

/// GET /api/v1/hydration/goal
async fn get_goal(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<HydrationGoalResponse>, ApiError> {
    let goal = HydrationService::get_goal(state.db(), auth.user_id).await?;

    Ok(Json(goal_response(goal)))
}

/// PUT /api/v1/hydration/goal - Replace the daily goal
async fn set_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SetHydrationGoalRequest>,
) -> Result<Json<HydrationGoalResponse>, ApiError> {
    req.validate()?;

    let goal = HydrationService::set_goal(
        state.db(),
        auth.user_id,
        req.daily_goal_ml,
        state.clock().as_ref(),
    )
    .await?;

    Ok(Json(goal_response(goal)))
}

/// GET /api/v1/hydration/history?start_date=..&end_date=..
async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HydrationHistoryQuery>,
) -> Result<Json<HydrationHistoryResponse>, ApiError> {
    let days =
        HydrationService::get_history(state.db(), auth.user_id, query.start_date, query.end_date)
            .await?;

    Ok(Json(history_response(days)))
}

/// DELETE /api/v1/hydration/:id
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let entry_id = parse_id(&id, "water intake")?;

    HydrationService::delete_entry(state.db(), auth.user_id, entry_id).await?;

    Ok(Json(serde_json::json!({"deleted": true})))
}

fn intake_response(entry: WaterIntakeRecord) -> WaterIntakeResponse {
    WaterIntakeResponse {
        id: entry.id,
        amount_ml: entry.amount_ml,
        beverage_type: entry.beverage_type,
        consumed_at: entry.consumed_at,
        notes: entry.notes,
    }
}

fn goal_response(goal: HydrationGoal) -> HydrationGoalResponse {
    HydrationGoalResponse {
        daily_goal_ml: goal.daily_goal_ml,
        is_custom: goal.is_custom,
    }
}

fn history_response(days: Vec<DailyHydration>) -> HydrationHistoryResponse {
    let summaries: Vec<DailyHydrationSummaryResponse> = days
        .into_iter()
        .map(|day| DailyHydrationSummaryResponse {
            date: day.date,
            total_ml: day.total_ml,
            goal_ml: day.goal_ml,
            progress_percent: day.progress_percent,
            goal_met: day.goal_met,
            entry_count: day.entry_count,
        })
        .collect();

    HydrationHistoryResponse {
        days_goal_met: summaries.iter().filter(|s| s.goal_met).count() as i64,
        summaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32, total_ml: i64, goal_met: bool) -> DailyHydration {
        DailyHydration {
            date: NaiveDate::from_ymd_opt(2025, 3, d).unwrap(),
            total_ml,
            goal_ml: 2000,
            progress_percent: total_ml as f64 / 20.0,
            goal_met,
            entry_count: 1,
            entries: Vec::new(),
        }
    }

    #[test]
    fn test_history_counts_days_goal_met() {
        let response = history_response(vec![
            day(3, 2400, true),
            day(2, 1200, false),
            day(1, 2000, true),
        ]);

        assert_eq!(response.summaries.len(), 3);
        assert_eq!(response.days_goal_met, 2);
        assert_eq!(response.summaries[0].date, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
    }

    #[test]
    fn test_default_goal_is_not_custom() {
        let response = goal_response(HydrationGoal {
            daily_goal_ml: 2500,
            is_custom: false,
        });
        assert!(!response.is_custom);
    }
}
