//! Meal logging API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::MealEntryRecord;
use crate::routes::parse_id;
use crate::services::decimal_to_f64;
use crate::services::nutrition::{DailyNutrition, NutritionService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use validator::Validate;
use workout_tracker_shared::types::{
    DailyNutritionResponse, DateQuery, LogMealRequest, MealEntryResponse, MealTypeTotalsResponse,
};

/// Create nutrition routes
pub fn nutrition_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(log_meal))
        .route("/meals/:id", delete(delete_meal))
        .route("/daily", get(get_daily_summary))
}

/// POST /api/v1/nutrition/meals - Log a meal
async fn log_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogMealRequest>,
) -> Result<Json<MealEntryResponse>, ApiError> {
    req.validate()?;

    let entry =
        NutritionService::log_meal(state.db(), auth.user_id, req, state.clock().as_ref()).await?;

    Ok(Json(meal_response(entry)?))
}

/// DELETE /api/v1/nutrition/meals/:id
async fn delete_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let meal_id = parse_id(&id, "meal")?;

    NutritionService::delete_meal(state.db(), auth.user_id, meal_id).await?;

    Ok(Json(serde_json::json!({"deleted": true})))
}

/// GET /api/v1/nutrition/daily?date=YYYY-MM-DD - Meals and totals for a day
async fn get_daily_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyNutritionResponse>, ApiError> {
    let date = query.date.unwrap_or_else(|| state.clock().today());

    let daily = NutritionService::get_daily_summary(state.db(), auth.user_id, date).await?;

    Ok(Json(daily_response(daily)?))
}

fn meal_response(entry: MealEntryRecord) -> Result<MealEntryResponse, ApiError> {
    Ok(MealEntryResponse {
        id: entry.id,
        name: entry.name,
        meal_type: entry.meal_type.parse()?,
        servings: decimal_to_f64(entry.servings),
        calories: decimal_to_f64(entry.calories),
        protein_g: decimal_to_f64(entry.protein_g),
        carbohydrates_g: decimal_to_f64(entry.carbohydrates_g),
        fat_g: decimal_to_f64(entry.fat_g),
        fiber_g: decimal_to_f64(entry.fiber_g),
        consumed_at: entry.consumed_at,
        notes: entry.notes,
    })
}

fn daily_response(daily: DailyNutrition) -> Result<DailyNutritionResponse, ApiError> {
    let entries = daily
        .entries
        .into_iter()
        .map(meal_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DailyNutritionResponse {
        date: daily.date,
        total_calories: decimal_to_f64(daily.totals.calories),
        total_protein_g: decimal_to_f64(daily.totals.protein_g),
        total_carbohydrates_g: decimal_to_f64(daily.totals.carbohydrates_g),
        total_fat_g: decimal_to_f64(daily.totals.fat_g),
        total_fiber_g: decimal_to_f64(daily.totals.fiber_g),
        meal_count: daily.totals.meal_count,
        by_meal_type: daily
            .by_meal_type
            .into_iter()
            .map(|slot| MealTypeTotalsResponse {
                meal_type: slot.meal_type,
                calories: decimal_to_f64(slot.calories),
                entry_count: slot.entry_count,
            })
            .collect(),
        entries,
    })
}
