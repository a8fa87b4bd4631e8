//! API request and response types

use crate::achievements::Requirement;
use crate::models::{Difficulty, GoalStatus, MealType, Rarity, WorkoutStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

fn default_limit() -> i64 {
    20
}

fn default_catalog_limit() -> i64 {
    100
}

fn default_rest_seconds() -> i32 {
    60
}

fn default_priority() -> i32 {
    3
}

// ============================================================================
// Exercise Catalog Types
// ============================================================================

/// Exercise catalog query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseCatalogQuery {
    pub body_part: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub search: Option<String>,
    #[serde(default = "default_catalog_limit")]
    pub limit: i64,
}

/// Exercise catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub id: Uuid,
    pub name: String,
    pub body_part: String,
    pub category: String,
    pub difficulty: Difficulty,
    /// Calories burned per active minute
    pub calorie_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

// ============================================================================
// Workout Types
// ============================================================================

/// Planned exercise entry for a workout or template
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlannedExerciseInput {
    pub exercise_id: Uuid,
    #[validate(range(min = 1, max = 100))]
    pub sets: i32,
    #[validate(range(min = 1, max = 1000))]
    pub reps: Option<i32>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 1, max = 86400))]
    pub duration_seconds: Option<i32>,
    #[serde(default = "default_rest_seconds")]
    #[validate(range(min = 0, max = 3600))]
    pub rest_seconds: i32,
}

/// Create a template or an ad hoc planned workout
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWorkoutRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub is_public: bool,
    pub difficulty: Option<Difficulty>,
    pub workout_type: Option<String>,
    pub focus: Option<String>,
    pub intensity: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub exercises: Vec<PlannedExerciseInput>,
}

/// Start a session, optionally from a template
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StartWorkoutRequest {
    pub template_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

/// Completion payload; omitted actuals fall back to the estimator
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CompleteWorkoutRequest {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[validate(range(min = 0, max = 1440))]
    pub actual_duration: Option<i32>,
    #[validate(range(min = 0, max = 20000))]
    pub actual_calories: Option<i32>,
}

/// Actual performance recorded against a workout exercise entry
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordExerciseRequest {
    #[validate(range(min = 0, max = 100))]
    pub actual_sets: i32,
    #[validate(range(min = 0, max = 1000))]
    pub actual_reps: Option<i32>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub actual_weight_kg: Option<f64>,
    #[validate(range(min = 0, max = 86400))]
    pub actual_duration_seconds: Option<i32>,
    #[validate(range(min = 0, max = 3600))]
    pub actual_rest_seconds: Option<i32>,
}

/// Estimate duration and calories for a list of planned exercises
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EstimateRequest {
    #[validate(nested)]
    pub exercises: Vec<PlannedExerciseInput>,
}

/// Estimator output
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EstimateResponse {
    pub estimated_duration: i32,
    pub estimated_calories: i32,
}

/// Workout list query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutListQuery {
    pub status: Option<WorkoutStatus>,
    pub is_template: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Workout response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_template: bool,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    pub status: WorkoutStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub estimated_duration: Option<i32>,
    pub estimated_calories: Option<i32>,
    pub actual_duration: Option<i32>,
    pub actual_calories: Option<i32>,
    pub completion_percentage: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Exercise entry within a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExerciseResponse {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub sort_order: i32,
    pub planned_sets: i32,
    pub planned_reps: Option<i32>,
    pub planned_weight_kg: Option<f64>,
    pub planned_duration_seconds: Option<i32>,
    pub planned_rest_seconds: i32,
    pub actual_sets: Option<i32>,
    pub actual_reps: Option<i32>,
    pub actual_weight_kg: Option<f64>,
    pub actual_duration_seconds: Option<i32>,
    pub actual_rest_seconds: Option<i32>,
    pub is_personal_record: bool,
    pub one_rep_max: Option<f64>,
}

/// Workout with its ordered exercise entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDetailResponse {
    #[serde(flatten)]
    pub workout: WorkoutResponse,
    pub exercises: Vec<WorkoutExerciseResponse>,
}

/// Paginated workout list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutListResponse {
    pub items: Vec<WorkoutResponse>,
    pub total_count: i64,
    pub has_more: bool,
}

/// Result of completing a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteWorkoutResponse {
    pub workout: WorkoutDetailResponse,
    pub score: UserScoreResponse,
    pub unlocked_achievements: Vec<UnlockedAchievementResponse>,
}

// ============================================================================
// Goal Types
// ============================================================================

/// Create goal request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(range(exclusive_min = 0.0))]
    pub target_value: f64,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    pub target_date: Option<NaiveDate>,
    #[serde(default = "default_priority")]
    #[validate(range(min = 1, max = 5))]
    pub priority: i32,
}

/// Update goal request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub target_value: Option<f64>,
    pub target_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 5))]
    pub priority: Option<i32>,
    pub status: Option<GoalStatus>,
}

/// Log progress toward a goal
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogGoalProgressRequest {
    #[validate(range(exclusive_min = 0.0))]
    pub amount: f64,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Goals list query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalsListQuery {
    pub status: Option<GoalStatus>,
    pub category: Option<String>,
}

/// Goal response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub target_value: f64,
    pub current_value: f64,
    pub unit: String,
    pub target_date: Option<NaiveDate>,
    pub status: GoalStatus,
    pub priority: i32,
    pub completion_percentage: f64,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Goals list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsListResponse {
    pub goals: Vec<GoalResponse>,
}

/// Result of a goal mutation that may move the user's score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalUpdateResponse {
    pub goal: GoalResponse,
    pub score: UserScoreResponse,
    pub unlocked_achievements: Vec<UnlockedAchievementResponse>,
}

// ============================================================================
// Nutrition Types
// ============================================================================

fn default_servings() -> f64 {
    1.0
}

/// Log a meal entry. Nutrient values are per serving.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogMealRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub meal_type: MealType,
    #[serde(default = "default_servings")]
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    pub servings: f64,
    #[validate(range(min = 0.0, max = 10000.0))]
    pub calories: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub protein_g: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub carbohydrates_g: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub fat_g: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub fiber_g: f64,
    pub consumed_at: Option<DateTime<Utc>>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Day selector; defaults to today (UTC)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

/// Logged meal with totals for all servings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntryResponse {
    pub id: Uuid,
    pub name: String,
    pub meal_type: MealType,
    pub servings: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbohydrates_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub consumed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Totals for one meal slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealTypeTotalsResponse {
    pub meal_type: MealType,
    pub calories: f64,
    pub entry_count: i64,
}

/// Daily nutrition summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyNutritionResponse {
    pub date: NaiveDate,
    pub total_calories: f64,
    pub total_protein_g: f64,
    pub total_carbohydrates_g: f64,
    pub total_fat_g: f64,
    pub total_fiber_g: f64,
    pub meal_count: i64,
    pub by_meal_type: Vec<MealTypeTotalsResponse>,
    pub entries: Vec<MealEntryResponse>,
}

// ============================================================================
// Hydration Types
// ============================================================================

/// Log water intake
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogWaterRequest {
    #[validate(range(min = 1, max = 10000))]
    pub amount_ml: i32,
    #[validate(length(min = 1, max = 50))]
    pub beverage_type: Option<String>,
    pub consumed_at: Option<DateTime<Utc>>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Water intake entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterIntakeResponse {
    pub id: Uuid,
    pub amount_ml: i32,
    pub beverage_type: String,
    pub consumed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Daily hydration summary with progress toward the goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyHydrationResponse {
    pub date: NaiveDate,
    pub total_ml: i64,
    pub goal_ml: i32,
    pub progress_percent: f64,
    pub goal_met: bool,
    pub entry_count: i64,
    pub entries: Vec<WaterIntakeResponse>,
}

/// One day in the hydration history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyHydrationSummaryResponse {
    pub date: NaiveDate,
    pub total_ml: i64,
    pub goal_ml: i32,
    pub progress_percent: f64,
    pub goal_met: bool,
    pub entry_count: i64,
}

/// Hydration history query (both dates inclusive)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrationHistoryQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Hydration history, newest day first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrationHistoryResponse {
    pub summaries: Vec<DailyHydrationSummaryResponse>,
    pub days_goal_met: i64,
}

/// Set the daily hydration goal
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetHydrationGoalRequest {
    #[validate(range(min = 1, max = 20000))]
    pub daily_goal_ml: i32,
}

/// Daily hydration goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrationGoalResponse {
    pub daily_goal_ml: i32,
    /// False while the user has not set a goal and the default applies
    pub is_custom: bool,
}

// ============================================================================
// Statistics Types
// ============================================================================

/// Aggregated per-user score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserScoreResponse {
    pub total_points: i64,
    pub level: i32,
    /// Percent of the way to the next level (0-99)
    pub level_progress: i32,
    pub current_streak: i32,
    pub best_streak: i32,
    pub goals_completed: i32,
    pub weekly_goals_completed: i32,
    pub monthly_goals_completed: i32,
    pub achievements_unlocked: i32,
    pub workouts_completed: i32,
    pub total_workout_minutes: i64,
    pub total_calories_burned: i64,
    pub updated_at: DateTime<Utc>,
}

/// Workout summary query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutSummaryQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Totals and averages over completed workouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSummaryResponse {
    pub total_workouts: i64,
    pub total_duration_minutes: i64,
    pub total_calories: i64,
    pub average_duration_minutes: f64,
    pub average_calories: f64,
    pub average_completion_percentage: f64,
    pub by_type: Vec<WorkoutTypeSummaryResponse>,
}

/// Summary by workout type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTypeSummaryResponse {
    pub workout_type: String,
    pub count: i64,
    pub total_duration_minutes: i64,
    pub total_calories: i64,
}

// ============================================================================
// Achievement Types
// ============================================================================

/// Achievement catalog entry with the caller's unlock state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementResponse {
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub rarity: Rarity,
    pub points: i32,
    pub requirement: Requirement,
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// An achievement unlocked by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockedAchievementResponse {
    pub achievement_id: Uuid,
    pub key: String,
    pub name: String,
    pub points_earned: i32,
    pub unlocked_at: DateTime<Utc>,
}

/// Result of an explicit evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateAchievementsResponse {
    pub unlocked_achievements: Vec<UnlockedAchievementResponse>,
    pub score: UserScoreResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meal_request_defaults_to_one_serving() {
        let request: LogMealRequest = serde_json::from_value(json!({
            "name": "Oatmeal",
            "meal_type": "breakfast",
            "calories": 300.0
        }))
        .unwrap();

        assert_eq!(request.servings, 1.0);
        assert_eq!(request.protein_g, 0.0);
        assert_eq!(request.meal_type, MealType::Breakfast);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_water_request_bounds() {
        let request: LogWaterRequest =
            serde_json::from_value(json!({"amount_ml": 0})).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_planned_exercise_defaults_rest() {
        let input: PlannedExerciseInput = serde_json::from_value(json!({
            "exercise_id": Uuid::nil(),
            "sets": 3,
            "reps": 10
        }))
        .unwrap();
        assert_eq!(input.rest_seconds, 60);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_complete_request_rejects_negative_duration() {
        let request = CompleteWorkoutRequest {
            actual_duration: Some(-5),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_workout_validates_nested_exercises() {
        let request: CreateWorkoutRequest = serde_json::from_value(json!({
            "name": "Leg day",
            "exercises": [{"exercise_id": Uuid::nil(), "sets": 0, "reps": 10}]
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_goal_priority_bounds() {
        let request: CreateGoalRequest = serde_json::from_value(json!({
            "title": "Run 100km",
            "category": "cardio",
            "target_value": 100.0,
            "unit": "km",
            "priority": 6
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_workout_list_query_defaults() {
        let query: WorkoutListQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
        assert!(query.status.is_none());
    }
}
