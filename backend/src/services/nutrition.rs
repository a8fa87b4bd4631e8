//! Meal logging and daily nutrition totals

use crate::clock::Clock;
use crate::error::ApiError;
use crate::repositories::{CreateMealEntry, MealEntryRecord, MealEntryRepository};
use crate::services::{decimal_from_f64, ensure_user};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;
use workout_tracker_shared::types::LogMealRequest;
use workout_tracker_shared::validation::{validate_nutrient, validate_positive_amount};
use workout_tracker_shared::MealType;

/// Summed nutrients over a set of meal entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NutritionTotals {
    pub calories: Decimal,
    pub protein_g: Decimal,
    pub carbohydrates_g: Decimal,
    pub fat_g: Decimal,
    pub fiber_g: Decimal,
    pub meal_count: i64,
}

/// Calories and entry count for one meal slot
#[derive(Debug, Clone, PartialEq)]
pub struct MealTypeTotals {
    pub meal_type: MealType,
    pub calories: Decimal,
    pub entry_count: i64,
}

/// One day of meals
#[derive(Debug, Clone)]
pub struct DailyNutrition {
    pub date: NaiveDate,
    pub totals: NutritionTotals,
    pub by_meal_type: Vec<MealTypeTotals>,
    pub entries: Vec<MealEntryRecord>,
}

/// Nutrition service
pub struct NutritionService;

impl NutritionService {
    /// Log a meal. Per-serving values in the request are stored multiplied
    /// by the serving count.
    pub async fn log_meal(
        pool: &PgPool,
        user_id: Uuid,
        request: LogMealRequest,
        clock: &dyn Clock,
    ) -> Result<MealEntryRecord, ApiError> {
        validate_positive_amount(request.servings, "servings").map_err(ApiError::Validation)?;
        for (value, field) in [
            (request.calories, "calories"),
            (request.protein_g, "protein_g"),
            (request.carbohydrates_g, "carbohydrates_g"),
            (request.fat_g, "fat_g"),
            (request.fiber_g, "fiber_g"),
        ] {
            validate_nutrient(value, field).map_err(ApiError::Validation)?;
        }

        let servings = decimal_from_f64(request.servings);
        let scaled = |per_serving: f64| (decimal_from_f64(per_serving) * servings).round_dp(2);

        let mut conn = pool.acquire().await?;
        ensure_user(&mut conn, user_id).await?;

        let entry = MealEntryRepository::create(
            &mut conn,
            CreateMealEntry {
                user_id,
                name: request.name,
                meal_type: request.meal_type.as_str().to_string(),
                servings,
                calories: scaled(request.calories),
                protein_g: scaled(request.protein_g),
                carbohydrates_g: scaled(request.carbohydrates_g),
                fat_g: scaled(request.fat_g),
                fiber_g: scaled(request.fiber_g),
                consumed_at: request.consumed_at.unwrap_or_else(|| clock.now()),
                notes: request.notes,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        debug!(user_id = %user_id, meal_id = %entry.id, meal_type = %entry.meal_type, "Meal logged");
        Ok(entry)
    }

    /// Meals and totals for one UTC day
    pub async fn get_daily_summary(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailyNutrition, ApiError> {
        let mut conn = pool.acquire().await?;
        let entries = MealEntryRepository::get_by_date(&mut conn, user_id, date)
            .await
            .map_err(ApiError::Internal)?;

        Ok(DailyNutrition {
            date,
            totals: daily_totals(&entries),
            by_meal_type: totals_by_meal_type(&entries)?,
            entries,
        })
    }

    pub async fn delete_meal(pool: &PgPool, user_id: Uuid, meal_id: Uuid) -> Result<(), ApiError> {
        let mut conn = pool.acquire().await?;
        let deleted = MealEntryRepository::delete(&mut conn, meal_id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Meal entry not found".to_string()));
        }
        Ok(())
    }
}

pub fn daily_totals(entries: &[MealEntryRecord]) -> NutritionTotals {
    entries
        .iter()
        .fold(NutritionTotals::default(), |acc, entry| NutritionTotals {
            calories: acc.calories + entry.calories,
            protein_g: acc.protein_g + entry.protein_g,
            carbohydrates_g: acc.carbohydrates_g + entry.carbohydrates_g,
            fat_g: acc.fat_g + entry.fat_g,
            fiber_g: acc.fiber_g + entry.fiber_g,
            meal_count: acc.meal_count + 1,
        })
}

/// Per-slot calories in breakfast, lunch, dinner, snack order; empty slots omitted
pub fn totals_by_meal_type(entries: &[MealEntryRecord]) -> Result<Vec<MealTypeTotals>, ApiError> {
    let mut slots = [
        (MealType::Breakfast, Decimal::ZERO, 0i64),
        (MealType::Lunch, Decimal::ZERO, 0),
        (MealType::Dinner, Decimal::ZERO, 0),
        (MealType::Snack, Decimal::ZERO, 0),
    ];

    for entry in entries {
        let meal_type: MealType = entry.meal_type.parse()?;
        if let Some(slot) = slots.iter_mut().find(|(t, _, _)| *t == meal_type) {
            slot.1 += entry.calories;
            slot.2 += 1;
        }
    }

    Ok(slots
        .into_iter()
        .filter(|(_, _, count)| *count > 0)
        .map(|(meal_type, calories, entry_count)| MealTypeTotals {
            meal_type,
            calories,
            entry_count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(meal_type: &str, calories: i64, protein: i64) -> MealEntryRecord {
        let now = Utc::now();
        MealEntryRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: "Meal".to_string(),
            meal_type: meal_type.to_string(),
            servings: Decimal::ONE,
            calories: Decimal::new(calories, 0),
            protein_g: Decimal::new(protein, 0),
            carbohydrates_g: Decimal::ZERO,
            fat_g: Decimal::ZERO,
            fiber_g: Decimal::ZERO,
            consumed_at: now,
            notes: None,
            created_at: now,
        }
    }

    #[test]
    fn test_daily_totals_sum_every_entry() {
        let entries = vec![
            entry("breakfast", 350, 20),
            entry("lunch", 600, 35),
            entry("snack", 150, 5),
        ];
        let totals = daily_totals(&entries);

        assert_eq!(totals.calories, Decimal::new(1100, 0));
        assert_eq!(totals.protein_g, Decimal::new(60, 0));
        assert_eq!(totals.meal_count, 3);
    }

    #[test]
    fn test_empty_day_is_zero() {
        assert_eq!(daily_totals(&[]), NutritionTotals::default());
        assert!(totals_by_meal_type(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_meal_type_totals_keep_slot_order() {
        let entries = vec![
            entry("snack", 100, 0),
            entry("breakfast", 300, 0),
            entry("snack", 50, 0),
        ];
        let slots = totals_by_meal_type(&entries).unwrap();

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].meal_type, MealType::Breakfast);
        assert_eq!(slots[1].meal_type, MealType::Snack);
        assert_eq!(slots[1].calories, Decimal::new(150, 0));
        assert_eq!(slots[1].entry_count, 2);
    }

    #[test]
    fn test_unknown_meal_type_in_storage_is_an_error() {
        let entries = vec![entry("brunch", 300, 0)];
        assert!(totals_by_meal_type(&entries).is_err());
    }
}
