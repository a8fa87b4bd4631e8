//! Input validation functions
//!
//! Request DTOs carry `validator` derive rules; these functions guard the
//! same bounds for callers that reach the services without going through
//! HTTP deserialization.

/// Longest session the tracker accepts (24 hours)
pub const MAX_WORKOUT_MINUTES: i32 = 1440;

/// Upper bound on calories for a single session
pub const MAX_WORKOUT_CALORIES: i32 = 20_000;

/// Validate a workout duration in minutes
pub fn validate_duration_minutes(minutes: i32) -> Result<(), String> {
    if minutes < 0 {
        return Err("Duration cannot be negative".to_string());
    }
    if minutes > MAX_WORKOUT_MINUTES {
        return Err(format!("Duration must be at most {} minutes", MAX_WORKOUT_MINUTES));
    }
    Ok(())
}

/// Validate a calorie value for one session
pub fn validate_calories(calories: i32) -> Result<(), String> {
    if calories < 0 {
        return Err("Calories cannot be negative".to_string());
    }
    if calories > MAX_WORKOUT_CALORIES {
        return Err("Calorie value unreasonably high".to_string());
    }
    Ok(())
}

/// Largest single water intake entry (ml)
pub const MAX_WATER_ENTRY_ML: i32 = 10_000;

/// Bounds for a daily hydration goal (ml)
pub const MAX_HYDRATION_GOAL_ML: i32 = 20_000;

/// Validate one water intake amount
pub fn validate_water_amount(amount_ml: i32) -> Result<(), String> {
    if amount_ml <= 0 {
        return Err("Amount must be greater than 0".to_string());
    }
    if amount_ml > MAX_WATER_ENTRY_ML {
        return Err(format!("Amount cannot exceed {}ml", MAX_WATER_ENTRY_ML));
    }
    Ok(())
}

/// Validate a daily hydration goal
pub fn validate_hydration_goal(daily_goal_ml: i32) -> Result<(), String> {
    if !(1..=MAX_HYDRATION_GOAL_ML).contains(&daily_goal_ml) {
        return Err(format!(
            "Daily goal must be between 1 and {}ml",
            MAX_HYDRATION_GOAL_ML
        ));
    }
    Ok(())
}

/// Validate a nutrient quantity (calories or grams); zero is allowed
pub fn validate_nutrient(value: f64, field: &str) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{} must be a valid number", field));
    }
    if value < 0.0 {
        return Err(format!("{} cannot be negative", field));
    }
    Ok(())
}

/// Validate goal priority (1 = highest, 5 = lowest)
pub fn validate_priority(priority: i32) -> Result<(), String> {
    if !(1..=5).contains(&priority) {
        return Err("Priority must be between 1 and 5".to_string());
    }
    Ok(())
}

/// Validate a strictly positive amount (goal targets and progress)
pub fn validate_positive_amount(value: f64, field: &str) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{} must be a valid number", field));
    }
    if value <= 0.0 {
        return Err(format!("{} must be greater than zero", field));
    }
    Ok(())
}

/// Validate planned set/rep counts for an exercise entry
pub fn validate_planned_volume(
    sets: i32,
    reps: Option<i32>,
    duration_seconds: Option<i32>,
) -> Result<(), String> {
    if sets < 1 {
        return Err("An exercise needs at least one set".to_string());
    }
    match (reps, duration_seconds) {
        (None, None) => Err("An exercise needs either reps or a duration".to_string()),
        (Some(r), _) if r < 1 => Err("Reps must be at least 1".to_string()),
        (_, Some(d)) if d < 1 => Err("Duration must be at least 1 second".to_string()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, true)]
    #[case(45, true)]
    #[case(1440, true)]
    #[case(-1, false)]
    #[case(1441, false)]
    fn test_duration_bounds(#[case] minutes: i32, #[case] ok: bool) {
        assert_eq!(validate_duration_minutes(minutes).is_ok(), ok);
    }

    #[test]
    fn test_calories() {
        assert!(validate_calories(0).is_ok());
        assert!(validate_calories(-10).is_err());
        assert!(validate_calories(50_000).is_err());
    }

    #[test]
    fn test_priority() {
        assert!(validate_priority(1).is_ok());
        assert!(validate_priority(5).is_ok());
        assert!(validate_priority(0).is_err());
        assert!(validate_priority(6).is_err());
    }

    #[test]
    fn test_positive_amount() {
        assert!(validate_positive_amount(0.5, "Amount").is_ok());
        assert!(validate_positive_amount(0.0, "Amount").is_err());
        assert!(validate_positive_amount(f64::NAN, "Amount").is_err());
    }

    #[rstest]
    #[case(250, true)]
    #[case(MAX_WATER_ENTRY_ML, true)]
    #[case(0, false)]
    #[case(-100, false)]
    #[case(MAX_WATER_ENTRY_ML + 1, false)]
    fn test_water_amount(#[case] amount: i32, #[case] ok: bool) {
        assert_eq!(validate_water_amount(amount).is_ok(), ok);
    }

    #[test]
    fn test_hydration_goal_bounds() {
        assert!(validate_hydration_goal(2500).is_ok());
        assert!(validate_hydration_goal(0).is_err());
        assert!(validate_hydration_goal(MAX_HYDRATION_GOAL_ML + 1).is_err());
    }

    #[test]
    fn test_nutrient() {
        assert!(validate_nutrient(0.0, "Protein").is_ok());
        assert!(validate_nutrient(-0.5, "Protein").is_err());
        assert!(validate_nutrient(f64::INFINITY, "Calories").is_err());
    }

    #[rstest]
    #[case(3, Some(10), None, true)]
    #[case(3, None, Some(30), true)]
    #[case(0, Some(10), None, false)]
    #[case(3, None, None, false)]
    #[case(3, Some(0), None, false)]
    fn test_planned_volume(
        #[case] sets: i32,
        #[case] reps: Option<i32>,
        #[case] duration: Option<i32>,
        #[case] ok: bool,
    ) {
        assert_eq!(validate_planned_volume(sets, reps, duration).is_ok(), ok);
    }
}
