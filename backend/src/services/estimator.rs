//! Calorie and duration estimation
//!
//! Pure functions. Used when a template or planned workout is authored and
//! as the fallback for omitted values when a session completes.

use crate::repositories::WorkoutExerciseRecord;
use rust_decimal::prelude::ToPrimitive;

/// Seconds assumed per repetition when an entry has no explicit duration
pub const SECONDS_PER_REP: i64 = 3;

/// Lower bound on any estimated duration, in minutes
pub const MIN_DURATION_MINUTES: i32 = 1;

/// Lower bound on any estimated calorie count
pub const MIN_CALORIES: i32 = 10;

/// One exercise entry as seen by the estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateEntry {
    pub sets: i32,
    pub reps: Option<i32>,
    pub duration_seconds: Option<i32>,
    pub rest_seconds: i32,
    /// Calories per active minute
    pub calorie_rate: f64,
}

impl EstimateEntry {
    /// Active work in seconds: timed sets, or reps at a fixed pace
    fn active_seconds(&self) -> i64 {
        let sets = i64::from(self.sets.max(0));
        match self.duration_seconds.filter(|d| *d > 0) {
            Some(duration) => i64::from(duration) * sets,
            None => i64::from(self.reps.unwrap_or(0).max(0)) * SECONDS_PER_REP * sets,
        }
    }

    /// Rest between sets; none after the last one
    fn rest_seconds(&self) -> i64 {
        let gaps = i64::from(self.sets.max(1) - 1);
        i64::from(self.rest_seconds.max(0)) * gaps
    }

    /// Entry for a recorded session entry: performed values where recorded,
    /// planned values otherwise
    pub fn from_session_entry(entry: &WorkoutExerciseRecord) -> Self {
        let calorie_rate = entry.calorie_rate.to_f64().unwrap_or(0.0);
        match entry.actual_sets {
            Some(sets) => Self {
                sets,
                reps: entry.actual_reps.or(entry.planned_reps),
                duration_seconds: entry.actual_duration_seconds.or(entry.planned_duration_seconds),
                rest_seconds: entry.actual_rest_seconds.unwrap_or(entry.planned_rest_seconds),
                calorie_rate,
            },
            None => Self::from_planned_entry(entry),
        }
    }

    /// Entry built from the planned columns only
    pub fn from_planned_entry(entry: &WorkoutExerciseRecord) -> Self {
        Self {
            sets: entry.planned_sets,
            reps: entry.planned_reps,
            duration_seconds: entry.planned_duration_seconds,
            rest_seconds: entry.planned_rest_seconds,
            calorie_rate: entry.calorie_rate.to_f64().unwrap_or(0.0),
        }
    }
}

/// Aggregate estimate for a workout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Estimate {
    pub duration_minutes: i32,
    pub calories: i32,
}

/// Estimate total duration and calories for a list of entries.
///
/// Duration is the ceiling of active plus rest minutes; calories are the
/// rounded sum of active minutes times each entry's rate. Both are floored.
pub fn estimate(entries: &[EstimateEntry]) -> Estimate {
    let mut total_seconds: i64 = 0;
    let mut calories = 0.0_f64;

    for entry in entries {
        let active = entry.active_seconds();
        total_seconds += active + entry.rest_seconds();
        calories += active as f64 / 60.0 * entry.calorie_rate.max(0.0);
    }

    let minutes = (total_seconds + 59) / 60;
    let duration_minutes = i32::try_from(minutes).unwrap_or(i32::MAX);
    let calories = calories.round().min(f64::from(i32::MAX)) as i32;

    Estimate {
        duration_minutes: duration_minutes.max(MIN_DURATION_MINUTES),
        calories: calories.max(MIN_CALORIES),
    }
}

/// Share of entries with at least one performed set, as a whole percentage.
/// A workout with no entries counts as fully completed.
pub fn completion_percentage(entries: &[WorkoutExerciseRecord]) -> i32 {
    if entries.is_empty() {
        return 100;
    }
    let done = entries
        .iter()
        .filter(|e| e.actual_sets.map_or(false, |sets| sets > 0))
        .count();
    ((done * 100) / entries.len()) as i32
}

/// Epley one-rep-max; a single rep is its own maximum
pub fn one_rep_max(weight_kg: f64, reps: i32) -> Option<f64> {
    if weight_kg <= 0.0 || reps < 1 {
        return None;
    }
    if reps == 1 {
        return Some(weight_kg);
    }
    Some(weight_kg * (1.0 + f64::from(reps) / 30.0))
}
