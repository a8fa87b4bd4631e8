//! Achievement requirement predicates
//!
//! A requirement is a tagged union over `{statistic, comparison, value}`
//! thresholds, combinable with `all_of`. Requirements are evaluated against a
//! [`StatSnapshot`] of a user's score.
//!
//! Stored form:
//!
//! ```json
//! {"type": "threshold", "statistic": "goals_completed", "comparison": "gte", "value": 5}
//! ```
//!
//! The loose map form `{"goals_completed": 5}` is accepted by
//! [`Requirement::from_json`] and means "every listed statistic is at least
//! its value".

use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

/// A user statistic that achievement requirements can refer to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    TotalPoints,
    Level,
    CurrentStreak,
    BestStreak,
    GoalsCompleted,
    WeeklyGoalsCompleted,
    MonthlyGoalsCompleted,
    AchievementsUnlocked,
    WorkoutsCompleted,
    TotalWorkoutMinutes,
    TotalCaloriesBurned,
}

text_enum!(Statistic, "statistic", {
    TotalPoints => "total_points",
    Level => "level",
    CurrentStreak => "current_streak",
    BestStreak => "best_streak",
    GoalsCompleted => "goals_completed",
    WeeklyGoalsCompleted => "weekly_goals_completed",
    MonthlyGoalsCompleted => "monthly_goals_completed",
    AchievementsUnlocked => "achievements_unlocked",
    WorkoutsCompleted => "workouts_completed",
    TotalWorkoutMinutes => "total_workout_minutes",
    TotalCaloriesBurned => "total_calories_burned",
});

/// Comparison operator of a threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Gte,
    Gt,
    Eq,
    Lte,
    Lt,
}

impl Comparison {
    pub fn holds(&self, actual: i64, threshold: i64) -> bool {
        match self {
            Comparison::Gte => actual >= threshold,
            Comparison::Gt => actual > threshold,
            Comparison::Eq => actual == threshold,
            Comparison::Lte => actual <= threshold,
            Comparison::Lt => actual < threshold,
        }
    }
}

/// Point-in-time view of the statistics a user's score exposes
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatSnapshot {
    pub total_points: i64,
    pub level: i64,
    pub current_streak: i64,
    pub best_streak: i64,
    pub goals_completed: i64,
    pub weekly_goals_completed: i64,
    pub monthly_goals_completed: i64,
    pub achievements_unlocked: i64,
    pub workouts_completed: i64,
    pub total_workout_minutes: i64,
    pub total_calories_burned: i64,
}

impl StatSnapshot {
    pub fn get(&self, statistic: Statistic) -> i64 {
        match statistic {
            Statistic::TotalPoints => self.total_points,
            Statistic::Level => self.level,
            Statistic::CurrentStreak => self.current_streak,
            Statistic::BestStreak => self.best_streak,
            Statistic::GoalsCompleted => self.goals_completed,
            Statistic::WeeklyGoalsCompleted => self.weekly_goals_completed,
            Statistic::MonthlyGoalsCompleted => self.monthly_goals_completed,
            Statistic::AchievementsUnlocked => self.achievements_unlocked,
            Statistic::WorkoutsCompleted => self.workouts_completed,
            Statistic::TotalWorkoutMinutes => self.total_workout_minutes,
            Statistic::TotalCaloriesBurned => self.total_calories_burned,
        }
    }
}

/// Achievement requirement predicate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requirement {
    Threshold {
        statistic: Statistic,
        comparison: Comparison,
        value: i64,
    },
    AllOf {
        requirements: Vec<Requirement>,
    },
}

impl Requirement {
    /// `statistic >= value`
    pub fn at_least(statistic: Statistic, value: i64) -> Self {
        Requirement::Threshold {
            statistic,
            comparison: Comparison::Gte,
            value,
        }
    }

    pub fn is_satisfied_by(&self, snapshot: &StatSnapshot) -> bool {
        match self {
            Requirement::Threshold {
                statistic,
                comparison,
                value,
            } => comparison.holds(snapshot.get(*statistic), *value),
            Requirement::AllOf { requirements } => {
                requirements.iter().all(|r| r.is_satisfied_by(snapshot))
            }
        }
    }

    /// Parse a stored requirement, accepting either the tagged form or the
    /// loose `{statistic: minimum}` map.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, DomainError> {
        let object = value
            .as_object()
            .ok_or_else(|| DomainError::InvalidRequirement("expected an object".to_string()))?;

        let requirement = if object.contains_key("type") {
            serde_json::from_value::<Requirement>(value.clone())
                .map_err(|e| DomainError::InvalidRequirement(e.to_string()))?
        } else {
            let mut thresholds = Vec::with_capacity(object.len());
            for (key, raw) in object {
                let statistic: Statistic = key.parse()?;
                let minimum = raw.as_i64().ok_or_else(|| {
                    DomainError::InvalidRequirement(format!("{} must be an integer", key))
                })?;
                thresholds.push(Requirement::at_least(statistic, minimum));
            }
            match thresholds.len() {
                1 => thresholds.remove(0),
                _ => Requirement::AllOf {
                    requirements: thresholds,
                },
            }
        };

        requirement.validate()?;
        Ok(requirement)
    }

    /// Reject combinators that could never be meaningfully unlocked
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Requirement::Threshold { .. } => Ok(()),
            Requirement::AllOf { requirements } if requirements.is_empty() => Err(
                DomainError::InvalidRequirement("all_of requires at least one entry".to_string()),
            ),
            Requirement::AllOf { requirements } => {
                requirements.iter().try_for_each(Requirement::validate)
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
