//! Domain enums for the Workout Tracker application
//!
//! Statuses and classifications are stored as text in the database; the
//! `as_str`/`FromStr` pairs here are the single mapping between the two.

use serde::{Deserialize, Serialize};

/// Workout session status
///
/// ```text
/// planned ──► in_progress ──► completed
///    │             │
///    └─────────────┴────────► cancelled
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

text_enum!(WorkoutStatus, "workout status", {
    Planned => "planned",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl WorkoutStatus {
    /// Completed and cancelled sessions accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkoutStatus::Completed | WorkoutStatus::Cancelled)
    }

    /// Whether the lifecycle permits moving from `self` to `next`
    pub fn can_transition_to(&self, next: WorkoutStatus) -> bool {
        use WorkoutStatus::*;
        matches!(
            (*self, next),
            (Planned, InProgress) | (Planned, Cancelled) | (InProgress, Completed) | (InProgress, Cancelled)
        )
    }

    pub const ALL: [WorkoutStatus; 4] = [
        WorkoutStatus::Planned,
        WorkoutStatus::InProgress,
        WorkoutStatus::Completed,
        WorkoutStatus::Cancelled,
    ];
}

/// Goal status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    NotStarted,
    Active,
    Completed,
    Paused,
}

text_enum!(GoalStatus, "goal status", {
    NotStarted => "not_started",
    Active => "active",
    Completed => "completed",
    Paused => "paused",
});

/// Difficulty shared by exercises and workouts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

text_enum!(Difficulty, "difficulty", {
    Beginner => "beginner",
    Intermediate => "intermediate",
    Advanced => "advanced",
});

/// Achievement rarity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

text_enum!(Rarity, "rarity", {
    Common => "common",
    Uncommon => "uncommon",
    Rare => "rare",
    Epic => "epic",
    Legendary => "legendary",
});

/// Meal slot a food entry belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

text_enum!(MealType, "meal type", {
    Breakfast => "breakfast",
    Lunch => "lunch",
    Dinner => "dinner",
    Snack => "snack",
});

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(WorkoutStatus::Planned, WorkoutStatus::InProgress, true)]
    #[case(WorkoutStatus::Planned, WorkoutStatus::Cancelled, true)]
    #[case(WorkoutStatus::Planned, WorkoutStatus::Completed, false)]
    #[case(WorkoutStatus::InProgress, WorkoutStatus::Completed, true)]
    #[case(WorkoutStatus::InProgress, WorkoutStatus::Cancelled, true)]
    #[case(WorkoutStatus::InProgress, WorkoutStatus::Planned, false)]
    #[case(WorkoutStatus::Completed, WorkoutStatus::Completed, false)]
    #[case(WorkoutStatus::Cancelled, WorkoutStatus::InProgress, false)]
    fn test_workout_transitions(
        #[case] from: WorkoutStatus,
        #[case] to: WorkoutStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in WorkoutStatus::ALL.iter().filter(|s| s.is_terminal()) {
            for to in WorkoutStatus::ALL {
                assert!(!from.can_transition_to(to), "{} -> {} allowed", from, to);
            }
        }
    }

    #[test]
    fn test_status_text_round_trip() {
        for status in WorkoutStatus::ALL {
            assert_eq!(status.as_str().parse::<WorkoutStatus>().unwrap(), status);
        }
        assert_eq!("not_started".parse::<GoalStatus>().unwrap(), GoalStatus::NotStarted);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = "finished".parse::<WorkoutStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown workout status: finished");
    }

    #[test]
    fn test_meal_type_parses_snake_case() {
        assert_eq!("snack".parse::<MealType>().unwrap(), MealType::Snack);
        assert!("brunch".parse::<MealType>().is_err());
    }
}
