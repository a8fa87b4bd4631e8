//! Database repositories
//!
//! Data access layer. Every function takes `&mut PgConnection` so callers
//! can run it on a pooled connection or inside an open transaction.

pub mod achievement;
pub mod exercise;
pub mod goals;
pub mod hydration;
pub mod nutrition;
pub mod score;
pub mod user;
pub mod workout;

pub use achievement::{
    AchievementRecord, AchievementRepository, CreateAchievement, UserAchievementRecord,
    UserAchievementRepository,
};
pub use exercise::{CreateExercise, ExerciseFilter, ExerciseRecord, ExerciseRepository};
pub use goals::{
    CreateGoal, GoalProgressRecord, GoalProgressRepository, GoalRecord, GoalRepository, SaveGoal,
};
pub use hydration::{
    CreateWaterIntake, DailyWaterTotal, HydrationGoalRecord, HydrationGoalRepository,
    WaterIntakeRecord, WaterIntakeRepository,
};
pub use nutrition::{CreateMealEntry, MealEntryRecord, MealEntryRepository};
pub use score::{ScoreValues, UserScoreRecord, UserScoreRepository, WorkoutTotals};
pub use user::{UserRecord, UserRepository};
pub use workout::{
    AddWorkoutExercise, CompleteWorkout, CreateWorkout, RecordActuals, WorkoutExerciseRecord,
    WorkoutExerciseRepository, WorkoutRecord, WorkoutRepository,
};
