//! Reference data seeding
//!
//! Inserts the exercise catalog, the achievement catalog and, when a system
//! user is configured, a handful of public starter templates. Every insert
//! is keyed on a unique name or key, so seeding can run on every startup.

use crate::config::SeedingConfig;
use crate::repositories::{
    AchievementRepository, AddWorkoutExercise, CreateAchievement, CreateExercise, CreateWorkout,
    ExerciseRepository, UserRepository, WorkoutExerciseRepository, WorkoutRepository,
};
use crate::services::estimator::{self, EstimateEntry};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};
use uuid::Uuid;
use workout_tracker_shared::{Requirement, WorkoutStatus};

/// How many rows each catalog gained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub exercises: usize,
    pub achievements: usize,
    pub templates: usize,
}

struct SeedExercise {
    name: &'static str,
    body_part: &'static str,
    category: &'static str,
    difficulty: &'static str,
    /// kcal per active minute, in hundredths
    calorie_rate: i64,
    equipment: Option<&'static str>,
    description: &'static str,
}

const EXERCISES: &[SeedExercise] = &[
    SeedExercise {
        name: "Push-up",
        body_part: "chest",
        category: "strength",
        difficulty: "beginner",
        calorie_rate: 700,
        equipment: None,
        description: "Bodyweight press from a plank position",
    },
    SeedExercise {
        name: "Bench Press",
        body_part: "chest",
        category: "strength",
        difficulty: "intermediate",
        calorie_rate: 600,
        equipment: Some("barbell"),
        description: "Horizontal barbell press on a flat bench",
    },
    SeedExercise {
        name: "Pull-up",
        body_part: "back",
        category: "strength",
        difficulty: "intermediate",
        calorie_rate: 800,
        equipment: Some("pull-up bar"),
        description: "Vertical pull from a dead hang",
    },
    SeedExercise {
        name: "Bent-over Row",
        body_part: "back",
        category: "strength",
        difficulty: "intermediate",
        calorie_rate: 600,
        equipment: Some("barbell"),
        description: "Hip-hinged barbell row to the lower ribs",
    },
    SeedExercise {
        name: "Deadlift",
        body_part: "back",
        category: "strength",
        difficulty: "advanced",
        calorie_rate: 900,
        equipment: Some("barbell"),
        description: "Barbell lift from the floor to lockout",
    },
    SeedExercise {
        name: "Bodyweight Squat",
        body_part: "legs",
        category: "strength",
        difficulty: "beginner",
        calorie_rate: 600,
        equipment: None,
        description: "Squat to depth with arms forward",
    },
    SeedExercise {
        name: "Back Squat",
        body_part: "legs",
        category: "strength",
        difficulty: "intermediate",
        calorie_rate: 800,
        equipment: Some("barbell"),
        description: "Barbell squat with the bar on the upper back",
    },
    SeedExercise {
        name: "Walking Lunge",
        body_part: "legs",
        category: "strength",
        difficulty: "beginner",
        calorie_rate: 650,
        equipment: None,
        description: "Alternating forward lunges",
    },
    SeedExercise {
        name: "Overhead Press",
        body_part: "shoulders",
        category: "strength",
        difficulty: "intermediate",
        calorie_rate: 550,
        equipment: Some("barbell"),
        description: "Standing barbell press overhead",
    },
    SeedExercise {
        name: "Plank",
        body_part: "core",
        category: "strength",
        difficulty: "beginner",
        calorie_rate: 400,
        equipment: None,
        description: "Forearm plank held for time",
    },
    SeedExercise {
        name: "Mountain Climber",
        body_part: "core",
        category: "cardio",
        difficulty: "beginner",
        calorie_rate: 1000,
        equipment: None,
        description: "Alternating knee drives from a high plank",
    },
    SeedExercise {
        name: "Burpee",
        body_part: "full_body",
        category: "cardio",
        difficulty: "intermediate",
        calorie_rate: 1200,
        equipment: None,
        description: "Squat thrust with a jump",
    },
    SeedExercise {
        name: "Jumping Jack",
        body_part: "full_body",
        category: "cardio",
        difficulty: "beginner",
        calorie_rate: 800,
        equipment: None,
        description: "Star jumps at a steady pace",
    },
    SeedExercise {
        name: "Running",
        body_part: "legs",
        category: "cardio",
        difficulty: "beginner",
        calorie_rate: 1100,
        equipment: None,
        description: "Steady-state run",
    },
    SeedExercise {
        name: "Rowing Machine",
        body_part: "full_body",
        category: "cardio",
        difficulty: "intermediate",
        calorie_rate: 900,
        equipment: Some("rower"),
        description: "Steady-state erg rowing",
    },
    SeedExercise {
        name: "Hamstring Stretch",
        body_part: "legs",
        category: "flexibility",
        difficulty: "beginner",
        calorie_rate: 250,
        equipment: None,
        description: "Seated forward fold",
    },
];

/// Catalog achievement with its requirement in the legacy map form
fn achievement_catalog() -> Vec<(CreateAchievement, serde_json::Value)> {
    let entry = |key: &str,
                 name: &str,
                 description: &str,
                 category: &str,
                 rarity: &str,
                 points: i32,
                 sort_order: i32,
                 requirement: serde_json::Value| {
        (
            CreateAchievement {
                key: key.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                rarity: rarity.to_string(),
                points,
                requirement: serde_json::Value::Null,
                sort_order,
            },
            requirement,
        )
    };

    vec![
        entry("first_workout", "First Sweat", "Complete your first workout", "workouts", "common", 10, 10, json!({"workouts_completed": 1})),
        entry("ten_workouts", "Regular", "Complete 10 workouts", "workouts", "common", 25, 20, json!({"workouts_completed": 10})),
        entry("fifty_workouts", "Committed", "Complete 50 workouts", "workouts", "rare", 75, 30, json!({"workouts_completed": 50})),
        entry("hundred_workouts", "Centurion", "Complete 100 workouts", "workouts", "epic", 150, 40, json!({"workouts_completed": 100})),
        entry("ten_hours", "Ten Hours In", "Train for 600 minutes in total", "workouts", "rare", 50, 50, json!({"total_workout_minutes": 600})),
        entry("calorie_burner", "Calorie Burner", "Burn 10000 calories in total", "workouts", "epic", 100, 60, json!({"total_calories_burned": 10000})),
        entry("first_goal", "Goal Setter", "Complete your first goal", "goals", "common", 10, 70, json!({"goals_completed": 1})),
        entry("five_goals", "Goal Getter", "Complete 5 goals", "goals", "rare", 50, 80, json!({"goals_completed": 5})),
        entry("weekly_double", "Big Week", "Complete 2 goals in one week", "goals", "rare", 40, 90, json!({"weekly_goals_completed": 2})),
        entry("streak_3", "On a Roll", "Stay active 3 days in a row", "streaks", "common", 15, 100, json!({"current_streak": 3})),
        entry("streak_7", "Week Warrior", "Stay active 7 days in a row", "streaks", "rare", 50, 110, json!({"current_streak": 7})),
        entry("streak_30", "Unbreakable", "Stay active 30 days in a row", "streaks", "legendary", 200, 120, json!({"best_streak": 30})),
        entry("level_5", "Rising Star", "Reach level 5", "levels", "epic", 100, 130, json!({"level": 5})),
        entry(
            "all_rounder",
            "All-Rounder",
            "Complete 25 workouts and 5 goals",
            "special",
            "epic",
            120,
            140,
            json!({"workouts_completed": 25, "goals_completed": 5}),
        ),
    ]
}

struct SeedTemplate {
    name: &'static str,
    description: &'static str,
    difficulty: &'static str,
    workout_type: &'static str,
    focus: &'static str,
    intensity: &'static str,
    /// (exercise name, sets, reps, duration seconds, rest seconds)
    entries: &'static [(&'static str, i32, Option<i32>, Option<i32>, i32)],
}

const TEMPLATES: &[SeedTemplate] = &[
    SeedTemplate {
        name: "Beginner Full Body",
        description: "Bodyweight circuit for the first weeks of training",
        difficulty: "beginner",
        workout_type: "strength",
        focus: "full_body",
        intensity: "low",
        entries: &[
            ("Bodyweight Squat", 3, Some(12), None, 60),
            ("Push-up", 3, Some(10), None, 60),
            ("Walking Lunge", 2, Some(10), None, 60),
            ("Plank", 3, None, Some(30), 45),
        ],
    },
    SeedTemplate {
        name: "Upper Body Strength",
        description: "Barbell pressing and pulling",
        difficulty: "intermediate",
        workout_type: "strength",
        focus: "upper_body",
        intensity: "moderate",
        entries: &[
            ("Bench Press", 4, Some(8), None, 120),
            ("Bent-over Row", 4, Some(8), None, 90),
            ("Overhead Press", 3, Some(8), None, 90),
            ("Pull-up", 3, Some(6), None, 90),
        ],
    },
    SeedTemplate {
        name: "Cardio Blast",
        description: "Short high-intensity conditioning session",
        difficulty: "intermediate",
        workout_type: "cardio",
        focus: "conditioning",
        intensity: "high",
        entries: &[
            ("Jumping Jack", 3, None, Some(45), 15),
            ("Burpee", 3, Some(10), None, 30),
            ("Mountain Climber", 3, None, Some(40), 20),
            ("Running", 1, None, Some(600), 0),
        ],
    },
];

/// Seed every catalog. Safe to call repeatedly.
pub async fn seed_catalog(pool: &PgPool, config: &SeedingConfig) -> Result<SeedReport> {
    let mut tx = pool.begin().await.context("Failed to begin seeding transaction")?;

    let mut report = SeedReport {
        exercises: seed_exercises(&mut tx).await?,
        achievements: seed_achievements(&mut tx).await?,
        templates: 0,
    };

    if let Some(system_user_id) = config.system_user_id {
        if UserRepository::exists(&mut tx, system_user_id).await? {
            report.templates = seed_templates(&mut tx, system_user_id).await?;
        } else {
            warn!(user_id = %system_user_id, "System user not found, skipping starter templates");
        }
    }

    tx.commit().await.context("Failed to commit seed data")?;

    info!(
        exercises = report.exercises,
        achievements = report.achievements,
        templates = report.templates,
        "Catalog seeding complete"
    );
    Ok(report)
}

async fn seed_exercises(conn: &mut PgConnection) -> Result<usize> {
    let mut inserted = 0;
    for exercise in EXERCISES {
        let input = CreateExercise {
            name: exercise.name.to_string(),
            body_part: exercise.body_part.to_string(),
            category: exercise.category.to_string(),
            difficulty: exercise.difficulty.to_string(),
            calorie_rate: Decimal::new(exercise.calorie_rate, 2),
            equipment: exercise.equipment.map(str::to_string),
            description: Some(exercise.description.to_string()),
            instructions: None,
        };
        if ExerciseRepository::insert_if_absent(conn, &input).await? {
            inserted += 1;
        }
    }
    Ok(inserted)
}

async fn seed_achievements(conn: &mut PgConnection) -> Result<usize> {
    let mut inserted = 0;
    for (mut achievement, legacy) in achievement_catalog() {
        let requirement = Requirement::from_json(&legacy)
            .with_context(|| format!("Invalid requirement for achievement {}", achievement.key))?;
        achievement.requirement = requirement.to_json();

        if AchievementRepository::insert_if_absent(conn, &achievement).await? {
            inserted += 1;
        }
    }
    Ok(inserted)
}

async fn seed_templates(conn: &mut PgConnection, owner: Uuid) -> Result<usize> {
    let existing: Vec<String> = WorkoutRepository::list_visible_templates(conn, owner)
        .await?
        .into_iter()
        .filter(|t| t.user_id == owner)
        .map(|t| t.name)
        .collect();

    let mut inserted = 0;
    for template in TEMPLATES {
        if existing.iter().any(|name| name == template.name) {
            continue;
        }

        let workout = WorkoutRepository::create(
            conn,
            CreateWorkout {
                user_id: owner,
                name: template.name.to_string(),
                description: Some(template.description.to_string()),
                is_template: true,
                is_public: true,
                template_id: None,
                difficulty: Some(template.difficulty.to_string()),
                workout_type: Some(template.workout_type.to_string()),
                focus: Some(template.focus.to_string()),
                intensity: Some(template.intensity.to_string()),
                status: WorkoutStatus::Planned.as_str().to_string(),
                started_at: None,
                estimated_duration: None,
                estimated_calories: None,
            },
        )
        .await?;

        let mut entries = Vec::with_capacity(template.entries.len());
        for (sort_order, (exercise_name, sets, reps, duration_seconds, rest_seconds)) in
            (0..).zip(template.entries.iter())
        {
            let Some(exercise_id) = ExerciseRepository::find_id_by_name(conn, exercise_name).await?
            else {
                warn!(template = template.name, exercise = *exercise_name, "Unknown exercise in starter template");
                continue;
            };

            let entry = WorkoutExerciseRepository::create(
                conn,
                AddWorkoutExercise {
                    workout_id: workout.id,
                    exercise_id,
                    sort_order,
                    planned_sets: *sets,
                    planned_reps: *reps,
                    planned_weight_kg: None,
                    planned_duration_seconds: *duration_seconds,
                    planned_rest_seconds: *rest_seconds,
                },
            )
            .await?;
            entries.push(EstimateEntry::from_planned_entry(&entry));
        }

        let estimate = estimator::estimate(&entries);
        WorkoutRepository::update_estimates(conn, workout.id, estimate.duration_minutes, estimate.calories)
            .await?;
        inserted += 1;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use workout_tracker_shared::{Difficulty, Rarity, Statistic};

    #[test]
    fn test_exercise_names_are_unique_and_valid() {
        let mut names = HashSet::new();
        for exercise in EXERCISES {
            assert!(names.insert(exercise.name), "duplicate exercise {}", exercise.name);
            assert!(exercise.difficulty.parse::<Difficulty>().is_ok());
            assert!(exercise.calorie_rate > 0);
        }
    }

    #[test]
    fn test_achievement_requirements_parse() {
        let mut keys = HashSet::new();
        for (achievement, legacy) in achievement_catalog() {
            assert!(keys.insert(achievement.key.clone()), "duplicate key {}", achievement.key);
            assert!(achievement.rarity.parse::<Rarity>().is_ok());
            assert!(achievement.points > 0);
            assert!(Requirement::from_json(&legacy).is_ok(), "bad requirement for {}", achievement.key);
        }
    }

    #[test]
    fn test_legacy_requirement_is_stored_canonically() {
        let (_, legacy) = achievement_catalog()
            .into_iter()
            .find(|(a, _)| a.key == "five_goals")
            .unwrap();
        let requirement = Requirement::from_json(&legacy).unwrap();

        assert_eq!(requirement, Requirement::at_least(Statistic::GoalsCompleted, 5));
        assert_eq!(Requirement::from_json(&requirement.to_json()).unwrap(), requirement);
    }

    #[test]
    fn test_template_entries_reference_catalog() {
        let names: HashSet<&str> = EXERCISES.iter().map(|e| e.name).collect();
        for template in TEMPLATES {
            assert!(template.difficulty.parse::<Difficulty>().is_ok());
            for (exercise, sets, reps, duration, _) in template.entries {
                assert!(names.contains(exercise), "{} is not in the catalog", exercise);
                assert!(*sets > 0);
                assert!(reps.is_some() || duration.is_some());
            }
        }
    }
}
