//! Statistics aggregation
//!
//! Derives a user's score (points, level, streaks, goal counters and
//! workout totals) from their history and upserts the single score row.
//! Recomputation runs on whatever connection it is given, so completion
//! and goal updates can include it in their own transaction.

use crate::clock::Clock;
use crate::config::ScoringConfig;
use crate::error::ApiError;
use crate::repositories::{
    GoalRepository, ScoreValues, UserAchievementRepository, UserScoreRecord, UserScoreRepository,
    WorkoutRecord, WorkoutRepository, WorkoutTotals,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// Bucket for workouts without a type
const UNTYPED_WORKOUT: &str = "general";

/// Everything the score is derived from
#[derive(Debug, Clone, Default)]
pub struct ScoreInputs {
    /// Distinct days with qualifying activity
    pub activity_dates: Vec<NaiveDate>,
    /// Completion day of every completed goal
    pub goal_completions: Vec<NaiveDate>,
    pub workouts: WorkoutTotals,
    pub achievements_unlocked: i64,
    pub achievement_points: i64,
}

/// Totals over completed workouts in a date range
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSummary {
    pub total_workouts: i64,
    pub total_duration_minutes: i64,
    pub total_calories: i64,
    pub average_duration_minutes: f64,
    pub average_calories: f64,
    pub average_completion_percentage: f64,
    pub by_type: Vec<WorkoutTypeSummary>,
}

/// Per-type slice of a summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutTypeSummary {
    pub workout_type: String,
    pub count: i64,
    pub total_duration_minutes: i64,
    pub total_calories: i64,
}

/// Statistics service
pub struct StatisticsService;

impl StatisticsService {
    /// Recompute and persist the user's score
    pub async fn recompute_user_score(
        conn: &mut PgConnection,
        user_id: Uuid,
        scoring: &ScoringConfig,
        clock: &dyn Clock,
    ) -> Result<UserScoreRecord, ApiError> {
        let previous_best = UserScoreRepository::get(conn, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map_or(0, |score| score.best_streak);

        let activity_dates = UserScoreRepository::activity_dates(conn, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let goal_completions = GoalRepository::completion_times(conn, user_id)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(|at| at.date_naive())
            .collect();

        let workouts = UserScoreRepository::workout_totals(conn, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let (achievements_unlocked, achievement_points) =
            UserAchievementRepository::totals(conn, user_id)
                .await
                .map_err(ApiError::Internal)?;

        let inputs = ScoreInputs {
            activity_dates,
            goal_completions,
            workouts,
            achievements_unlocked,
            achievement_points,
        };
        let values = compute_score(&inputs, previous_best, scoring, clock.today());

        debug!(
            user_id = %user_id,
            total_points = values.total_points,
            level = values.level,
            current_streak = values.current_streak,
            goals_completed = values.goals_completed,
            "Recomputed user score"
        );

        UserScoreRepository::upsert(conn, user_id, &values, clock.now())
            .await
            .map_err(ApiError::Internal)
    }

    /// Current score; computed on first access
    pub async fn get_score(
        pool: &PgPool,
        user_id: Uuid,
        scoring: &ScoringConfig,
        clock: &dyn Clock,
    ) -> Result<UserScoreRecord, ApiError> {
        let mut tx = pool.begin().await?;

        let score = match UserScoreRepository::get(&mut tx, user_id)
            .await
            .map_err(ApiError::Internal)?
        {
            Some(score) => score,
            None => Self::recompute_user_score(&mut tx, user_id, scoring, clock).await?,
        };

        tx.commit().await?;
        Ok(score)
    }

    /// Summarize completed workouts between `start` and `end`, both inclusive
    pub async fn workout_summary(
        pool: &PgPool,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<WorkoutSummary, ApiError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ApiError::Validation(
                    "start must not be after end".to_string(),
                ));
            }
        }

        let mut conn = pool.acquire().await?;
        let workouts = WorkoutRepository::list_completed_in_range(
            &mut conn,
            user_id,
            start.map(start_of_day),
            end.map(|d| start_of_day(d + Duration::days(1))),
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(summarize(&workouts))
    }
}

// ============================================================================
// Pure score derivation
// ============================================================================

/// Derive all score values from history
pub fn compute_score(
    inputs: &ScoreInputs,
    previous_best: i32,
    scoring: &ScoringConfig,
    today: NaiveDate,
) -> ScoreValues {
    let goals_completed = inputs.goal_completions.len() as i64;
    let total_points =
        inputs.achievement_points + goals_completed * scoring.goal_completion_bonus;
    let (level, level_progress) = level_for(total_points, scoring.points_per_level);

    let current_streak = current_streak(&inputs.activity_dates, today);
    let best_streak = previous_best
        .max(longest_streak(&inputs.activity_dates))
        .max(current_streak);

    let week = week_start(today);
    let weekly_goals_completed = inputs
        .goal_completions
        .iter()
        .filter(|d| week_start(**d) == week && **d <= today)
        .count();
    let monthly_goals_completed = inputs
        .goal_completions
        .iter()
        .filter(|d| d.year() == today.year() && d.month() == today.month() && **d <= today)
        .count();

    ScoreValues {
        total_points,
        level,
        level_progress,
        current_streak,
        best_streak,
        goals_completed: clamp_i32(goals_completed),
        weekly_goals_completed: clamp_i32(weekly_goals_completed as i64),
        monthly_goals_completed: clamp_i32(monthly_goals_completed as i64),
        achievements_unlocked: clamp_i32(inputs.achievements_unlocked),
        workouts_completed: clamp_i32(inputs.workouts.workouts_completed),
        total_workout_minutes: inputs.workouts.total_minutes,
        total_calories_burned: inputs.workouts.total_calories,
    }
}

/// Level starts at 1 and rises every `points_per_level` points.
/// Progress is the percentage of the way to the next level.
pub fn level_for(total_points: i64, points_per_level: i64) -> (i32, i32) {
    let per_level = points_per_level.max(1);
    let points = total_points.max(0);
    let level = clamp_i32(points / per_level + 1);
    let progress = ((points % per_level) * 100 / per_level) as i32;
    (level, progress)
}

/// Consecutive active days ending today or yesterday
pub fn current_streak(dates: &[NaiveDate], today: NaiveDate) -> i32 {
    let mut days: Vec<NaiveDate> = dates.iter().copied().filter(|d| *d <= today).collect();
    days.sort_unstable();
    days.dedup();

    let Some(&last) = days.last() else {
        return 0;
    };
    if today - last > Duration::days(1) {
        return 0;
    }

    let mut streak = 1;
    for pair in days.windows(2).rev() {
        if pair[1] - pair[0] == Duration::days(1) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Longest run of consecutive active days anywhere in history
pub fn longest_streak(dates: &[NaiveDate]) -> i32 {
    let mut days = dates.to_vec();
    days.sort_unstable();
    days.dedup();

    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        run = match previous {
            Some(p) if day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }
    best
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_monday = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(days_from_monday)
}

/// Totals, averages and per-type breakdown of completed workouts
pub fn summarize(workouts: &[WorkoutRecord]) -> WorkoutSummary {
    let total_workouts = workouts.len() as i64;
    let mut total_duration_minutes = 0i64;
    let mut total_calories = 0i64;
    let mut total_completion = 0i64;
    let mut by_type: BTreeMap<String, WorkoutTypeSummary> = BTreeMap::new();

    for workout in workouts {
        let minutes = i64::from(workout.actual_duration.unwrap_or(0));
        let calories = i64::from(workout.actual_calories.unwrap_or(0));
        total_duration_minutes += minutes;
        total_calories += calories;
        total_completion += i64::from(workout.completion_percentage);

        let key = workout
            .workout_type
            .clone()
            .unwrap_or_else(|| UNTYPED_WORKOUT.to_string());
        let slice = by_type.entry(key.clone()).or_insert(WorkoutTypeSummary {
            workout_type: key,
            count: 0,
            total_duration_minutes: 0,
            total_calories: 0,
        });
        slice.count += 1;
        slice.total_duration_minutes += minutes;
        slice.total_calories += calories;
    }

    let average = |total: i64| {
        if total_workouts == 0 {
            0.0
        } else {
            total as f64 / total_workouts as f64
        }
    };

    WorkoutSummary {
        total_workouts,
        total_duration_minutes,
        total_calories,
        average_duration_minutes: average(total_duration_minutes),
        average_calories: average(total_calories),
        average_completion_percentage: average(total_completion),
        by_type: by_type.into_values().collect(),
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

fn clamp_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scoring() -> ScoringConfig {
        ScoringConfig {
            points_per_level: 100,
            goal_completion_bonus: 25,
        }
    }

    #[rstest]
    #[case(0, 1, 0)]
    #[case(99, 1, 99)]
    #[case(100, 2, 0)]
    #[case(250, 3, 50)]
    #[case(-10, 1, 0)]
    fn test_level_for(#[case] points: i64, #[case] level: i32, #[case] progress: i32) {
        assert_eq!(level_for(points, 100), (level, progress));
    }

    #[test]
    fn test_streak_ending_today() {
        let today = day(2025, 3, 10);
        let dates = vec![day(2025, 3, 8), day(2025, 3, 9), day(2025, 3, 10)];
        assert_eq!(current_streak(&dates, today), 3);
    }

    #[test]
    fn test_streak_ending_yesterday_still_counts() {
        let today = day(2025, 3, 10);
        let dates = vec![day(2025, 3, 8), day(2025, 3, 9)];
        assert_eq!(current_streak(&dates, today), 2);
    }

    #[test]
    fn test_streak_breaks_on_skipped_day() {
        let today = day(2025, 3, 10);
        assert_eq!(current_streak(&[day(2025, 3, 8)], today), 0);

        let gap = vec![day(2025, 3, 6), day(2025, 3, 7), day(2025, 3, 9), day(2025, 3, 10)];
        assert_eq!(current_streak(&gap, today), 2);
        assert_eq!(longest_streak(&gap), 2);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let dates = vec![day(2025, 2, 27), day(2025, 2, 28), day(2025, 3, 1)];
        assert_eq!(current_streak(&dates, day(2025, 3, 1)), 3);
    }

    #[test]
    fn test_week_start_is_monday() {
        let monday = day(2024, 12, 30);
        assert_eq!(week_start(monday), monday);
        assert_eq!(week_start(day(2025, 1, 5)), monday);
        assert_eq!(week_start(day(2025, 1, 1)), monday);
    }

    #[test]
    fn test_compute_score_buckets_goals() {
        // Wednesday
        let today = day(2025, 1, 15);
        let inputs = ScoreInputs {
            activity_dates: vec![day(2025, 1, 14), day(2025, 1, 15)],
            goal_completions: vec![
                day(2025, 1, 13), // this week
                day(2025, 1, 10), // last week, this month
                day(2024, 12, 31), // last month
            ],
            workouts: WorkoutTotals {
                workouts_completed: 4,
                total_minutes: 180,
                total_calories: 1500,
            },
            achievements_unlocked: 2,
            achievement_points: 60,
        };

        let values = compute_score(&inputs, 0, &scoring(), today);
        assert_eq!(values.goals_completed, 3);
        assert_eq!(values.weekly_goals_completed, 1);
        assert_eq!(values.monthly_goals_completed, 2);
        assert_eq!(values.total_points, 60 + 3 * 25);
        assert_eq!(values.level, 2);
        assert_eq!(values.level_progress, 35);
        assert_eq!(values.current_streak, 2);
        assert_eq!(values.best_streak, 2);
        assert_eq!(values.workouts_completed, 4);
        assert_eq!(values.total_workout_minutes, 180);
    }

    #[test]
    fn test_best_streak_keeps_previous_record() {
        let inputs = ScoreInputs {
            activity_dates: vec![day(2025, 1, 15)],
            ..Default::default()
        };
        let values = compute_score(&inputs, 12, &scoring(), day(2025, 1, 15));
        assert_eq!(values.current_streak, 1);
        assert_eq!(values.best_streak, 12);
    }

    fn completed(workout_type: Option<&str>, minutes: i32, calories: i32, pct: i32) -> WorkoutRecord {
        let now = Utc::now();
        WorkoutRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: "Session".to_string(),
            description: None,
            is_template: false,
            is_public: false,
            template_id: None,
            difficulty: None,
            workout_type: workout_type.map(str::to_string),
            focus: None,
            intensity: None,
            status: "completed".to_string(),
            started_at: Some(now),
            completed_at: Some(now),
            estimated_duration: None,
            estimated_calories: None,
            actual_duration: Some(minutes),
            actual_calories: Some(calories),
            completion_percentage: pct,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_summarize_groups_by_type() {
        let workouts = vec![
            completed(Some("strength"), 40, 300, 100),
            completed(Some("cardio"), 30, 350, 50),
            completed(Some("strength"), 50, 400, 100),
            completed(None, 20, 100, 0),
        ];
        let summary = summarize(&workouts);

        assert_eq!(summary.total_workouts, 4);
        assert_eq!(summary.total_duration_minutes, 140);
        assert_eq!(summary.total_calories, 1150);
        assert_eq!(summary.average_duration_minutes, 35.0);
        assert_eq!(summary.average_completion_percentage, 62.5);

        let types: Vec<_> = summary.by_type.iter().map(|t| t.workout_type.as_str()).collect();
        assert_eq!(types, vec!["cardio", "general", "strength"]);
        assert_eq!(summary.by_type[2].count, 2);
        assert_eq!(summary.by_type[2].total_calories, 700);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_workouts, 0);
        assert_eq!(summary.average_calories, 0.0);
        assert!(summary.by_type.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_best_streak_never_below_current(
            offsets in proptest::collection::vec(0i64..60, 0..40),
            previous_best in 0i32..10
        ) {
            let today = day(2025, 6, 30);
            let dates: Vec<_> = offsets.iter().map(|o| today - Duration::days(*o)).collect();
            let inputs = ScoreInputs { activity_dates: dates, ..Default::default() };
            let values = compute_score(&inputs, previous_best, &scoring(), today);
            prop_assert!(values.best_streak >= values.current_streak);
            prop_assert!(values.best_streak >= previous_best);
        }

        #[test]
        fn test_level_is_monotonic(a in 0i64..100_000, b in 0i64..100_000) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(level_for(low, 100).0 <= level_for(high, 100).0);
            let (_, progress) = level_for(high, 100);
            prop_assert!((0..100).contains(&progress));
        }
    }
}
