//! Achievement evaluation
//!
//! Compares a user's score snapshot against the active catalog and records
//! every newly satisfied achievement. Unlocks feed back into the snapshot
//! (points, unlock count, level), so evaluation repeats until a pass unlocks
//! nothing. Re-running with an unchanged score unlocks nothing.

use crate::clock::Clock;
use crate::config::ScoringConfig;
use crate::error::ApiError;
use crate::repositories::{
    AchievementRecord, AchievementRepository, ScoreValues, UserAchievementRecord,
    UserAchievementRepository, UserScoreRecord, UserScoreRepository,
};
use crate::services::statistics::{level_for, StatisticsService};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};
use uuid::Uuid;
use workout_tracker_shared::{Rarity, Requirement, StatSnapshot};

/// Catalog entry with its requirement parsed
#[derive(Debug, Clone)]
pub struct CatalogAchievement {
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub rarity: Rarity,
    pub points: i32,
    pub requirement: Requirement,
}

/// Achievement unlocked by an evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockedAchievement {
    pub achievement_id: Uuid,
    pub key: String,
    pub name: String,
    pub points_earned: i32,
    pub unlocked_at: DateTime<Utc>,
}

/// Catalog entry annotated with the user's unlock state
#[derive(Debug, Clone)]
pub struct AchievementStatus {
    pub achievement: CatalogAchievement,
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// Achievement service
pub struct AchievementService;

impl AchievementService {
    /// Unlock every active achievement the score now satisfies.
    ///
    /// Returns the updated score and the achievements unlocked by this call.
    pub async fn evaluate(
        conn: &mut PgConnection,
        user_id: Uuid,
        score: UserScoreRecord,
        scoring: &ScoringConfig,
        clock: &dyn Clock,
    ) -> Result<(UserScoreRecord, Vec<UnlockedAchievement>), ApiError> {
        let catalog = Self::load_catalog(conn).await?;
        let already: HashSet<Uuid> = UserAchievementRepository::list_by_user(conn, user_id)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(|u| u.achievement_id)
            .collect();

        let (planned, values) = plan_unlocks(&catalog, &already, score.values(), scoring);
        if planned.is_empty() {
            return Ok((score, Vec::new()));
        }

        let now = clock.now();
        let mut unlocked = Vec::with_capacity(planned.len());
        let mut lost_race = false;

        for achievement in planned {
            let inserted = UserAchievementRepository::insert_if_absent(
                conn,
                user_id,
                achievement.id,
                achievement.points,
                now,
            )
            .await
            .map_err(ApiError::Internal)?;

            match inserted {
                Some(unlocked_at) => {
                    info!(
                        user_id = %user_id,
                        achievement = %achievement.key,
                        points = achievement.points,
                        "Achievement unlocked"
                    );
                    metrics::counter!("achievements_unlocked_total").increment(1);
                    unlocked.push(UnlockedAchievement {
                        achievement_id: achievement.id,
                        key: achievement.key.clone(),
                        name: achievement.name.clone(),
                        points_earned: achievement.points,
                        unlocked_at,
                    });
                }
                None => lost_race = true,
            }
        }

        // Someone else recorded part of this batch; derive the score from
        // what is actually stored instead of the in-memory plan.
        let score = if lost_race {
            StatisticsService::recompute_user_score(conn, user_id, scoring, clock).await?
        } else {
            UserScoreRepository::upsert(conn, user_id, &values, now)
                .await
                .map_err(ApiError::Internal)?
        };

        Ok((score, unlocked))
    }

    /// Recompute the score, then evaluate against it, in one transaction
    pub async fn recompute_and_evaluate(
        pool: &PgPool,
        user_id: Uuid,
        scoring: &ScoringConfig,
        clock: &dyn Clock,
    ) -> Result<(UserScoreRecord, Vec<UnlockedAchievement>), ApiError> {
        let mut tx = pool.begin().await?;
        let score = StatisticsService::recompute_user_score(&mut tx, user_id, scoring, clock).await?;
        let result = Self::evaluate(&mut tx, user_id, score, scoring, clock).await?;
        tx.commit().await?;
        Ok(result)
    }

    /// Active catalog annotated with the user's unlocks
    pub async fn list_achievements(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<AchievementStatus>, ApiError> {
        let mut conn = pool.acquire().await?;
        let catalog = Self::load_catalog(&mut conn).await?;
        let unlocks: HashMap<Uuid, DateTime<Utc>> =
            UserAchievementRepository::list_by_user(&mut conn, user_id)
                .await
                .map_err(ApiError::Internal)?
                .into_iter()
                .map(|u| (u.achievement_id, u.unlocked_at))
                .collect();

        Ok(catalog
            .into_iter()
            .map(|achievement| AchievementStatus {
                unlocked_at: unlocks.get(&achievement.id).copied(),
                achievement,
            })
            .collect())
    }

    /// Everything the user has unlocked
    pub async fn list_unlocked(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<UnlockedAchievement>, ApiError> {
        let mut conn = pool.acquire().await?;
        let records = UserAchievementRepository::list_by_user(&mut conn, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Self::record_to_unlocked).collect())
    }

    /// Active catalog with parsed requirements. Rows whose requirement or
    /// rarity cannot be parsed are skipped with a warning.
    async fn load_catalog(conn: &mut PgConnection) -> Result<Vec<CatalogAchievement>, ApiError> {
        let records = AchievementRepository::list_active(conn)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records
            .into_iter()
            .filter_map(|record| match Self::record_to_catalog(&record) {
                Ok(achievement) => Some(achievement),
                Err(e) => {
                    warn!(achievement = %record.key, error = %e, "Skipping unparseable achievement");
                    None
                }
            })
            .collect())
    }

    fn record_to_catalog(
        record: &AchievementRecord,
    ) -> Result<CatalogAchievement, workout_tracker_shared::DomainError> {
        Ok(CatalogAchievement {
            id: record.id,
            key: record.key.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            category: record.category.clone(),
            rarity: record.rarity.parse()?,
            points: record.points,
            requirement: Requirement::from_json(&record.requirement)?,
        })
    }

    fn record_to_unlocked(record: UserAchievementRecord) -> UnlockedAchievement {
        UnlockedAchievement {
            achievement_id: record.achievement_id,
            key: record.key,
            name: record.name,
            points_earned: record.points_earned,
            unlocked_at: record.unlocked_at,
        }
    }
}

/// View of score values as the requirement predicates see them
pub fn snapshot_of(values: &ScoreValues) -> StatSnapshot {
    StatSnapshot {
        total_points: values.total_points,
        level: i64::from(values.level),
        current_streak: i64::from(values.current_streak),
        best_streak: i64::from(values.best_streak),
        goals_completed: i64::from(values.goals_completed),
        weekly_goals_completed: i64::from(values.weekly_goals_completed),
        monthly_goals_completed: i64::from(values.monthly_goals_completed),
        achievements_unlocked: i64::from(values.achievements_unlocked),
        workouts_completed: i64::from(values.workouts_completed),
        total_workout_minutes: values.total_workout_minutes,
        total_calories_burned: values.total_calories_burned,
    }
}

/// Decide which achievements unlock, applying each unlock to the score
/// before the next pass. Returns the unlocks in order and the final values.
pub fn plan_unlocks<'a>(
    catalog: &'a [CatalogAchievement],
    already_unlocked: &HashSet<Uuid>,
    mut values: ScoreValues,
    scoring: &ScoringConfig,
) -> (Vec<&'a CatalogAchievement>, ScoreValues) {
    let mut unlocked: HashSet<Uuid> = already_unlocked.clone();
    let mut planned = Vec::new();

    loop {
        let snapshot = snapshot_of(&values);
        let batch: Vec<&CatalogAchievement> = catalog
            .iter()
            .filter(|a| !unlocked.contains(&a.id))
            .filter(|a| a.requirement.is_satisfied_by(&snapshot))
            .collect();

        if batch.is_empty() {
            break;
        }

        for achievement in batch {
            unlocked.insert(achievement.id);
            apply_unlock(&mut values, achievement.points, scoring);
            planned.push(achievement);
        }
    }

    (planned, values)
}

/// Credit one unlock to the score
pub fn apply_unlock(values: &mut ScoreValues, points: i32, scoring: &ScoringConfig) {
    values.total_points += i64::from(points);
    values.achievements_unlocked += 1;
    let (level, progress) = level_for(values.total_points, scoring.points_per_level);
    values.level = level;
    values.level_progress = progress;
}
