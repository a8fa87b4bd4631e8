//! Achievement catalog and unlock repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

// ============================================================================
// Catalog
// ============================================================================

/// Achievement record from database; `requirement` is stored JSON
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AchievementRecord {
    pub id: Uuid,
    pub key: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub rarity: String,
    pub points: i32,
    pub requirement: serde_json::Value,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Catalog entry written by seeding
#[derive(Debug, Clone)]
pub struct CreateAchievement {
    pub key: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub rarity: String,
    pub points: i32,
    pub requirement: serde_json::Value,
    pub sort_order: i32,
}

/// Achievement catalog repository
pub struct AchievementRepository;

impl AchievementRepository {
    /// Active achievements in display order
    pub async fn list_active(conn: &mut PgConnection) -> Result<Vec<AchievementRecord>> {
        let records = sqlx::query_as::<_, AchievementRecord>(
            r#"
            SELECT id, key, name, description, category, rarity, points, requirement,
                   is_active, sort_order
            FROM achievements
            WHERE is_active
            ORDER BY sort_order, key
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }

    /// Insert unless the key already exists; returns `true` when written
    pub async fn insert_if_absent(conn: &mut PgConnection, input: &CreateAchievement) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO achievements (key, name, description, category, rarity, points,
                                      requirement, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(&input.key)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.category)
        .bind(&input.rarity)
        .bind(input.points)
        .bind(&input.requirement)
        .bind(input.sort_order)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Unlocks
// ============================================================================

/// Unlock joined with the achievement's key and name
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserAchievementRecord {
    pub achievement_id: Uuid,
    pub key: String,
    pub name: String,
    pub points_earned: i32,
    pub unlocked_at: DateTime<Utc>,
}

/// User achievement repository
pub struct UserAchievementRepository;

impl UserAchievementRepository {
    /// Everything the user has unlocked, oldest first
    pub async fn list_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Vec<UserAchievementRecord>> {
        let records = sqlx::query_as::<_, UserAchievementRecord>(
            r#"
            SELECT ua.achievement_id, a.key, a.name, ua.points_earned, ua.unlocked_at
            FROM user_achievements ua
            JOIN achievements a ON a.id = ua.achievement_id
            WHERE ua.user_id = $1
            ORDER BY ua.unlocked_at, a.sort_order
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(records)
    }

    /// Record an unlock. A second insert for the same pair is a no-op and
    /// returns `None`.
    pub async fn insert_if_absent(
        conn: &mut PgConnection,
        user_id: Uuid,
        achievement_id: Uuid,
        points_earned: i32,
        unlocked_at: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>> {
        let inserted = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            INSERT INTO user_achievements (user_id, achievement_id, points_earned, unlocked_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, achievement_id) DO NOTHING
            RETURNING unlocked_at
            "#,
        )
        .bind(user_id)
        .bind(achievement_id)
        .bind(points_earned)
        .bind(unlocked_at)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(inserted)
    }

    /// Unlock count and points earned so far
    pub async fn totals(conn: &mut PgConnection, user_id: Uuid) -> Result<(i64, i64)> {
        let totals = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(points_earned), 0)::BIGINT
            FROM user_achievements
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(totals)
    }
}
