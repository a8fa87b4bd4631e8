//! User repository for database operations
//!
//! Users are provisioned by the identity service; this service only needs
//! to anchor ownership and check that a referenced user exists.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Register a user id handed over by the identity service
    pub async fn create(
        conn: &mut PgConnection,
        id: Uuid,
        email: &str,
        display_name: Option<&str>,
    ) -> Result<UserRecord> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, email, display_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, display_name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(display_name)
        .fetch_one(&mut *conn)
        .await?;

        Ok(record)
    }

    /// Check whether a user exists
    pub async fn exists(conn: &mut PgConnection, id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)"#)
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(exists)
    }

    /// Lock the user row for the rest of the transaction.
    /// Serializes session starts when concurrent sessions are disallowed.
    pub async fn lock_for_update(conn: &mut PgConnection, id: Uuid) -> Result<bool> {
        let locked = sqlx::query_scalar::<_, Uuid>(r#"SELECT id FROM users WHERE id = $1 FOR UPDATE"#)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(locked.is_some())
    }
}
