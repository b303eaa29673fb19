use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, Transaction};

/// Telegram bot user.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub tg_id: i64,
    pub username: Option<String>,
    pub is_subscribed: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Looks up a user by Telegram id, creating the row if needed. A changed
    /// username is written back on the way.
    pub async fn get_or_create(
        tx: &mut Transaction<'_, Sqlite>,
        tg_id: i64,
        username: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let existing = sqlx::query_as::<_, User>(
            "SELECT id, tg_id, username, is_subscribed, created_at FROM users WHERE tg_id = ?",
        )
        .bind(tg_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(mut user) = existing {
            if let Some(name) = username {
                if user.username.as_deref() != Some(name) {
                    sqlx::query("UPDATE users SET username = ? WHERE id = ?")
                        .bind(name)
                        .bind(user.id)
                        .execute(&mut *tx)
                        .await?;
                    user.username = Some(name.to_string());
                }
            }
            return Ok(user);
        }

        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (tg_id, username, is_subscribed, created_at) VALUES (?, ?, FALSE, ?)",
        )
        .bind(tg_id)
        .bind(username)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            tg_id,
            username: username.map(str::to_string),
            is_subscribed: false,
            created_at,
        })
    }

    pub async fn find_by_tg_id(
        pool: &sqlx::SqlitePool,
        tg_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, tg_id, username, is_subscribed, created_at FROM users WHERE tg_id = ?",
        )
        .bind(tg_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, tg_id, username, is_subscribed, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn set_subscribed(
        tx: &mut Transaction<'_, Sqlite>,
        id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET is_subscribed = TRUE WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Ok(())
    }
}
