use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, Transaction};

/// Olympiad catalog entry as persisted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Olympiad {
    pub id: i64,
    pub subject: String,
    pub title: String,
    pub reg_deadline: Option<NaiveDate>,
    pub round_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// A user's favorite olympiad joined with its catalog data.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FavoriteOlympiad {
    pub olympiad_id: i64,
    pub title: String,
    pub subject: String,
    pub reg_deadline: Option<NaiveDate>,
    pub round_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl Olympiad {
    /// Inserts the catalog row if it is not stored yet. The demo catalog
    /// lives in memory; rows are materialized on first favorite so that
    /// reminders and materials have something to reference.
    pub async fn ensure(
        tx: &mut Transaction<'_, Sqlite>,
        olympiad: &Olympiad,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT OR IGNORE INTO olympiads (id, subject, title, reg_deadline, round_date, description)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(olympiad.id)
        .bind(&olympiad.subject)
        .bind(&olympiad.title)
        .bind(olympiad.reg_deadline)
        .bind(olympiad.round_date)
        .bind(&olympiad.description)
        .execute(&mut *tx)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(
        pool: &sqlx::SqlitePool,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Olympiad>(
            "SELECT id, subject, title, reg_deadline, round_date, description
             FROM olympiads WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

/// Queries over the `user_olympiads` favorites relation.
pub struct Favorite;

impl Favorite {
    /// Returns whether the favorite was newly created.
    pub async fn insert_if_absent(
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        olympiad_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO user_olympiads (user_id, olympiad_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(olympiad_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn remove(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        olympiad_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_olympiads WHERE user_id = ? AND olympiad_id = ?",
        )
        .bind(user_id)
        .bind(olympiad_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All favorites of a user, newest first.
    pub async fn list_for_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Vec<FavoriteOlympiad>, sqlx::Error> {
        sqlx::query_as::<_, FavoriteOlympiad>(
            "SELECT o.id AS olympiad_id, o.title, o.subject, o.reg_deadline, o.round_date,
                    o.description, uo.created_at AS added_at
             FROM user_olympiads uo
             JOIN olympiads o ON o.id = uo.olympiad_id
             WHERE uo.user_id = ?
             ORDER BY uo.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
