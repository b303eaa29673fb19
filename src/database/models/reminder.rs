use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, Transaction};
use uuid::Uuid;

/// Notification kinds derived from olympiad dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// One week before the registration deadline.
    RegWeek,
    /// The day before the round.
    DayBefore,
    /// The day of the round.
    DayOf,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::RegWeek => "reg_week",
            ReminderKind::DayBefore => "day_before",
            ReminderKind::DayOf => "day_of",
        }
    }
}

/// One scheduled notification. `sent_at = NULL` means pending.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub user_id: i64,
    pub olympiad_id: i64,
    pub kind: ReminderKind,
    pub scheduled_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl Reminder {
    /// Inserts a pending reminder unless one already exists for the same
    /// `(user, olympiad, kind)` triple. The unique constraint on the table
    /// makes this safe under concurrent inserts; returns whether a row was
    /// actually created.
    pub async fn insert_if_absent(
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        olympiad_id: i64,
        kind: ReminderKind,
        scheduled_at: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let id = Uuid::new_v4().to_string();

        let result = sqlx::query(
            "INSERT INTO reminders (id, user_id, olympiad_id, kind, scheduled_at, sent_at)
             VALUES (?, ?, ?, ?, ?, NULL)
             ON CONFLICT (user_id, olympiad_id, kind) DO NOTHING",
        )
        .bind(&id)
        .bind(user_id)
        .bind(olympiad_id)
        .bind(kind)
        .bind(scheduled_at)
        .execute(&mut *tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All pending reminders whose scheduled time has passed.
    pub async fn find_due(
        pool: &sqlx::SqlitePool,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            "SELECT id, user_id, olympiad_id, kind, scheduled_at, sent_at
             FROM reminders
             WHERE sent_at IS NULL AND datetime(scheduled_at) <= datetime(?)",
        )
        .bind(now)
        .fetch_all(pool)
        .await
    }

    /// Marks a reminder as delivered. The `sent_at IS NULL` guard keeps a
    /// reminder from being marked twice; returns whether this call won.
    pub async fn mark_sent(
        pool: &sqlx::SqlitePool,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reminders SET sent_at = ? WHERE id = ? AND sent_at IS NULL",
        )
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn find_for_favorite(
        pool: &sqlx::SqlitePool,
        user_id: i64,
        olympiad_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(
            "SELECT id, user_id, olympiad_id, kind, scheduled_at, sent_at
             FROM reminders
             WHERE user_id = ? AND olympiad_id = ?
             ORDER BY scheduled_at",
        )
        .bind(user_id)
        .bind(olympiad_id)
        .fetch_all(pool)
        .await
    }
}
