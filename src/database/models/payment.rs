use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, Transaction};

/// Stub payment record written when the subscription flow "completes".
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentStub {
    pub id: i64,
    pub user_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl PaymentStub {
    pub async fn create(
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        status: &str,
    ) -> Result<Self, sqlx::Error> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO payments_stub (user_id, status, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(status)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        Ok(PaymentStub {
            id: result.last_insert_rowid(),
            user_id,
            status: status.to_string(),
            created_at,
        })
    }

    pub async fn find_by_user(
        pool: &sqlx::SqlitePool,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, PaymentStub>(
            "SELECT id, user_id, status, created_at FROM payments_stub
             WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
