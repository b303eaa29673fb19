use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Prep material link attached to an olympiad by an admin.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    pub olympiad_id: i64,
    pub title: String,
    pub url: String,
    pub added_by_admin_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Material {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        olympiad_id: i64,
        title: &str,
        url: &str,
        added_by_admin_id: Option<i64>,
    ) -> Result<Self, sqlx::Error> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO materials (olympiad_id, title, url, added_by_admin_id, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(olympiad_id)
        .bind(title)
        .bind(url)
        .bind(added_by_admin_id)
        .bind(created_at)
        .execute(pool)
        .await?;

        Ok(Material {
            id: result.last_insert_rowid(),
            olympiad_id,
            title: title.to_string(),
            url: url.to_string(),
            added_by_admin_id,
            created_at,
        })
    }

    pub async fn find_by_olympiad(
        pool: &sqlx::SqlitePool,
        olympiad_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Material>(
            "SELECT id, olympiad_id, title, url, added_by_admin_id, created_at
             FROM materials WHERE olympiad_id = ? ORDER BY created_at DESC",
        )
        .bind(olympiad_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Material>(
            "SELECT id, olympiad_id, title, url, added_by_admin_id, created_at
             FROM materials ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &sqlx::SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM materials WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
