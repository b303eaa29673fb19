//! Listing and removing favorite olympiads.

use anyhow::Result;
use std::sync::Arc;

use crate::database::connection::DatabaseManager;
use crate::database::models::{Favorite, FavoriteOlympiad, User};

pub struct FavoritesService {
    db: Arc<DatabaseManager>,
}

impl FavoritesService {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// All favorites of a Telegram user, newest first. Unknown users simply
    /// have no favorites.
    pub async fn list_favorites(&self, tg_user_id: i64) -> Result<Vec<FavoriteOlympiad>> {
        let Some(user) = User::find_by_tg_id(&self.db.pool, tg_user_id).await? else {
            return Ok(Vec::new());
        };
        Ok(Favorite::list_for_user(&self.db.pool, user.id).await?)
    }

    /// Removes one favorite; returns whether anything was deleted.
    pub async fn remove_favorite(&self, tg_user_id: i64, olympiad_id: i64) -> Result<bool> {
        let Some(user) = User::find_by_tg_id(&self.db.pool, tg_user_id).await? else {
            return Ok(false);
        };
        Ok(Favorite::remove(&self.db.pool, user.id, olympiad_id).await?)
    }
}
