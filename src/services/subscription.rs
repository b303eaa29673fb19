//! Stub subscription flow: fake payment links and instant activation.

use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

use crate::database::connection::DatabaseManager;
use crate::database::models::{PaymentStub, User};

pub struct SubscriptionService {
    db: Arc<DatabaseManager>,
    pay_provider: String,
    pay_return_url: String,
}

impl SubscriptionService {
    pub fn new(db: Arc<DatabaseManager>, pay_provider: String, pay_return_url: String) -> Self {
        Self {
            db,
            pay_provider,
            pay_return_url,
        }
    }

    pub async fn is_subscribed(&self, tg_user_id: i64) -> Result<bool> {
        Ok(User::find_by_tg_id(&self.db.pool, tg_user_id)
            .await?
            .map(|user| user.is_subscribed)
            .unwrap_or(false))
    }

    /// Generates a fake invoice link; no payment provider is contacted.
    pub async fn create_payment_link(
        &self,
        tg_user_id: i64,
        username: Option<&str>,
    ) -> Result<String> {
        let mut tx = self.db.pool.begin().await?;
        User::get_or_create(&mut tx, tg_user_id, username).await?;
        tx.commit().await?;

        let token = Uuid::new_v4().simple().to_string();
        let link = format!(
            "https://pay.{}/invoice/{}?return={}",
            self.pay_provider, token, self.pay_return_url
        );
        tracing::info!("Issued stub payment link for user {}", tg_user_id);
        Ok(link)
    }

    /// Marks the user subscribed and records a stub payment, as if the
    /// provider had called back.
    pub async fn activate(&self, tg_user_id: i64, username: Option<&str>) -> Result<()> {
        let mut tx = self.db.pool.begin().await?;
        let user = User::get_or_create(&mut tx, tg_user_id, username).await?;
        if !user.is_subscribed {
            User::set_subscribed(&mut tx, user.id).await?;
            PaymentStub::create(&mut tx, user.id, "succeeded").await?;
        }
        tx.commit().await?;

        tracing::info!("Subscription activated for user {}", tg_user_id);
        Ok(())
    }
}
