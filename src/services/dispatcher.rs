//! Background delivery of due reminders.
//!
//! A recurring sweep loads all pending reminders whose scheduled time has
//! passed, notifies each one exactly once, and marks it sent. Sweeps never
//! overlap: if a tick fires while the previous sweep is still running, the
//! new sweep is skipped, not queued.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::database::connection::DatabaseManager;
use crate::database::models::{Olympiad, Reminder, ReminderKind, User};

// Upper bound on one sweep; a sweep that exceeds it is dropped and its
// unmarked reminders stay pending for the next tick.
const SWEEP_TIMEOUT: Duration = Duration::from_secs(300);

/// Delivery side effect invoked once per due reminder per sweep.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        kind: ReminderKind,
        user_id: i64,
        olympiad_id: i64,
    ) -> anyhow::Result<()>;
}

/// Sends reminder messages through the Telegram bot.
pub struct TelegramNotifier {
    bot: Bot,
    db: Arc<DatabaseManager>,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, db: Arc<DatabaseManager>) -> Self {
        Self { bot, db }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(
        &self,
        kind: ReminderKind,
        user_id: i64,
        olympiad_id: i64,
    ) -> anyhow::Result<()> {
        let user = User::find_by_id(&self.db.pool, user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("reminder references missing user {user_id}"))?;
        let olympiad = Olympiad::find_by_id(&self.db.pool, olympiad_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("reminder references missing olympiad {olympiad_id}"))?;

        let text = match kind {
            ReminderKind::RegWeek => format!(
                "⏰ Registration for \"{}\" closes in one week{}. Don't miss it!",
                olympiad.title,
                olympiad
                    .reg_deadline
                    .map(|d| format!(" (deadline {})", d.format("%d.%m.%Y")))
                    .unwrap_or_default(),
            ),
            ReminderKind::DayBefore => format!(
                "📅 \"{}\" takes place tomorrow. Good luck with the final prep!",
                olympiad.title
            ),
            ReminderKind::DayOf => format!(
                "🚀 \"{}\" is today. You've got this!",
                olympiad.title
            ),
        };

        self.bot.send_message(ChatId(user.tg_id), text).await?;
        Ok(())
    }
}

/// Result of one sweep invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// A previous sweep was still running; nothing was done.
    Skipped,
    Completed { sent: usize, failed: usize },
}

/// Periodically delivers due reminders.
pub struct ReminderDispatcher {
    db: Arc<DatabaseManager>,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    running: Mutex<()>,
}

impl ReminderDispatcher {
    pub fn new(db: Arc<DatabaseManager>, notifier: Arc<dyn Notifier>, interval: Duration) -> Self {
        Self {
            db,
            notifier,
            interval,
            running: Mutex::new(()),
        }
    }

    /// Runs one sweep: load due reminders, notify each once, mark sent.
    ///
    /// Delivery failures are isolated per reminder: the failure is logged,
    /// `sent_at` stays NULL and the next sweep retries it, while the rest of
    /// the batch still goes out. Returns [`SweepOutcome::Skipped`] without
    /// touching storage when another sweep holds the guard.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepOutcome, sqlx::Error> {
        let Ok(_guard) = self.running.try_lock() else {
            tracing::debug!("Reminder sweep still in flight, skipping this tick");
            return Ok(SweepOutcome::Skipped);
        };

        let due = Reminder::find_due(&self.db.pool, now).await?;
        if due.is_empty() {
            return Ok(SweepOutcome::Completed { sent: 0, failed: 0 });
        }

        let mut sent = 0;
        let mut failed = 0;
        for reminder in due {
            match self
                .notifier
                .notify(reminder.kind, reminder.user_id, reminder.olympiad_id)
                .await
            {
                Ok(()) => {
                    // The IS NULL guard in mark_sent makes the update a no-op
                    // if someone else already delivered this reminder.
                    match Reminder::mark_sent(&self.db.pool, &reminder.id, now).await {
                        Ok(true) => {
                            tracing::info!(
                                "Sent {} reminder {} to user {} for olympiad {}",
                                reminder.kind.as_str(),
                                reminder.id,
                                reminder.user_id,
                                reminder.olympiad_id
                            );
                            sent += 1;
                        }
                        Ok(false) => {}
                        Err(e) => {
                            // Notified but not marked: this one reminder will
                            // be delivered again next sweep, the rest of the
                            // batch still goes out.
                            tracing::error!(
                                "Delivered {} reminder {} but failed to mark it sent: {}",
                                reminder.kind.as_str(),
                                reminder.id,
                                e
                            );
                            failed += 1;
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to deliver {} reminder {} to user {}: {}",
                        reminder.kind.as_str(),
                        reminder.id,
                        reminder.user_id,
                        e
                    );
                    failed += 1;
                }
            }
        }

        Ok(SweepOutcome::Completed { sent, failed })
    }

    /// Spawns the recurring sweep task. At most one sweep runs at a time;
    /// missed ticks are skipped rather than queued.
    pub fn start(self: Arc<Self>) -> DispatcherHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let sweep = self.sweep(Utc::now());
                        match tokio::time::timeout(SWEEP_TIMEOUT, sweep).await {
                            Ok(Ok(_)) => {}
                            Ok(Err(e)) => {
                                tracing::error!("Reminder sweep failed: {}", e);
                            }
                            Err(_) => {
                                tracing::error!(
                                    "Reminder sweep exceeded {}s and was aborted",
                                    SWEEP_TIMEOUT.as_secs()
                                );
                            }
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        tracing::info!(
            "Reminder dispatcher started, sweeping every {}s",
            interval.as_secs()
        );

        DispatcherHandle {
            shutdown: shutdown_tx,
            handle,
        }
    }
}

/// Stops the dispatcher task on request or when dropped.
pub struct DispatcherHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl DispatcherHandle {
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
        tracing::info!("Reminder dispatcher stopped");
    }
}
