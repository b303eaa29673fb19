//! Reminder planning and scheduling.
//!
//! When a user favorites an olympiad this service derives which reminders
//! should exist from the registration deadline and round date, and persists
//! the ones that are not already stored. Delivery happens later, in the
//! background dispatcher.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use sqlx::{Sqlite, Transaction};
use std::sync::Arc;

use crate::database::connection::DatabaseManager;
use crate::database::models::{Reminder, ReminderKind};

/// A reminder that should exist: a proposal, not a persisted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPlan {
    pub kind: ReminderKind,
    pub scheduled_at: DateTime<Utc>,
}

/// Computes the reminders that should exist for the given olympiad dates.
///
/// Each rule yields at most one plan and an absent date suppresses its
/// plans, so the result has at most three entries. Order is unspecified.
///
/// A plan is only produced if its target date is today-or-future relative to
/// `now`'s date AND the resulting instant is still ahead of `now`. The date
/// check alone is not enough: a reminder for today would otherwise be
/// scheduled for a time of day that has already passed and fire immediately
/// on the next sweep.
pub fn build_plans(
    now: DateTime<Utc>,
    reg_deadline: Option<NaiveDate>,
    round_date: Option<NaiveDate>,
    time_of_day: NaiveTime,
) -> Vec<ReminderPlan> {
    let today = now.date_naive();
    let at = |date: NaiveDate| Utc.from_utc_datetime(&date.and_time(time_of_day));

    let mut plans = Vec::new();
    let mut push_if_upcoming = |kind: ReminderKind, date: NaiveDate| {
        if date >= today {
            let scheduled_at = at(date);
            if scheduled_at >= now {
                plans.push(ReminderPlan { kind, scheduled_at });
            }
        }
    };

    if let Some(deadline) = reg_deadline {
        push_if_upcoming(ReminderKind::RegWeek, deadline - Duration::days(7));
    }

    if let Some(round) = round_date {
        push_if_upcoming(ReminderKind::DayBefore, round - Duration::days(1));
        push_if_upcoming(ReminderKind::DayOf, round);
    }

    plans
}

/// Creates reminders when olympiads are favorited.
pub struct ReminderService {
    db: Arc<DatabaseManager>,
    time_of_day: NaiveTime,
}

impl ReminderService {
    pub fn new(db: Arc<DatabaseManager>, time_of_day: NaiveTime) -> Self {
        Self { db, time_of_day }
    }

    /// Idempotently creates the reminders implied by the olympiad dates,
    /// in a transaction of its own. Returns the number of newly created
    /// reminders; reminders that already exist or lie in the past are
    /// skipped.
    pub async fn schedule_for_favorite(
        &self,
        user_id: i64,
        olympiad_id: i64,
        reg_deadline: Option<NaiveDate>,
        round_date: Option<NaiveDate>,
    ) -> Result<u32, sqlx::Error> {
        self.schedule_for_favorite_at(Utc::now(), user_id, olympiad_id, reg_deadline, round_date)
            .await
    }

    /// Like [`Self::schedule_for_favorite`] but with an explicit clock.
    pub async fn schedule_for_favorite_at(
        &self,
        now: DateTime<Utc>,
        user_id: i64,
        olympiad_id: i64,
        reg_deadline: Option<NaiveDate>,
        round_date: Option<NaiveDate>,
    ) -> Result<u32, sqlx::Error> {
        let plans = build_plans(now, reg_deadline, round_date, self.time_of_day);
        if plans.is_empty() {
            return Ok(0);
        }

        let mut tx = self.db.pool.begin().await?;
        let created = insert_plans(&mut tx, user_id, olympiad_id, &plans).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Variant that composes into a caller-owned transaction, so favoriting
    /// and reminder creation commit or roll back together.
    pub async fn schedule_in_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        now: DateTime<Utc>,
        user_id: i64,
        olympiad_id: i64,
        reg_deadline: Option<NaiveDate>,
        round_date: Option<NaiveDate>,
    ) -> Result<u32, sqlx::Error> {
        let plans = build_plans(now, reg_deadline, round_date, self.time_of_day);
        insert_plans(tx, user_id, olympiad_id, &plans).await
    }
}

async fn insert_plans(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    olympiad_id: i64,
    plans: &[ReminderPlan],
) -> Result<u32, sqlx::Error> {
    let mut created = 0;
    for plan in plans {
        if Reminder::insert_if_absent(tx, user_id, olympiad_id, plan.kind, plan.scheduled_at)
            .await?
        {
            created += 1;
        }
    }
    Ok(created)
}
