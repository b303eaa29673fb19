#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, TimeZone, Utc};
use olympiad_bot::database::connection::DatabaseManager;
use olympiad_bot::database::models::{Olympiad, Reminder, ReminderKind, User};
use olympiad_bot::services::catalog::CatalogService;
use olympiad_bot::services::dispatcher::{Notifier, ReminderDispatcher, SweepOutcome};
use olympiad_bot::services::reminder::ReminderService;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tokio::sync::Semaphore;

async fn setup_test_db() -> (Arc<DatabaseManager>, TempDir) {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.to_string_lossy());

    let db = DatabaseManager::new(&db_url).await.unwrap();
    db.run_migrations().await.unwrap();
    (Arc::new(db), dir)
}

async fn seed_reminder(
    db: &DatabaseManager,
    tg_id: i64,
    olympiad_id: i64,
    kind: ReminderKind,
    scheduled_at: DateTime<Utc>,
) -> (i64, i64) {
    let mut tx = db.pool.begin().await.unwrap();
    let user = User::get_or_create(&mut tx, tg_id, None).await.unwrap();
    let olympiad = Olympiad {
        id: olympiad_id,
        subject: "Physics".to_string(),
        title: format!("Olympiad #{olympiad_id}"),
        reg_deadline: None,
        round_date: None,
        description: None,
    };
    Olympiad::ensure(&mut tx, &olympiad).await.unwrap();
    Reminder::insert_if_absent(&mut tx, user.id, olympiad_id, kind, scheduled_at)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    (user.id, olympiad_id)
}

/// Records every delivery and succeeds.
#[derive(Default)]
struct RecordingNotifier {
    calls: Mutex<Vec<(ReminderKind, i64, i64)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, kind: ReminderKind, user_id: i64, olympiad_id: i64) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push((kind, user_id, olympiad_id));
        Ok(())
    }
}

/// Fails deliveries for one olympiad, records the rest.
struct FailingNotifier {
    fail_olympiad: i64,
    calls: Mutex<Vec<(ReminderKind, i64, i64)>>,
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, kind: ReminderKind, user_id: i64, olympiad_id: i64) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push((kind, user_id, olympiad_id));
        if olympiad_id == self.fail_olympiad {
            anyhow::bail!("delivery refused");
        }
        Ok(())
    }
}

/// Closes the connection pool from inside notify, so every storage call
/// after the delivery fails.
struct PoolClosingNotifier {
    db: Arc<DatabaseManager>,
}

#[async_trait]
impl Notifier for PoolClosingNotifier {
    async fn notify(&self, _kind: ReminderKind, _user_id: i64, _olympiad_id: i64) -> anyhow::Result<()> {
        self.db.pool.close().await;
        Ok(())
    }
}

/// Blocks inside notify until the test releases a permit.
struct BlockingNotifier {
    gate: Semaphore,
}

#[async_trait]
impl Notifier for BlockingNotifier {
    async fn notify(&self, _kind: ReminderKind, _user_id: i64, _olympiad_id: i64) -> anyhow::Result<()> {
        let _permit = self.gate.acquire().await?;
        Ok(())
    }
}

#[tokio::test]
async fn test_sweep_delivers_and_marks_sent_once() {
    let (db, _temp_dir) = setup_test_db().await;
    let scheduled_at = Utc.with_ymd_and_hms(2024, 9, 9, 9, 0, 0).unwrap();
    let (user_id, olympiad_id) =
        seed_reminder(&db, 2001, 1, ReminderKind::DayBefore, scheduled_at).await;

    let notifier = Arc::new(RecordingNotifier::default());
    let dispatcher = ReminderDispatcher::new(db.clone(), notifier.clone(), Duration::from_secs(60));

    let now = scheduled_at + ChronoDuration::minutes(5);
    let outcome = dispatcher.sweep(now).await.unwrap();
    assert_eq!(outcome, SweepOutcome::Completed { sent: 1, failed: 0 });

    let calls = notifier.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(ReminderKind::DayBefore, user_id, olympiad_id)]);

    let stored = Reminder::find_for_favorite(&db.pool, user_id, olympiad_id)
        .await
        .unwrap();
    let sent_at = stored[0].sent_at.unwrap();
    assert!(sent_at >= stored[0].scheduled_at);

    // An immediate second sweep finds nothing to deliver.
    let outcome = dispatcher.sweep(now).await.unwrap();
    assert_eq!(outcome, SweepOutcome::Completed { sent: 0, failed: 0 });
    assert_eq!(notifier.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_sweep_ignores_future_reminders() {
    let (db, _temp_dir) = setup_test_db().await;
    let scheduled_at = Utc.with_ymd_and_hms(2024, 11, 10, 9, 0, 0).unwrap();
    seed_reminder(&db, 2002, 1, ReminderKind::DayOf, scheduled_at).await;

    let notifier = Arc::new(RecordingNotifier::default());
    let dispatcher = ReminderDispatcher::new(db.clone(), notifier.clone(), Duration::from_secs(60));

    let now = scheduled_at - ChronoDuration::hours(1);
    let outcome = dispatcher.sweep(now).await.unwrap();

    assert_eq!(outcome, SweepOutcome::Completed { sent: 0, failed: 0 });
    assert!(notifier.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_delivery_stays_pending_without_blocking_others() {
    let (db, _temp_dir) = setup_test_db().await;
    let scheduled_at = Utc.with_ymd_and_hms(2024, 9, 9, 9, 0, 0).unwrap();
    let (user_a, oly_a) = seed_reminder(&db, 2003, 1, ReminderKind::DayOf, scheduled_at).await;
    let (user_b, oly_b) = seed_reminder(&db, 2004, 2, ReminderKind::DayOf, scheduled_at).await;

    let notifier = Arc::new(FailingNotifier {
        fail_olympiad: oly_a,
        calls: Mutex::new(Vec::new()),
    });
    let dispatcher = ReminderDispatcher::new(db.clone(), notifier.clone(), Duration::from_secs(60));

    let now = scheduled_at + ChronoDuration::minutes(1);
    let outcome = dispatcher.sweep(now).await.unwrap();
    assert_eq!(outcome, SweepOutcome::Completed { sent: 1, failed: 1 });

    // The failed reminder is still pending and gets retried next sweep.
    let pending = Reminder::find_for_favorite(&db.pool, user_a, oly_a).await.unwrap();
    assert!(pending[0].sent_at.is_none());
    let delivered = Reminder::find_for_favorite(&db.pool, user_b, oly_b).await.unwrap();
    assert!(delivered[0].sent_at.is_some());

    let outcome = dispatcher.sweep(now).await.unwrap();
    assert_eq!(outcome, SweepOutcome::Completed { sent: 0, failed: 1 });
}

#[tokio::test]
async fn test_mark_sent_failure_does_not_abort_the_batch() {
    let (db, _temp_dir) = setup_test_db().await;
    let scheduled_at = Utc.with_ymd_and_hms(2024, 9, 9, 9, 0, 0).unwrap();
    seed_reminder(&db, 2006, 1, ReminderKind::DayOf, scheduled_at).await;
    seed_reminder(&db, 2007, 2, ReminderKind::DayOf, scheduled_at).await;

    // The first delivery kills the pool, so marking either reminder sent
    // fails. The sweep must still finish and report both as failed instead
    // of bubbling the storage error up mid-batch.
    let notifier = Arc::new(PoolClosingNotifier { db: db.clone() });
    let dispatcher = ReminderDispatcher::new(db.clone(), notifier, Duration::from_secs(60));

    let now = scheduled_at + ChronoDuration::minutes(1);
    let outcome = dispatcher.sweep(now).await.unwrap();
    assert_eq!(outcome, SweepOutcome::Completed { sent: 0, failed: 2 });
}

#[tokio::test]
async fn test_overlapping_sweep_is_skipped_not_queued() {
    let (db, _temp_dir) = setup_test_db().await;
    let scheduled_at = Utc.with_ymd_and_hms(2024, 9, 9, 9, 0, 0).unwrap();
    seed_reminder(&db, 2005, 1, ReminderKind::DayOf, scheduled_at).await;

    let notifier = Arc::new(BlockingNotifier {
        gate: Semaphore::new(0),
    });
    let dispatcher = Arc::new(ReminderDispatcher::new(
        db.clone(),
        notifier.clone(),
        Duration::from_secs(60),
    ));

    let now = scheduled_at + ChronoDuration::minutes(1);
    let first = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move { dispatcher.sweep(now).await })
    };

    // Give the first sweep time to reach the blocking notify call.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let second = dispatcher.sweep(now).await.unwrap();
    assert_eq!(second, SweepOutcome::Skipped);

    notifier.gate.add_permits(1);
    let first = first.await.unwrap().unwrap();
    assert_eq!(first, SweepOutcome::Completed { sent: 1, failed: 0 });
}

#[tokio::test]
async fn test_favorite_to_delivery_end_to_end() {
    let (db, _temp_dir) = setup_test_db().await;

    let reminders = Arc::new(ReminderService::new(
        db.clone(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    ));
    let catalog = CatalogService::new(db.clone(), reminders);

    // Olympiad 2 in the demo catalog: registration closed long ago, round on
    // 2024-12-05. At 08:00 the day before, DayBefore (today 09:00) and DayOf
    // remain; RegWeek is in the past.
    let now = Utc.with_ymd_and_hms(2024, 12, 4, 8, 0, 0).unwrap();
    let added = catalog.add_to_favorites_at(now, 3001, 2, Some("student")).await.unwrap();
    assert!(added);

    // Favoriting again neither fails nor duplicates reminders.
    let added_again = catalog.add_to_favorites_at(now, 3001, 2, Some("student")).await.unwrap();
    assert!(!added_again);

    let user = User::find_by_tg_id(&db.pool, 3001).await.unwrap().unwrap();
    let stored = Reminder::find_for_favorite(&db.pool, user.id, 2).await.unwrap();
    let mut kinds: Vec<ReminderKind> = stored.iter().map(|r| r.kind).collect();
    kinds.sort_by_key(|k| k.as_str());
    assert_eq!(kinds, vec![ReminderKind::DayBefore, ReminderKind::DayOf]);

    let day_before = stored
        .iter()
        .find(|r| r.kind == ReminderKind::DayBefore)
        .unwrap();
    assert_eq!(
        day_before.scheduled_at,
        Utc.with_ymd_and_hms(2024, 12, 4, 9, 0, 0).unwrap()
    );

    // 09:05 the same day: only DayBefore is due.
    let notifier = Arc::new(RecordingNotifier::default());
    let dispatcher = ReminderDispatcher::new(db.clone(), notifier.clone(), Duration::from_secs(60));
    let sweep_now = Utc.with_ymd_and_hms(2024, 12, 4, 9, 5, 0).unwrap();
    let outcome = dispatcher.sweep(sweep_now).await.unwrap();
    assert_eq!(outcome, SweepOutcome::Completed { sent: 1, failed: 0 });

    let calls = notifier.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(ReminderKind::DayBefore, user.id, 2)]);
}
