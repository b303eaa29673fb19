#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use olympiad_bot::database::connection::DatabaseManager;
use olympiad_bot::database::models::{Olympiad, Reminder, ReminderKind, User};
use olympiad_bot::services::reminder::ReminderService;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> (Arc<DatabaseManager>, TempDir) {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.to_string_lossy());

    let db = DatabaseManager::new(&db_url).await.unwrap();
    db.run_migrations().await.unwrap();
    (Arc::new(db), dir)
}

fn nine() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed_user_and_olympiad(db: &DatabaseManager, tg_id: i64, olympiad_id: i64) -> i64 {
    let mut tx = db.pool.begin().await.unwrap();
    let user = User::get_or_create(&mut tx, tg_id, Some("student")).await.unwrap();
    let olympiad = Olympiad {
        id: olympiad_id,
        subject: "Mathematics".to_string(),
        title: "Test Olympiad".to_string(),
        reg_deadline: None,
        round_date: None,
        description: None,
    };
    Olympiad::ensure(&mut tx, &olympiad).await.unwrap();
    tx.commit().await.unwrap();
    user.id
}

#[tokio::test]
async fn test_schedule_creates_reminders_for_future_dates() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = seed_user_and_olympiad(&db, 1001, 1).await;

    let service = ReminderService::new(db.clone(), nine());
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();

    let created = service
        .schedule_for_favorite_at(now, user_id, 1, Some(date(2024, 10, 1)), Some(date(2024, 11, 10)))
        .await
        .unwrap();

    assert_eq!(created, 3);

    let stored = Reminder::find_for_favorite(&db.pool, user_id, 1).await.unwrap();
    assert_eq!(stored.len(), 3);
    assert!(stored.iter().all(|r| r.sent_at.is_none()));
}

#[tokio::test]
async fn test_schedule_is_idempotent() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = seed_user_and_olympiad(&db, 1002, 1).await;

    let service = ReminderService::new(db.clone(), nine());
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();

    let first = service
        .schedule_for_favorite_at(now, user_id, 1, Some(date(2024, 10, 1)), Some(date(2024, 11, 10)))
        .await
        .unwrap();
    let second = service
        .schedule_for_favorite_at(now, user_id, 1, Some(date(2024, 10, 1)), Some(date(2024, 11, 10)))
        .await
        .unwrap();

    assert_eq!(first, 3);
    assert_eq!(second, 0);

    let stored = Reminder::find_for_favorite(&db.pool, user_id, 1).await.unwrap();
    assert_eq!(stored.len(), 3);
}

#[tokio::test]
async fn test_schedule_without_dates_creates_nothing() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = seed_user_and_olympiad(&db, 1003, 1).await;

    let service = ReminderService::new(db.clone(), nine());
    let created = service
        .schedule_for_favorite(user_id, 1, None, None)
        .await
        .unwrap();

    assert_eq!(created, 0);
    let stored = Reminder::find_for_favorite(&db.pool, user_id, 1).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_schedule_in_caller_transaction_rolls_back_together() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_id = seed_user_and_olympiad(&db, 1004, 1).await;

    let service = ReminderService::new(db.clone(), nine());
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();

    let mut tx = db.pool.begin().await.unwrap();
    let created = service
        .schedule_in_tx(&mut tx, now, user_id, 1, Some(date(2024, 10, 1)), None)
        .await
        .unwrap();
    assert_eq!(created, 1);
    tx.rollback().await.unwrap();

    // The enclosing favorite transaction failed: no reminders may survive.
    let stored = Reminder::find_for_favorite(&db.pool, user_id, 1).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_uniqueness_holds_per_kind_across_users() {
    let (db, _temp_dir) = setup_test_db().await;
    let user_a = seed_user_and_olympiad(&db, 1005, 1).await;
    let user_b = seed_user_and_olympiad(&db, 1006, 1).await;

    let scheduled_at = Utc.with_ymd_and_hms(2024, 9, 24, 9, 0, 0).unwrap();

    // Same kind for the same user is deduplicated, other users are not.
    let mut tx = db.pool.begin().await.unwrap();
    assert!(Reminder::insert_if_absent(&mut tx, user_a, 1, ReminderKind::RegWeek, scheduled_at)
        .await
        .unwrap());
    assert!(!Reminder::insert_if_absent(&mut tx, user_a, 1, ReminderKind::RegWeek, scheduled_at)
        .await
        .unwrap());
    assert!(Reminder::insert_if_absent(&mut tx, user_b, 1, ReminderKind::RegWeek, scheduled_at)
        .await
        .unwrap());
    tx.commit().await.unwrap();

    assert_eq!(
        Reminder::find_for_favorite(&db.pool, user_a, 1).await.unwrap().len(),
        1
    );
    assert_eq!(
        Reminder::find_for_favorite(&db.pool, user_b, 1).await.unwrap().len(),
        1
    );
}
