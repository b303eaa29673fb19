#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use olympiad_bot::database::connection::DatabaseManager;
use olympiad_bot::database::models::{
    Favorite, Material, Olympiad, PaymentStub, Reminder, ReminderKind, User,
};
use olympiad_bot::services::materials::MaterialsService;
use olympiad_bot::services::subscription::SubscriptionService;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> (DatabaseManager, TempDir) {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let db_url = format!("sqlite:{}", db_path.to_string_lossy());

    let db = DatabaseManager::new(&db_url).await.unwrap();
    db.run_migrations().await.unwrap();
    (db, dir)
}

fn test_olympiad(id: i64) -> Olympiad {
    Olympiad {
        id,
        subject: "Informatics".to_string(),
        title: format!("Olympiad #{id}"),
        reg_deadline: None,
        round_date: None,
        description: Some("Test entry".to_string()),
    }
}

#[tokio::test]
async fn test_user_get_or_create_is_stable() {
    let (db, _temp_dir) = setup_test_db().await;

    let mut tx = db.pool.begin().await.unwrap();
    let created = User::get_or_create(&mut tx, 42, Some("alice")).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(created.tg_id, 42);
    assert_eq!(created.username.as_deref(), Some("alice"));
    assert!(!created.is_subscribed);

    // Same tg_id resolves to the same row; a new username is picked up.
    let mut tx = db.pool.begin().await.unwrap();
    let found = User::get_or_create(&mut tx, 42, Some("alice_renamed")).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(found.id, created.id);
    assert_eq!(found.username.as_deref(), Some("alice_renamed"));
}

#[tokio::test]
async fn test_favorites_roundtrip() {
    let (db, _temp_dir) = setup_test_db().await;

    let mut tx = db.pool.begin().await.unwrap();
    let user = User::get_or_create(&mut tx, 7, None).await.unwrap();
    Olympiad::ensure(&mut tx, &test_olympiad(1)).await.unwrap();
    Olympiad::ensure(&mut tx, &test_olympiad(2)).await.unwrap();

    assert!(Favorite::insert_if_absent(&mut tx, user.id, 1).await.unwrap());
    assert!(Favorite::insert_if_absent(&mut tx, user.id, 2).await.unwrap());
    // Duplicate favorite is a no-op.
    assert!(!Favorite::insert_if_absent(&mut tx, user.id, 1).await.unwrap());
    tx.commit().await.unwrap();

    let favorites = Favorite::list_for_user(&db.pool, user.id).await.unwrap();
    assert_eq!(favorites.len(), 2);

    assert!(Favorite::remove(&db.pool, user.id, 1).await.unwrap());
    assert!(!Favorite::remove(&db.pool, user.id, 1).await.unwrap());

    let favorites = Favorite::list_for_user(&db.pool, user.id).await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].olympiad_id, 2);
}

#[tokio::test]
async fn test_deleting_user_cascades_to_reminders_and_favorites() {
    let (db, _temp_dir) = setup_test_db().await;

    let mut tx = db.pool.begin().await.unwrap();
    let user = User::get_or_create(&mut tx, 8, None).await.unwrap();
    Olympiad::ensure(&mut tx, &test_olympiad(1)).await.unwrap();
    Favorite::insert_if_absent(&mut tx, user.id, 1).await.unwrap();
    let scheduled_at = Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap();
    Reminder::insert_if_absent(&mut tx, user.id, 1, ReminderKind::DayOf, scheduled_at)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user.id)
        .execute(&db.pool)
        .await
        .unwrap();

    let reminders = Reminder::find_for_favorite(&db.pool, user.id, 1).await.unwrap();
    assert!(reminders.is_empty());
    let favorites = Favorite::list_for_user(&db.pool, user.id).await.unwrap();
    assert!(favorites.is_empty());
}

#[tokio::test]
async fn test_material_crud() {
    let (db, _temp_dir) = setup_test_db().await;

    let mut tx = db.pool.begin().await.unwrap();
    Olympiad::ensure(&mut tx, &test_olympiad(1)).await.unwrap();
    tx.commit().await.unwrap();

    let material = Material::create(
        &db.pool,
        1,
        "Problem archive",
        "https://example.org/archive",
        Some(99),
    )
    .await
    .unwrap();
    assert_eq!(material.olympiad_id, 1);
    assert_eq!(material.added_by_admin_id, Some(99));

    let by_olympiad = Material::find_by_olympiad(&db.pool, 1).await.unwrap();
    assert_eq!(by_olympiad.len(), 1);
    assert_eq!(by_olympiad[0].title, "Problem archive");

    let all = Material::list_all(&db.pool).await.unwrap();
    assert_eq!(all.len(), 1);

    assert!(Material::delete(&db.pool, material.id).await.unwrap());
    assert!(!Material::delete(&db.pool, material.id).await.unwrap());
    assert!(Material::find_by_olympiad(&db.pool, 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_payment_stub_records() {
    let (db, _temp_dir) = setup_test_db().await;

    let mut tx = db.pool.begin().await.unwrap();
    let user = User::get_or_create(&mut tx, 9, None).await.unwrap();
    PaymentStub::create(&mut tx, user.id, "succeeded").await.unwrap();
    tx.commit().await.unwrap();

    let payments = PaymentStub::find_by_user(&db.pool, user.id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, "succeeded");
}

#[tokio::test]
async fn test_subscription_activation_is_idempotent() {
    let (db, _temp_dir) = setup_test_db().await;
    let db = Arc::new(db);
    let service = SubscriptionService::new(
        db.clone(),
        "example-pay".to_string(),
        "https://t.me".to_string(),
    );

    // Unknown users are simply unsubscribed.
    assert!(!service.is_subscribed(777).await.unwrap());

    service.activate(777, Some("payer")).await.unwrap();
    assert!(service.is_subscribed(777).await.unwrap());

    // A second activation records no second payment.
    service.activate(777, Some("payer")).await.unwrap();
    let user = User::find_by_tg_id(&db.pool, 777).await.unwrap().unwrap();
    let payments = PaymentStub::find_by_user(&db.pool, user.id).await.unwrap();
    assert_eq!(payments.len(), 1);
}

#[tokio::test]
async fn test_materials_service_admin_flow() {
    let (db, _temp_dir) = setup_test_db().await;
    let db = Arc::new(db);

    let mut tx = db.pool.begin().await.unwrap();
    Olympiad::ensure(&mut tx, &test_olympiad(1)).await.unwrap();
    tx.commit().await.unwrap();

    let service = MaterialsService::new(db.clone());
    let material = service
        .create_material(1, "Archive", "https://example.org/archive", 99)
        .await
        .unwrap();

    let all = service.list_materials().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, material.id);

    assert!(service.delete_material(material.id).await.unwrap());
    assert!(!service.delete_material(material.id).await.unwrap());
    assert!(service.list_materials().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_user_lookup_by_tg_id() {
    let (db, _temp_dir) = setup_test_db().await;

    assert!(User::find_by_tg_id(&db.pool, 555).await.unwrap().is_none());

    let mut tx = db.pool.begin().await.unwrap();
    User::get_or_create(&mut tx, 555, Some("bob")).await.unwrap();
    tx.commit().await.unwrap();

    let user = User::find_by_tg_id(&db.pool, 555).await.unwrap().unwrap();
    assert_eq!(user.username.as_deref(), Some("bob"));
    let by_id = User::find_by_id(&db.pool, user.id).await.unwrap().unwrap();
    assert_eq!(by_id.tg_id, 555);
}
