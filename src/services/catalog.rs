//! Olympiad catalog and the add-to-favorites workflow.
//!
//! The catalog itself is demo data held in memory; rows are written to the
//! database lazily, the first time somebody favorites an olympiad.

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::database::connection::DatabaseManager;
use crate::database::models::{Favorite, Olympiad, User};
use crate::services::reminder::ReminderService;

/// School subject grouping olympiads in the catalog.
#[derive(Debug, Clone)]
pub struct Subject {
    pub code: &'static str,
    pub title: &'static str,
}

const DEMO_SUBJECTS: &[Subject] = &[
    Subject { code: "math", title: "Mathematics" },
    Subject { code: "informatics", title: "Informatics" },
    Subject { code: "physics", title: "Physics" },
];

fn demo_olympiads() -> Vec<(&'static str, Olympiad)> {
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day);
    vec![
        ("math", Olympiad {
            id: 1,
            subject: "Mathematics".to_string(),
            title: "HSE University Mathematics Olympiad".to_string(),
            reg_deadline: d(2024, 10, 1),
            round_date: d(2024, 11, 10),
            description: Some("Qualifying and final rounds hosted by HSE University.".to_string()),
        }),
        ("math", Olympiad {
            id: 2,
            subject: "Mathematics".to_string(),
            title: "National Olympiad, theory round".to_string(),
            reg_deadline: d(2024, 9, 20),
            round_date: d(2024, 12, 5),
            description: Some("Municipal stage of the national school olympiad.".to_string()),
        }),
        ("informatics", Olympiad {
            id: 3,
            subject: "Informatics".to_string(),
            title: "NTI Olympiad, information technology track".to_string(),
            reg_deadline: d(2024, 9, 15),
            round_date: d(2024, 11, 25),
            description: Some("Team contests on algorithms and programming.".to_string()),
        }),
        ("informatics", Olympiad {
            id: 4,
            subject: "Informatics".to_string(),
            title: "National Olympiad in informatics".to_string(),
            reg_deadline: d(2024, 9, 30),
            round_date: d(2024, 12, 12),
            description: Some("Municipal and regional stages.".to_string()),
        }),
        ("physics", Olympiad {
            id: 5,
            subject: "Physics".to_string(),
            title: "Phystech Olympiad".to_string(),
            reg_deadline: d(2024, 10, 5),
            round_date: d(2024, 11, 30),
            description: Some("On-campus round at MIPT plus an online format.".to_string()),
        }),
        ("physics", Olympiad {
            id: 6,
            subject: "Physics".to_string(),
            title: "Lomonosov Olympiad in physics".to_string(),
            reg_deadline: d(2024, 9, 28),
            round_date: d(2024, 10, 18),
            description: Some("Lomonosov Moscow State University olympiad.".to_string()),
        }),
    ]
}

/// Catalog browsing plus the favorites workflow that triggers reminder
/// scheduling.
pub struct CatalogService {
    db: Arc<DatabaseManager>,
    reminders: Arc<ReminderService>,
    by_subject: HashMap<&'static str, Vec<Olympiad>>,
    by_id: HashMap<i64, Olympiad>,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseManager>, reminders: Arc<ReminderService>) -> Self {
        let mut by_subject: HashMap<&'static str, Vec<Olympiad>> = HashMap::new();
        let mut by_id = HashMap::new();
        for (subject_code, olympiad) in demo_olympiads() {
            by_subject.entry(subject_code).or_default().push(olympiad.clone());
            by_id.insert(olympiad.id, olympiad);
        }
        for olympiads in by_subject.values_mut() {
            olympiads.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        }

        Self { db, reminders, by_subject, by_id }
    }

    pub fn list_subjects(&self) -> &'static [Subject] {
        DEMO_SUBJECTS
    }

    pub fn get_subject(&self, code: &str) -> Option<&Subject> {
        DEMO_SUBJECTS.iter().find(|s| s.code == code)
    }

    pub fn list_olympiads(&self, subject_code: &str) -> &[Olympiad] {
        self.by_subject
            .get(subject_code)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get_olympiad(&self, olympiad_id: i64) -> Option<&Olympiad> {
        self.by_id.get(&olympiad_id)
    }

    /// Writes the catalog row for an olympiad if it is not stored yet, so
    /// rows referencing it by foreign key (e.g. materials) can be created
    /// before anyone favorites it.
    pub async fn ensure_stored(&self, olympiad_id: i64) -> Result<()> {
        let olympiad = self
            .get_olympiad(olympiad_id)
            .ok_or_else(|| anyhow!("Unknown olympiad identifier: {olympiad_id}"))?;
        let mut tx = self.db.pool.begin().await?;
        Olympiad::ensure(&mut tx, olympiad).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Adds an olympiad to the user's favorites and schedules its reminders,
    /// all in one transaction. Returns `false` if it was already favorited
    /// (in which case nothing is written).
    pub async fn add_to_favorites(
        &self,
        tg_user_id: i64,
        olympiad_id: i64,
        username: Option<&str>,
    ) -> Result<bool> {
        self.add_to_favorites_at(Utc::now(), tg_user_id, olympiad_id, username)
            .await
    }

    /// Like [`Self::add_to_favorites`] but with an explicit clock.
    pub async fn add_to_favorites_at(
        &self,
        now: DateTime<Utc>,
        tg_user_id: i64,
        olympiad_id: i64,
        username: Option<&str>,
    ) -> Result<bool> {
        let olympiad = self
            .get_olympiad(olympiad_id)
            .ok_or_else(|| anyhow!("Unknown olympiad identifier: {olympiad_id}"))?;

        let mut tx = self.db.pool.begin().await?;

        let user = User::get_or_create(&mut tx, tg_user_id, username).await?;
        Olympiad::ensure(&mut tx, olympiad).await?;

        if !Favorite::insert_if_absent(&mut tx, user.id, olympiad_id).await? {
            tx.rollback().await?;
            return Ok(false);
        }

        let created = self
            .reminders
            .schedule_in_tx(
                &mut tx,
                now,
                user.id,
                olympiad_id,
                olympiad.reg_deadline,
                olympiad.round_date,
            )
            .await?;

        tx.commit().await?;
        tracing::info!(
            "User {} favorited olympiad {} ({} reminders scheduled)",
            tg_user_id,
            olympiad_id,
            created
        );
        Ok(true)
    }
}
