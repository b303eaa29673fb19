//! University benefit matching against a user's favorite olympiads.

use anyhow::Result;
use std::sync::Arc;

use crate::database::connection::DatabaseManager;
use crate::database::models::{Favorite, User};

/// Demo description of a university and the olympiads it rewards.
#[derive(Debug, Clone)]
pub struct UniversityData {
    pub id: i64,
    pub name: &'static str,
    pub description: &'static str,
    pub olympiad_ids: &'static [i64],
    pub benefits: &'static [&'static str],
}

/// A university matched against the user's favorites.
#[derive(Debug, Clone)]
pub struct UniversityMatch {
    pub id: i64,
    pub name: &'static str,
    pub description: &'static str,
    pub benefits: &'static [&'static str],
    /// Titles of the user's favorite olympiads this university rewards.
    pub matched_olympiads: Vec<String>,
}

const DEMO_UNIVERSITIES: &[UniversityData] = &[
    UniversityData {
        id: 1,
        name: "HSE University",
        description: "Admission without exams and bonus points for profile olympiads.",
        olympiad_ids: &[1, 3, 4],
        benefits: &[
            "Exam-free admission for HSE and national olympiad winners",
            "Maximum profile exam score for prize winners",
        ],
    },
    UniversityData {
        id: 2,
        name: "MIPT",
        description: "Phystech backs winners of engineering olympiads.",
        olympiad_ids: &[3, 5],
        benefits: &[
            "Exam-free admission to applied maths and physics programs",
            "Increased scholarship and mentorship for olympiad winners",
        ],
    },
    UniversityData {
        id: 3,
        name: "Moscow State University",
        description: "Lomonosov olympiad winners get priority admission.",
        olympiad_ids: &[2, 6],
        benefits: &[
            "Exam-free admission for Lomonosov olympiad prize winners",
            "Dormitory priority for first-year olympiad students",
        ],
    },
];

pub struct UniversitiesService {
    db: Arc<DatabaseManager>,
}

impl UniversitiesService {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Universities whose rewarded olympiads intersect the user's favorites.
    /// With no favorites the full demo list is returned (with empty matches)
    /// so the screen is never blank.
    pub async fn recommend(&self, tg_user_id: i64) -> Result<Vec<UniversityMatch>> {
        let favorites = match User::find_by_tg_id(&self.db.pool, tg_user_id).await? {
            Some(user) => Favorite::list_for_user(&self.db.pool, user.id).await?,
            None => Vec::new(),
        };

        let matches: Vec<UniversityMatch> = DEMO_UNIVERSITIES
            .iter()
            .map(|uni| UniversityMatch {
                id: uni.id,
                name: uni.name,
                description: uni.description,
                benefits: uni.benefits,
                matched_olympiads: favorites
                    .iter()
                    .filter(|fav| uni.olympiad_ids.contains(&fav.olympiad_id))
                    .map(|fav| fav.title.clone())
                    .collect(),
            })
            .collect();

        if matches.iter().any(|m| !m.matched_olympiads.is_empty()) {
            Ok(matches
                .into_iter()
                .filter(|m| !m.matched_olympiads.is_empty())
                .collect())
        } else {
            Ok(matches)
        }
    }
}
