//! Prep material bundles: built-in demo links plus admin-added ones.

use anyhow::Result;
use std::sync::Arc;

use crate::database::connection::DatabaseManager;
use crate::database::models::Material;

/// A single prep link.
#[derive(Debug, Clone)]
pub struct MaterialLink {
    pub title: String,
    pub url: String,
}

/// Links for one olympiad, grouped by category.
#[derive(Debug, Clone)]
pub struct MaterialsBundle {
    pub past_problems: Vec<MaterialLink>,
    pub theory: Vec<MaterialLink>,
    pub articles: Vec<MaterialLink>,
    /// Admin-added links from the database.
    pub additional: Vec<MaterialLink>,
}

fn link(title: &str, url: &str) -> MaterialLink {
    MaterialLink {
        title: title.to_string(),
        url: url.to_string(),
    }
}

fn demo_bundle(olympiad_id: i64) -> MaterialsBundle {
    // A generic bundle backs olympiads without a dedicated one.
    match olympiad_id {
        1 => MaterialsBundle {
            past_problems: vec![link(
                "HSE University: past problem sets",
                "https://example.org/hse/problems",
            )],
            theory: vec![link(
                "HSE University: theory and video walkthroughs",
                "https://example.org/hse/theory",
            )],
            articles: vec![link(
                "HSE University: study guides and articles",
                "https://example.org/hse/articles",
            )],
            additional: Vec::new(),
        },
        2 => MaterialsBundle {
            past_problems: vec![link(
                "National Olympiad: 2023 problem archive",
                "https://example.org/national/problems",
            )],
            theory: vec![link(
                "National Olympiad: theory and webinars",
                "https://example.org/national/theory",
            )],
            articles: vec![link(
                "National Olympiad: methodology articles",
                "https://example.org/national/articles",
            )],
            additional: Vec::new(),
        },
        3 => MaterialsBundle {
            past_problems: vec![link(
                "NTI: qualifier and final problems",
                "https://example.org/nti/problems",
            )],
            theory: vec![link(
                "NTI: theory and practice sessions",
                "https://example.org/nti/theory",
            )],
            articles: vec![link("NTI: articles and guides", "https://example.org/nti/articles")],
            additional: Vec::new(),
        },
        _ => MaterialsBundle {
            past_problems: vec![link(
                "Past problems archive (PDF)",
                "https://example.org/past-papers.pdf",
            )],
            theory: vec![link(
                "Theory and video walkthroughs",
                "https://www.youtube.com/playlist?list=DEMO_OLYMPIAD",
            )],
            articles: vec![link(
                "Collected articles and study guides",
                "https://example.org/articles",
            )],
            additional: Vec::new(),
        },
    }
}

pub struct MaterialsService {
    db: Arc<DatabaseManager>,
}

impl MaterialsService {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Demo bundle for the olympiad with any admin-added links attached.
    pub async fn get_materials(&self, olympiad_id: i64) -> Result<MaterialsBundle> {
        let mut bundle = demo_bundle(olympiad_id);

        let stored = Material::find_by_olympiad(&self.db.pool, olympiad_id).await?;
        bundle.additional = stored
            .into_iter()
            .map(|m| MaterialLink { title: m.title, url: m.url })
            .collect();

        Ok(bundle)
    }

    pub async fn create_material(
        &self,
        olympiad_id: i64,
        title: &str,
        url: &str,
        admin_tg_id: i64,
    ) -> Result<Material> {
        let material =
            Material::create(&self.db.pool, olympiad_id, title, url, Some(admin_tg_id)).await?;
        tracing::info!(
            "Admin {} added material {} for olympiad {}",
            admin_tg_id,
            material.id,
            olympiad_id
        );
        Ok(material)
    }

    pub async fn list_materials(&self) -> Result<Vec<Material>> {
        Ok(Material::list_all(&self.db.pool).await?)
    }

    pub async fn delete_material(&self, material_id: i64) -> Result<bool> {
        Ok(Material::delete(&self.db.pool, material_id).await?)
    }
}
