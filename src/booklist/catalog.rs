use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use super::category::Category;
use crate::error::{BtebError, Result};

const EMBEDDED_DATA: &str = include_str!("../../data/booklists.json");

/// Catalog files are larger than result payloads; give them their own cap.
const MAX_CATALOG_SIZE: usize = 8 * 1024 * 1024;

const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooklistItem {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub url: String,
    pub slug: String,
    pub regulation: String,
}

impl BooklistItem {
    pub fn category(&self) -> Category {
        Category::classify(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterSubjects {
    pub semester: u32,
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyBooklist {
    pub technology_name: String,
    pub technology_code: String,
    pub semesters: Vec<SemesterSubjects>,
}

impl TechnologyBooklist {
    pub fn semester(&self, semester: u32) -> Option<&SemesterSubjects> {
        self.semesters.iter().find(|s| s.semester == semester)
    }

    pub fn subject_count(&self) -> usize {
        self.semesters.iter().map(|s| s.subjects.len()).sum()
    }
}

/// Read-only booklist reference data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    technologies: Vec<BooklistItem>,
    booklists: BTreeMap<String, TechnologyBooklist>,
}

static EMBEDDED: OnceLock<std::result::Result<Catalog, String>> = OnceLock::new();

impl Catalog {
    /// The dataset compiled into the binary, parsed on first use.
    pub fn embedded() -> Result<&'static Catalog> {
        EMBEDDED
            .get_or_init(|| Self::from_json(EMBEDDED_DATA).map_err(|e| e.user_message()))
            .as_ref()
            .map_err(|message| {
                BtebError::Other(anyhow::anyhow!("Built-in booklist data is invalid: {message}"))
            })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        if json.len() > MAX_CATALOG_SIZE {
            return Err(BtebError::Other(anyhow::anyhow!(
                "Booklist data too large: {} bytes",
                json.len()
            )));
        }
        let catalog: Catalog = serde_json::from_str(json)
            .context("Failed to parse booklist data")?;
        catalog.warn_on_missing_booklists();
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BtebError::io_error(
                "reading booklist data",
                Some(path.display().to_string()),
                e,
            )
        })?;
        tracing::debug!(path = %path.display(), "Loading booklist data");
        Self::from_json(&content)
    }

    fn warn_on_missing_booklists(&self) {
        let missing: Vec<&str> = self
            .technologies
            .iter()
            .filter(|t| !self.booklists.contains_key(&t.slug))
            .map(|t| t.slug.as_str())
            .collect();
        if !missing.is_empty() {
            tracing::warn!(
                missing = missing.join(", "),
                "Technologies listed without a booklist"
            );
        }
    }

    pub fn technologies(&self) -> &[BooklistItem] {
        &self.technologies
    }

    pub fn len(&self) -> usize {
        self.technologies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.technologies.is_empty()
    }

    /// Case-insensitive substring match on name or code. A blank term
    /// matches everything.
    pub fn search(&self, term: &str) -> Vec<&BooklistItem> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.technologies.iter().collect();
        }
        self.technologies
            .iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&term) || t.code.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn by_category(&self, category: Category) -> Vec<&BooklistItem> {
        self.technologies
            .iter()
            .filter(|t| t.category() == category)
            .collect()
    }

    pub fn by_slug(&self, slug: &str) -> Option<&BooklistItem> {
        self.technologies.iter().find(|t| t.slug == slug)
    }

    /// Detailed booklist for a technology slug.
    pub fn booklist(&self, slug: &str) -> Result<&TechnologyBooklist> {
        self.booklists
            .get(slug)
            .ok_or_else(|| BtebError::booklist_not_found(slug, self.suggestions(slug)))
    }

    fn suggestions(&self, slug: &str) -> Vec<String> {
        let needle = slug.trim().to_lowercase();
        let words: Vec<&str> = needle
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() >= 3 && *w != "technology")
            .collect();
        if words.is_empty() {
            return Vec::new();
        }

        self.technologies
            .iter()
            .filter(|t| {
                let name = t.name.to_lowercase();
                words
                    .iter()
                    .any(|w| t.slug.contains(w) || name.contains(w))
            })
            .take(MAX_SUGGESTIONS)
            .map(|t| t.slug.clone())
            .collect()
    }
}

/// Load the catalog from `path` when given, otherwise the embedded data.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::from_path(path),
        None => Catalog::embedded().cloned(),
    }
}
