use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A writing project: the root container for folders and documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_word_count: u32,
    /// Cached sum of Chapter word counts. Refreshed on save; recompute
    /// via `ops::project_ops::project_word_count` where it matters.
    #[serde(default)]
    pub current_word_count: u32,
    /// Position among projects. Dense 0..N-1 after any reorder.
    #[serde(default)]
    pub order: f64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Project {
    pub fn new(id: u64, title: String) -> Self {
        let now = Utc::now();
        Project {
            id,
            title,
            genre: String::new(),
            description: String::new(),
            target_word_count: 0,
            current_word_count: 0,
            order: 0.0,
            created: now,
            updated: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated = Utc::now();
    }
}
