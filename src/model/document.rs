use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of a document, used for display glyphs and AI-context assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocKind {
    Chapter,
    Instructions,
    Synopsis,
    #[serde(rename = "Writing Style")]
    WritingStyle,
    Characters,
    Locations,
    Worldbuilding,
    Plot,
    Research,
    Notes,
    Other,
}

impl DocKind {
    /// Display glyph shown next to the title in tree listings
    pub fn glyph(self) -> &'static str {
        match self {
            DocKind::Chapter => "📖",
            DocKind::Instructions => "📋",
            DocKind::Synopsis => "📝",
            DocKind::WritingStyle => "✍",
            DocKind::Characters => "👥",
            DocKind::Locations => "🗺",
            DocKind::Worldbuilding => "🌍",
            DocKind::Plot => "🎭",
            DocKind::Research => "🔬",
            DocKind::Notes => "📌",
            DocKind::Other => "📄",
        }
    }

    /// Display name, matching the persisted serde string
    pub fn name(self) -> &'static str {
        match self {
            DocKind::Chapter => "Chapter",
            DocKind::Instructions => "Instructions",
            DocKind::Synopsis => "Synopsis",
            DocKind::WritingStyle => "Writing Style",
            DocKind::Characters => "Characters",
            DocKind::Locations => "Locations",
            DocKind::Worldbuilding => "Worldbuilding",
            DocKind::Plot => "Plot",
            DocKind::Research => "Research",
            DocKind::Notes => "Notes",
            DocKind::Other => "Other",
        }
    }

    /// Parse a display name back into a kind
    pub fn parse_name(s: &str) -> Option<DocKind> {
        match s {
            "Chapter" => Some(DocKind::Chapter),
            "Instructions" => Some(DocKind::Instructions),
            "Synopsis" => Some(DocKind::Synopsis),
            "Writing Style" => Some(DocKind::WritingStyle),
            "Characters" => Some(DocKind::Characters),
            "Locations" => Some(DocKind::Locations),
            "Worldbuilding" => Some(DocKind::Worldbuilding),
            "Plot" => Some(DocKind::Plot),
            "Research" => Some(DocKind::Research),
            "Notes" => Some(DocKind::Notes),
            "Other" => Some(DocKind::Other),
            _ => None,
        }
    }

    /// Only Chapter documents get phrase-detection underlines and count
    /// toward a project's aggregate word total.
    pub fn is_manuscript(self) -> bool {
        self == DocKind::Chapter
    }
}

/// A document: one unit of text inside a project, optionally filed in a folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub project_id: u64,
    pub title: String,
    pub kind: DocKind,
    /// Canonical markdown content. Legacy documents may still hold HTML
    /// until the one-time migration on load rewrites them.
    pub content: String,
    /// Cached word count, refreshed on save. Never authoritative;
    /// recompute from `content` wherever correctness matters.
    pub word_count: u32,
    /// Enabled documents are offered as AI context and included in exports
    pub enabled: bool,
    /// None = top level of the project
    pub folder_id: Option<u64>,
    /// Position among siblings. Dense 0..N-1 except for the transient
    /// half-increment a duplicate leaves behind until the next renumber.
    pub order: f64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Document {
    pub fn new(id: u64, project_id: u64, title: String, kind: DocKind) -> Self {
        let now = Utc::now();
        Document {
            id,
            project_id,
            title,
            kind,
            content: String::new(),
            word_count: 0,
            enabled: true,
            folder_id: None,
            order: 0.0,
            created: now,
            updated: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated = Utc::now();
    }
}
