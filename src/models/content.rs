//! Content record and category structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single piece of catalog content scraped from a listing site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    /// Composite identity: `{source}-{slug}`. Unique within a source only.
    pub id: String,

    /// Display title
    pub title: String,

    /// Raw content type as exposed by the site (classified at aggregation)
    #[serde(rename = "type")]
    pub kind: String,

    /// Release year, when the listing exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Rating on a 0-10 scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    /// Poster (portrait) image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,

    /// Backdrop (landscape) image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop: Option<String>,

    /// Genre tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,

    /// Credited cast names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cast: Vec<String>,

    /// Episode count for episodic content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episodes: Option<u32>,

    /// Full URL to the item's page on the source site
    pub url: String,

    /// Source site identifier
    pub source: String,

    /// Timestamp of the scrape run that produced this record
    pub created_at: DateTime<Utc>,

    /// Same instant as `created_at`; each run rewrites records whole
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Compose the item identity from a source id and a scraped slug.
    pub fn compose_id(source: &str, slug: &str) -> String {
        format!("{source}-{slug}")
    }

    /// Whether the item carries both images required for hero placement.
    pub fn has_full_imagery(&self) -> bool {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.backdrop) && filled(&self.poster)
    }
}

/// Fixed category set content items are bucketed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Drama,
    Anime,
    Film,
    Bollywood,
}

impl Category {
    /// All categories, in output order.
    pub const ALL: [Category; 4] = [
        Category::Drama,
        Category::Anime,
        Category::Film,
        Category::Bollywood,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Drama => "drama",
            Category::Anime => "anime",
            Category::Film => "film",
            Category::Bollywood => "bollywood",
        }
    }

    /// Output directory name for this category.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Drama => "dramas",
            Category::Anime => "animes",
            Category::Film => "films",
            Category::Bollywood => "bollywood",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static lookup table from raw site type strings to categories.
const CATEGORY_LOOKUP: &[(&str, Category)] = &[
    ("drama", Category::Drama),
    ("dramas", Category::Drama),
    ("kdrama", Category::Drama),
    ("k-drama", Category::Drama),
    ("cdrama", Category::Drama),
    ("c-drama", Category::Drama),
    ("series", Category::Drama),
    ("tv", Category::Drama),
    ("tvshow", Category::Drama),
    ("anime", Category::Anime),
    ("animes", Category::Anime),
    ("donghua", Category::Anime),
    ("ona", Category::Anime),
    ("ova", Category::Anime),
    ("film", Category::Film),
    ("films", Category::Film),
    ("movie", Category::Film),
    ("movies", Category::Film),
    ("bollywood", Category::Bollywood),
    ("hindi", Category::Bollywood),
    ("hindi-movie", Category::Bollywood),
    ("desi", Category::Bollywood),
];

/// Classify a raw content type string into the fixed category set.
///
/// Returns `None` for types outside the lookup table; callers decide whether
/// to skip or fall back.
pub fn classify(raw: &str) -> Option<Category> {
    let needle = raw.trim().to_lowercase();
    CATEGORY_LOOKUP
        .iter()
        .find(|(key, _)| *key == needle)
        .map(|(_, category)| *category)
}

/// Per-source scrape output, persisted as `dumps/{source}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDump {
    /// Source site identifier
    pub source: String,

    /// When the scrape finished
    pub scraped_at: DateTime<Utc>,

    /// Number of items in this dump
    pub count: usize,

    /// The scraped items
    pub items: Vec<ContentItem>,
}

impl SourceDump {
    pub fn new(source: impl Into<String>, items: Vec<ContentItem>) -> Self {
        Self {
            source: source.into(),
            scraped_at: Utc::now(),
            count: items.len(),
            items,
        }
    }
}

/// Envelope for every aggregator output file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFile {
    /// Number of results in this file
    pub count: usize,

    /// The content items
    pub results: Vec<ContentItem>,

    /// ISO 8601 timestamp of the write
    pub updated_at: DateTime<Utc>,
}

impl CategoryFile {
    pub fn new(results: Vec<ContentItem>) -> Self {
        Self {
            count: results.len(),
            results,
            updated_at: Utc::now(),
        }
    }
}
