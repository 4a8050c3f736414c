// src/models/source.rs

//! Source site definitions.

use serde::{Deserialize, Serialize};

use crate::models::Category;

/// Which extractor parses a source's listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    Dramacool,
    Aniwatch,
    Bollyplay,
    Fmovies,
}

/// A third-party listing site the scraper pulls content from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSite {
    /// Stable source identifier, used in item ids and dump file names
    pub id: String,

    /// Human-readable site name
    pub name: String,

    /// Site origin, e.g. `https://dramacool.com.es`
    pub base_url: String,

    /// Listing page paths; `{page}` expands to 1..=max_pages
    pub listing_paths: Vec<String>,

    /// Category assumed when a listing exposes no usable type
    pub default_category: Category,

    /// Extractor that understands this site's markup
    pub extractor: ExtractorKind,

    /// Disabled sources are skipped by the scraper
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl SourceSite {
    /// Expand the configured listing paths into absolute page URLs.
    ///
    /// Paths containing a `{page}` placeholder fan out to `max_pages` URLs;
    /// paths without one yield a single URL.
    pub fn listing_urls(&self, max_pages: u32) -> Vec<String> {
        let origin = self.base_url.trim_end_matches('/');
        let mut urls = Vec::new();

        for path in &self.listing_paths {
            if path.contains("{page}") {
                for page in 1..=max_pages.max(1) {
                    let expanded = path.replace("{page}", &page.to_string());
                    urls.push(format!("{origin}{expanded}"));
                }
            } else {
                urls.push(format!("{origin}{path}"));
            }
        }

        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_source() -> SourceSite {
        SourceSite {
            id: "dramacool".to_string(),
            name: "DramaCool".to_string(),
            base_url: "https://dramacool.com.es/".to_string(),
            listing_paths: vec![
                "/most-popular-drama?page={page}".to_string(),
                "/recently-added".to_string(),
            ],
            default_category: Category::Drama,
            extractor: ExtractorKind::Dramacool,
            enabled: true,
        }
    }

    #[test]
    fn test_listing_urls_expand_pages() {
        let urls = sample_source().listing_urls(3);
        assert_eq!(urls.len(), 4);
        assert_eq!(
            urls[0],
            "https://dramacool.com.es/most-popular-drama?page=1"
        );
        assert_eq!(
            urls[2],
            "https://dramacool.com.es/most-popular-drama?page=3"
        );
        assert_eq!(urls[3], "https://dramacool.com.es/recently-added");
    }

    #[test]
    fn test_listing_urls_zero_pages_still_fetches_first() {
        let urls = sample_source().listing_urls(0);
        assert_eq!(urls.len(), 2);
        assert!(urls[0].ends_with("page=1"));
    }

    #[test]
    fn test_extractor_kind_lowercase_toml() {
        let source: SourceSite = toml::from_str(
            r#"
            id = "aniwatch"
            name = "Aniwatch"
            base_url = "https://aniwatchtv.to"
            listing_paths = ["/most-popular?page={page}"]
            default_category = "anime"
            extractor = "aniwatch"
        "#,
        )
        .unwrap();

        assert_eq!(source.extractor, ExtractorKind::Aniwatch);
        assert_eq!(source.default_category, Category::Anime);
        assert!(source.enabled);
    }
}
