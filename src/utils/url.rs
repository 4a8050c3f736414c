// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract a stable item slug from a content page URL.
///
/// Prefers an id-like query parameter (`/watch?id=5021` pages carry no slug in
/// the path); otherwise takes the last non-empty path segment with common page
/// suffixes removed.
pub fn extract_slug(url_str: &str) -> Option<String> {
    let parsed = Url::parse(url_str).ok()?;

    for (key, value) in parsed.query_pairs() {
        if value.is_empty() {
            continue;
        }
        let key = key.to_lowercase();
        if matches!(key.as_str(), "id" | "seq" | "no" | "idx" | "slug") {
            return Some(value.to_lowercase());
        }
    }

    if let Some(segments) = parsed.path_segments() {
        if let Some(last) = segments.filter(|s| !s.is_empty()).next_back() {
            let trimmed = last
                .trim_end_matches(".html")
                .trim_end_matches(".htm")
                .trim_matches('-');
            if !trimmed.is_empty() {
                return Some(trimmed.to_lowercase());
            }
        }
    }

    None
}
