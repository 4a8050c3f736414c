// src/services/extractors/mod.rs

//! Site extractors.
//!
//! Each submodule understands one listing site's markup and turns a fetched
//! page into [`ContentItem`] records via CSS selectors. Extraction is pure:
//! no network, no retries. Rows that fail to yield a title and link are
//! skipped; the batch continues.

mod aniwatch;
mod bollyplay;
mod dramacool;
mod fmovies;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ContentItem, ExtractorKind, SourceSite};
use crate::utils::text::clean_text;
use crate::utils::url::resolve;

/// Attribute chain covering the lazy-loading variants these sites use.
const IMAGE_ATTRS: [&str; 4] = ["data-src", "data-original", "data-lazy-src", "src"];

/// Run the extractor configured for `source` over a fetched listing page.
pub fn extract(source: &SourceSite, html: &str) -> Result<Vec<ContentItem>> {
    let document = Html::parse_document(html);
    let base = Url::parse(&source.base_url)?;

    match source.extractor {
        ExtractorKind::Dramacool => dramacool::extract(&document, &base, source),
        ExtractorKind::Aniwatch => aniwatch::extract(&document, &base, source),
        ExtractorKind::Bollyplay => bollyplay::extract(&document, &base, source),
        ExtractorKind::Fmovies => fmovies::extract(&document, &base, source),
    }
}

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Trimmed text of the first descendant matching `sel`.
pub(crate) fn select_text(row: &ElementRef<'_>, sel: &Selector) -> Option<String> {
    row.select(sel)
        .next()
        .map(|el| clean_text(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
}

/// Attribute of the first descendant matching `sel`.
pub(crate) fn select_attr(row: &ElementRef<'_>, sel: &Selector, attr: &str) -> Option<String> {
    row.select(sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Image URL of the first descendant matching `sel`, resolved against `base`.
///
/// Walks the lazy-loading attribute chain before falling back to `src`.
pub(crate) fn select_image(row: &ElementRef<'_>, sel: &Selector, base: &Url) -> Option<String> {
    let el = row.select(sel).next()?;
    for attr in IMAGE_ATTRS {
        if let Some(value) = el.value().attr(attr) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(resolve(base, value));
            }
        }
    }
    None
}

/// All trimmed texts of descendants matching `sel` (genre/cast tag lists).
pub(crate) fn select_texts(row: &ElementRef<'_>, sel: &Selector) -> Vec<String> {
    row.select(sel)
        .map(|el| clean_text(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Pull a `background-image: url(...)` target out of an inline style.
pub(crate) fn background_image_url(style: &str, base: &Url) -> Option<String> {
    let start = style.find("url(")? + 4;
    let end = style[start..].find(')')? + start;
    let raw = style[start..end].trim().trim_matches(|c| c == '"' || c == '\'');
    if raw.is_empty() {
        return None;
    }
    Some(resolve(base, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    #[test]
    fn test_select_image_prefers_lazy_attrs() {
        let html = Html::parse_fragment(
            r#"<div><img src="/placeholder.gif" data-src="/real.jpg"></div>"#,
        );
        let sel = parse_selector("img").unwrap();
        let root = html.root_element();

        assert_eq!(
            select_image(&root, &sel, &base()),
            Some("https://example.com/real.jpg".to_string())
        );
    }

    #[test]
    fn test_select_image_falls_back_to_src() {
        let html = Html::parse_fragment(r#"<div><img src="/only.jpg"></div>"#);
        let sel = parse_selector("img").unwrap();
        let root = html.root_element();

        assert_eq!(
            select_image(&root, &sel, &base()),
            Some("https://example.com/only.jpg".to_string())
        );
    }

    #[test]
    fn test_select_text_skips_empty() {
        let html = Html::parse_fragment("<div><h3>  </h3></div>");
        let sel = parse_selector("h3").unwrap();
        let root = html.root_element();

        assert_eq!(select_text(&root, &sel), None);
    }

    #[test]
    fn test_background_image_url() {
        assert_eq!(
            background_image_url("background-image: url('/covers/a.jpg');", &base()),
            Some("https://example.com/covers/a.jpg".to_string())
        );
        assert_eq!(
            background_image_url(r#"background-image:url("https://cdn.test/b.jpg")"#, &base()),
            Some("https://cdn.test/b.jpg".to_string())
        );
        assert_eq!(background_image_url("color: red", &base()), None);
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[nope").is_err());
        assert!(parse_selector("div.card a").is_ok());
    }
}
