// src/services/extractors/dramacool.rs

//! DramaCool listing pages.
//!
//! Cards sit under `ul.list-episode-item`; each `<li>` wraps one title in a
//! single anchor with a lazy-loaded cover, an episode badge and an optional
//! type badge (KSHOW, MOVIE). Listings carry no rating and no backdrop.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::Result;
use crate::models::{ContentItem, SourceSite};
use crate::utils::text::{parse_episodes, parse_year};
use crate::utils::url::{extract_slug, resolve};

use super::{parse_selector, select_attr, select_image, select_text};

struct Selectors {
    row: Selector,
    link: Selector,
    title: Selector,
    poster: Selector,
    episode: Selector,
    badge: Selector,
    time: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            row: parse_selector("ul.list-episode-item li")?,
            link: parse_selector("a")?,
            title: parse_selector("h3.title")?,
            poster: parse_selector("img")?,
            episode: parse_selector("span.ep")?,
            badge: parse_selector("span.type")?,
            time: parse_selector("span.time")?,
        })
    }
}

pub(super) fn extract(
    document: &Html,
    base: &Url,
    source: &SourceSite,
) -> Result<Vec<ContentItem>> {
    let selectors = Selectors::new()?;
    let now = Utc::now();

    let mut items = Vec::new();
    for row in document.select(&selectors.row) {
        match parse_row(&row, &selectors, base, source, now) {
            Some(item) => items.push(item),
            None => log::debug!("{}: skipping listing row without title or link", source.id),
        }
    }
    Ok(items)
}

fn parse_row(
    row: &ElementRef<'_>,
    selectors: &Selectors,
    base: &Url,
    source: &SourceSite,
    now: DateTime<Utc>,
) -> Option<ContentItem> {
    let href = select_attr(row, &selectors.link, "href")?;
    let url = resolve(base, &href);
    let slug = extract_slug(&url)?;

    let title = select_text(row, &selectors.title)
        .or_else(|| select_attr(row, &selectors.link, "title"))?;

    // The type badge is absent on pure drama listings; fall back to the
    // source's configured category.
    let kind = select_text(row, &selectors.badge)
        .map(|badge| badge.to_lowercase())
        .unwrap_or_else(|| source.default_category.as_str().to_string());

    let year = select_text(row, &selectors.time)
        .and_then(|time| parse_year(&time))
        .or_else(|| parse_year(&title));

    Some(ContentItem {
        id: ContentItem::compose_id(&source.id, &slug),
        title,
        kind,
        year,
        rating: None,
        poster: select_image(row, &selectors.poster, base),
        backdrop: None,
        genres: Vec::new(),
        cast: Vec::new(),
        episodes: select_text(row, &selectors.episode).and_then(|ep| parse_episodes(&ep)),
        url,
        source: source.id.clone(),
        created_at: now,
        updated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ExtractorKind};

    const LISTING: &str = r#"
        <html><body>
        <ul class="list-episode-item">
          <li>
            <a href="/drama-detail/marry-my-husband" title="Marry My Husband">
              <img class="lazy" src="/img/spinner.gif"
                   data-original="/covers/marry-my-husband.jpg">
              <h3 class="title">Marry My Husband</h3>
              <span class="time">2024-01-15</span>
              <span class="ep">Ep 16</span>
            </a>
          </li>
          <li>
            <a href="/drama-detail/running-man">
              <h3 class="title">Running Man</h3>
              <span class="type">KSHOW</span>
            </a>
          </li>
          <li><span class="ad">sponsored</span></li>
        </ul>
        </body></html>
    "#;

    fn source() -> SourceSite {
        SourceSite {
            id: "dramacool".to_string(),
            name: "DramaCool".to_string(),
            base_url: "https://dramacool.example".to_string(),
            listing_paths: vec!["/most-popular-drama?page={page}".to_string()],
            default_category: Category::Drama,
            extractor: ExtractorKind::Dramacool,
            enabled: true,
        }
    }

    #[test]
    fn test_extract_listing() {
        let document = Html::parse_document(LISTING);
        let base = Url::parse("https://dramacool.example").unwrap();
        let items = extract(&document, &base, &source()).unwrap();

        assert_eq!(items.len(), 2);

        let first = &items[0];
        assert_eq!(first.id, "dramacool-marry-my-husband");
        assert_eq!(first.title, "Marry My Husband");
        assert_eq!(first.kind, "drama");
        assert_eq!(first.year, Some(2024));
        assert_eq!(first.episodes, Some(16));
        assert_eq!(
            first.poster.as_deref(),
            Some("https://dramacool.example/covers/marry-my-husband.jpg")
        );
        assert_eq!(first.url, "https://dramacool.example/drama-detail/marry-my-husband");
        assert_eq!(first.source, "dramacool");
        assert!(first.rating.is_none());
        assert!(first.backdrop.is_none());
        assert_eq!(first.created_at, first.updated_at);
    }

    #[test]
    fn test_type_badge_overrides_default_category() {
        let document = Html::parse_document(LISTING);
        let base = Url::parse("https://dramacool.example").unwrap();
        let items = extract(&document, &base, &source()).unwrap();

        assert_eq!(items[1].kind, "kshow");
        assert!(items[1].poster.is_none());
    }

    #[test]
    fn test_rows_without_anchor_are_skipped() {
        let document = Html::parse_document(
            r#"<ul class="list-episode-item"><li><h3 class="title">No Link</h3></li></ul>"#,
        );
        let base = Url::parse("https://dramacool.example").unwrap();
        let items = extract(&document, &base, &source()).unwrap();

        assert!(items.is_empty());
    }
}
