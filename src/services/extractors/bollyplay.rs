// src/services/extractors/bollyplay.rs

//! BollyPlay archive pages.
//!
//! A WordPress theme renders one `<article class="item">` per movie with a
//! poster block (image plus `IMDb x.x` rating badge) and a data block
//! (linked title, release date, genre and cast tag links).

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::Result;
use crate::models::{ContentItem, SourceSite};
use crate::utils::text::{parse_rating, parse_year};
use crate::utils::url::{extract_slug, resolve};

use super::{parse_selector, select_attr, select_image, select_text, select_texts};

struct Selectors {
    row: Selector,
    link: Selector,
    poster: Selector,
    rating: Selector,
    date: Selector,
    genres: Selector,
    cast: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            row: parse_selector("article.item")?,
            link: parse_selector(".data h3 a")?,
            poster: parse_selector(".poster img")?,
            rating: parse_selector(".poster .rating")?,
            date: parse_selector(".data span")?,
            genres: parse_selector(".genres a")?,
            cast: parse_selector(".cast a")?,
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
            None => log::debug!("{}: skipping article without title or link", source.id),
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
    let title = select_text(row, &selectors.link)?;

    Some(ContentItem {
        id: ContentItem::compose_id(&source.id, &slug),
        title,
        kind: source.default_category.as_str().to_string(),
        year: select_text(row, &selectors.date).and_then(|date| parse_year(&date)),
        rating: select_text(row, &selectors.rating).and_then(|badge| parse_rating(&badge)),
        poster: select_image(row, &selectors.poster, base),
        backdrop: None,
        genres: select_texts(row, &selectors.genres),
        cast: select_texts(row, &selectors.cast),
        episodes: None,
        url,
        source: source.id.clone(),
        created_at: now,
        updated_at: now,
    })
}
