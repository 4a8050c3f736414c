// src/services/extractors/fmovies.rs

//! Fmovies home and listing pages.
//!
//! The home slider (`#slider .swiper-slide`) paints its backdrop through an
//! inline `background-image` style and exposes an IMDB score, so slides are
//! parsed before the plain card grid (`.film_list-wrap .flw-item`) and win
//! on dedup. Cards carry the release year in their `fd-infor` row.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::Result;
use crate::models::{ContentItem, SourceSite};
use crate::utils::text::{parse_rating, parse_year};
use crate::utils::url::{extract_slug, resolve};

use super::{
    background_image_url, parse_selector, select_attr, select_image, select_text, select_texts,
};

struct Selectors {
    slide: Selector,
    slide_title: Selector,
    slide_poster: Selector,
    slide_detail: Selector,
    card: Selector,
    card_name: Selector,
    card_poster: Selector,
    card_info: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            slide: parse_selector("#slider .swiper-slide")?,
            slide_title: parse_selector(".film-title a")?,
            slide_poster: parse_selector(".film-poster img")?,
            slide_detail: parse_selector(".sc-detail .scd-item")?,
            card: parse_selector(".film_list-wrap .flw-item")?,
            card_name: parse_selector(".film-detail .film-name a")?,
            card_poster: parse_selector(".film-poster img")?,
            card_info: parse_selector(".fd-infor .fdi-item")?,
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
    for slide in document.select(&selectors.slide) {
        match parse_slide(&slide, &selectors, base, source, now) {
            Some(item) => items.push(item),
            None => log::debug!("{}: skipping slide without title or link", source.id),
        }
    }
    for card in document.select(&selectors.card) {
        match parse_card(&card, &selectors, base, source, now) {
            Some(item) => items.push(item),
            None => log::debug!("{}: skipping card without title or link", source.id),
        }
    }
    Ok(items)
}

fn parse_slide(
    slide: &ElementRef<'_>,
    selectors: &Selectors,
    base: &Url,
    source: &SourceSite,
    now: DateTime<Utc>,
) -> Option<ContentItem> {
    let href = select_attr(slide, &selectors.slide_title, "href")?;
    let url = resolve(base, &href);
    let slug = extract_slug(&url)?;
    let title = select_text(slide, &selectors.slide_title)?;

    let backdrop = slide
        .value()
        .attr("style")
        .and_then(|style| background_image_url(style, base));
    let detail = select_texts(slide, &selectors.slide_detail).join(" ");

    Some(ContentItem {
        id: ContentItem::compose_id(&source.id, &slug),
        title,
        kind: source.default_category.as_str().to_string(),
        year: parse_year(&detail),
        rating: parse_rating(&detail),
        poster: select_image(slide, &selectors.slide_poster, base),
        backdrop,
        genres: Vec::new(),
        cast: Vec::new(),
        episodes: None,
        url,
        source: source.id.clone(),
        created_at: now,
        updated_at: now,
    })
}

fn parse_card(
    card: &ElementRef<'_>,
    selectors: &Selectors,
    base: &Url,
    source: &SourceSite,
    now: DateTime<Utc>,
) -> Option<ContentItem> {
    let href = select_attr(card, &selectors.card_name, "href")?;
    let url = resolve(base, &href);
    let slug = extract_slug(&url)?;

    let title = select_text(card, &selectors.card_name)
        .or_else(|| select_attr(card, &selectors.card_name, "title"))?;

    let info = select_texts(card, &selectors.card_info).join(" ");

    Some(ContentItem {
        id: ContentItem::compose_id(&source.id, &slug),
        title,
        kind: source.default_category.as_str().to_string(),
        year: parse_year(&info),
        rating: None,
        poster: select_image(card, &selectors.card_poster, base),
        backdrop: None,
        genres: Vec::new(),
        cast: Vec::new(),
        episodes: None,
        url,
        source: source.id.clone(),
        created_at: now,
        updated_at: now,
    })
}
