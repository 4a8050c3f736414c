// src/services/extractors/aniwatch.rs

//! Aniwatch home and listing pages.
//!
//! Two blocks matter: the spotlight slider (`#slider .deslide-item`), whose
//! entries carry both a wide cover and a poster thumb, and the standard card
//! grid (`.film_list-wrap .flw-item`). Slider entries come first so the
//! richer record wins when the same title appears in both.
//!
//! The `TV` / `Movie` / `OVA` badges on cards describe the release format,
//! not the catalog category, so everything keeps the source's category.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::Result;
use crate::models::{ContentItem, SourceSite};
use crate::utils::text::{parse_episodes, parse_year};
use crate::utils::url::{extract_slug, resolve};

use super::{parse_selector, select_attr, select_image, select_text, select_texts};

struct Selectors {
    slide: Selector,
    slide_title: Selector,
    slide_link: Selector,
    slide_cover: Selector,
    slide_poster: Selector,
    slide_detail: Selector,
    card: Selector,
    card_name: Selector,
    card_poster: Selector,
    card_eps: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            slide: parse_selector("#slider .deslide-item")?,
            slide_title: parse_selector(".desi-head-title")?,
            slide_link: parse_selector(".desi-buttons a")?,
            slide_cover: parse_selector(".deslide-cover img.film-poster-img")?,
            slide_poster: parse_selector(".deslide-poster img")?,
            slide_detail: parse_selector(".sc-detail .scd-item")?,
            card: parse_selector(".film_list-wrap .flw-item")?,
            card_name: parse_selector(".film-detail .film-name a")?,
            card_poster: parse_selector(".film-poster img")?,
            card_eps: parse_selector(".tick .tick-eps")?,
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
            None => log::debug!("{}: skipping spotlight slide without title or link", source.id),
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
    let href = select_attr(slide, &selectors.slide_link, "href")?;
    let url = resolve(base, &href);
    let slug = extract_slug(&url)?;
    let title = select_text(slide, &selectors.slide_title)?;

    let detail = select_texts(slide, &selectors.slide_detail).join(" ");

    Some(ContentItem {
        id: ContentItem::compose_id(&source.id, &slug),
        title,
        kind: source.default_category.as_str().to_string(),
        year: parse_year(&detail),
        rating: None,
        poster: select_image(slide, &selectors.slide_poster, base),
        backdrop: select_image(slide, &selectors.slide_cover, base),
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

    Some(ContentItem {
        id: ContentItem::compose_id(&source.id, &slug),
        title,
        kind: source.default_category.as_str().to_string(),
        year: None,
        rating: None,
        poster: select_image(card, &selectors.card_poster, base),
        backdrop: None,
        genres: Vec::new(),
        cast: Vec::new(),
        episodes: select_text(card, &selectors.card_eps).and_then(|eps| parse_episodes(&eps)),
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

    const HOME: &str = r#"
        <html><body>
        <div id="slider" class="swiper-container">
          <div class="swiper-wrapper">
            <div class="swiper-slide deslide-item">
              <div class="deslide-cover">
                <div class="deslide-cover-img">
                  <img class="film-poster-img" data-src="/banners/solo-leveling.jpg">
                </div>
              </div>
              <div class="deslide-item-content">
                <div class="desi-sub-text">#1 Spotlight</div>
                <div class="desi-head-title">Solo Leveling</div>
                <div class="sc-detail">
                  <div class="scd-item">TV</div>
                  <div class="scd-item">24m</div>
                  <div class="scd-item m-hide">Jan 6, 2024</div>
                </div>
                <div class="desi-buttons">
                  <a href="/watch/solo-leveling-18718" class="btn btn-primary">Watch Now</a>
                  <a href="/solo-leveling-18718" class="btn btn-secondary">Detail</a>
                </div>
              </div>
              <div class="deslide-poster">
                <img class="film-poster-img" data-src="/posters/solo-leveling.jpg">
              </div>
            </div>
          </div>
        </div>
        <div class="film_list-wrap">
          <div class="flw-item">
            <div class="film-poster">
              <div class="tick ltr">
                <div class="tick-item tick-eps">1089</div>
              </div>
              <img class="film-poster-img lazyload" src="/img/blank.gif"
                   data-src="/posters/one-piece.jpg">
              <a href="/watch/one-piece-100" class="film-poster-ahref"></a>
            </div>
            <div class="film-detail">
              <h3 class="film-name">
                <a href="/one-piece-100" class="dynamic-name" title="One Piece">One Piece</a>
              </h3>
              <div class="fd-infor">
                <span class="fdi-item">TV</span>
                <span class="fdi-item fdi-duration">24m</span>
              </div>
            </div>
          </div>
          <div class="flw-item">
            <div class="film-poster"></div>
            <div class="film-detail"><h3 class="film-name">Broken Card</h3></div>
          </div>
        </div>
        </body></html>
    "#;

    fn source() -> SourceSite {
        SourceSite {
            id: "aniwatch".to_string(),
            name: "Aniwatch".to_string(),
            base_url: "https://aniwatch.example".to_string(),
            listing_paths: vec!["/most-popular?page={page}".to_string()],
            default_category: Category::Anime,
            extractor: ExtractorKind::Aniwatch,
            enabled: true,
        }
    }

    #[test]
    fn test_spotlight_slide_has_full_imagery() {
        let document = Html::parse_document(HOME);
        let base = Url::parse("https://aniwatch.example").unwrap();
        let items = extract(&document, &base, &source()).unwrap();

        let slide = &items[0];
        assert_eq!(slide.id, "aniwatch-solo-leveling-18718");
        assert_eq!(slide.title, "Solo Leveling");
        assert_eq!(slide.kind, "anime");
        assert_eq!(slide.year, Some(2024));
        assert_eq!(
            slide.backdrop.as_deref(),
            Some("https://aniwatch.example/banners/solo-leveling.jpg")
        );
        assert_eq!(
            slide.poster.as_deref(),
            Some("https://aniwatch.example/posters/solo-leveling.jpg")
        );
        assert!(slide.has_full_imagery());
    }

    #[test]
    fn test_cards_follow_slides() {
        let document = Html::parse_document(HOME);
        let base = Url::parse("https://aniwatch.example").unwrap();
        let items = extract(&document, &base, &source()).unwrap();

        assert_eq!(items.len(), 2);

        let card = &items[1];
        assert_eq!(card.id, "aniwatch-one-piece-100");
        assert_eq!(card.title, "One Piece");
        assert_eq!(card.episodes, Some(1089));
        assert_eq!(
            card.poster.as_deref(),
            Some("https://aniwatch.example/posters/one-piece.jpg")
        );
        assert!(card.backdrop.is_none());
    }

    #[test]
    fn test_format_badge_does_not_change_category() {
        let document = Html::parse_document(HOME);
        let base = Url::parse("https://aniwatch.example").unwrap();
        let items = extract(&document, &base, &source()).unwrap();

        assert!(items.iter().all(|item| item.kind == "anime"));
    }
}
