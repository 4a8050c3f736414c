// src/catalog/build.rs

//! Catalog builder.
//!
//! Turns per-source dumps into the full catalog bundle: per-category chunk
//! lists plus trending, hero and recent selections. The builder is pure;
//! callers inject the clock so repeated runs over unchanged dumps produce
//! identical output.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Utc};

use crate::models::{AggregatorConfig, Category, ContentItem, SourceDump, classify};

/// Counters for one aggregation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildStats {
    /// Items seen across all dumps
    pub total: usize,
    /// Items dropped because an earlier dump already claimed the id
    pub duplicates: usize,
    /// Items whose type matched no category
    pub unclassified: usize,
}

impl BuildStats {
    /// Items that made it into the catalog.
    pub fn classified(&self) -> usize {
        self.total - self.duplicates - self.unclassified
    }
}

/// Everything the aggregator produces for one category.
#[derive(Debug, Clone)]
pub struct CategoryBundle {
    pub category: Category,
    /// Ordered item pages; the first one becomes `index.json`, the rest
    /// become `chunk_N.json`. Never empty, even for an empty category.
    pub chunks: Vec<Vec<ContentItem>>,
    pub trending: Vec<ContentItem>,
    pub hero: Vec<ContentItem>,
    pub total: usize,
}

/// Full aggregation output.
#[derive(Debug, Clone)]
pub struct CatalogBundle {
    /// One bundle per category, in [`Category::ALL`] order.
    pub categories: Vec<CategoryBundle>,
    /// Cross-category trending selection.
    pub trending: Vec<ContentItem>,
    /// Cross-category hero selection.
    pub hero: Vec<ContentItem>,
    /// Most recently scraped items across the whole catalog.
    pub recent: Vec<ContentItem>,
    pub stats: BuildStats,
}

/// Builder for the aggregated catalog.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    config: AggregatorConfig,
}

impl CatalogBuilder {
    /// Create a new builder with the given aggregation settings.
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Aggregate dumps into the catalog bundle.
    ///
    /// Items are deduplicated by id across dumps (first dump wins), then
    /// classified through the category lookup. Items with an unknown type
    /// are counted and dropped.
    pub fn build(&self, dumps: &[SourceDump], now: DateTime<Utc>) -> CatalogBundle {
        let mut stats = BuildStats::default();
        let mut seen = HashSet::new();
        let mut buckets: HashMap<Category, Vec<ContentItem>> = HashMap::new();

        for dump in dumps {
            for item in &dump.items {
                stats.total += 1;
                if !seen.insert(item.id.clone()) {
                    stats.duplicates += 1;
                    continue;
                }
                match classify(&item.kind) {
                    Some(category) => buckets.entry(category).or_default().push(item.clone()),
                    None => {
                        stats.unclassified += 1;
                        log::debug!("dropping {} with unclassified type {:?}", item.id, item.kind);
                    }
                }
            }
        }

        let mut categories = Vec::with_capacity(Category::ALL.len());
        let mut all: Vec<ContentItem> = Vec::new();

        for category in Category::ALL {
            let mut items = buckets.remove(&category).unwrap_or_default();
            items.sort_by(compare_items);
            all.extend(items.iter().cloned());

            categories.push(CategoryBundle {
                category,
                trending: self.select_trending(&items, now),
                hero: self.select_hero(&items, now),
                total: items.len(),
                chunks: self.chunk(items),
            });
        }

        all.sort_by(compare_items);

        CatalogBundle {
            trending: self.select_trending(&all, now),
            hero: self.select_hero(&all, now),
            recent: self.select_recent(&all),
            categories,
            stats,
        }
    }

    /// Trending selection: recency-window items by rating, then older items
    /// as fill. A window item is never displaced by an out-of-window one.
    fn select_trending(&self, items: &[ContentItem], now: DateTime<Utc>) -> Vec<ContentItem> {
        let cutoff = now.year() - self.config.trending_window_years;
        let (mut window, mut rest): (Vec<&ContentItem>, Vec<&ContentItem>) = items
            .iter()
            .partition(|item| item.year.is_some_and(|year| year >= cutoff));

        window.sort_by(|a, b| compare_by_rating(a, b));
        rest.sort_by(|a, b| compare_by_rating(a, b));

        window
            .into_iter()
            .chain(rest)
            .take(self.config.trending_count)
            .cloned()
            .collect()
    }

    /// Hero selection: items carrying both images, current-year first, then
    /// by rating.
    fn select_hero(&self, items: &[ContentItem], now: DateTime<Utc>) -> Vec<ContentItem> {
        let current_year = now.year();
        let mut candidates: Vec<&ContentItem> =
            items.iter().filter(|item| item.has_full_imagery()).collect();

        candidates.sort_by(|a, b| {
            let a_current = a.year == Some(current_year);
            let b_current = b.year == Some(current_year);
            b_current
                .cmp(&a_current)
                .then_with(|| compare_by_rating(a, b))
        });

        candidates
            .into_iter()
            .take(self.config.hero_banner_count)
            .cloned()
            .collect()
    }

    /// Most recently scraped items, newest first.
    fn select_recent(&self, items: &[ContentItem]) -> Vec<ContentItem> {
        let mut ordered: Vec<&ContentItem> = items.iter().collect();
        ordered.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        ordered
            .into_iter()
            .take(self.config.recent_count)
            .cloned()
            .collect()
    }

    /// Split ordered items into pages of `max_items_per_file`.
    ///
    /// An empty category still yields one empty page so its `index.json`
    /// gets written.
    fn chunk(&self, items: Vec<ContentItem>) -> Vec<Vec<ContentItem>> {
        if items.is_empty() {
            return vec![Vec::new()];
        }
        items
            .chunks(self.config.max_items_per_file)
            .map(|page| page.to_vec())
            .collect()
    }
}

/// Catalog order: year desc, rating desc, then title and id as tiebreakers.
/// Missing years and ratings sort last.
fn compare_items(a: &ContentItem, b: &ContentItem) -> Ordering {
    compare_year_desc(a, b)
        .then_with(|| compare_rating_desc(a, b))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

/// Rating-first order used by the trending and hero selections.
fn compare_by_rating(a: &ContentItem, b: &ContentItem) -> Ordering {
    compare_rating_desc(a, b)
        .then_with(|| compare_year_desc(a, b))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

fn compare_year_desc(a: &ContentItem, b: &ContentItem) -> Ordering {
    match (a.year, b.year) {
        (Some(a_year), Some(b_year)) => b_year.cmp(&a_year),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_rating_desc(a: &ContentItem, b: &ContentItem) -> Ordering {
    match (a.rating, b.rating) {
        (Some(a_rating), Some(b_rating)) => {
            b_rating.partial_cmp(&a_rating).unwrap_or(Ordering::Equal)
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
