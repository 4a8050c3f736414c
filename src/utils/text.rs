// src/utils/text.rs

//! Text cleanup and field parsing helpers shared by the extractors.

use regex::Regex;

/// Collapse whitespace runs and trim.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pull the first plausible release year out of free text.
pub fn parse_year(text: &str) -> Option<i32> {
    let pattern = Regex::new(r"(?:19|20)\d{2}").ok()?;
    let found = pattern.find(text)?;
    found.as_str().parse().ok()
}

/// Pull a 0-10 rating out of free text.
///
/// Accepts `8.5`, `8.5/10` and percentage-style `85` values; anything that
/// cannot be normalized into the 0-10 range is dropped.
pub fn parse_rating(text: &str) -> Option<f64> {
    let pattern = Regex::new(r"\d+(?:\.\d+)?").ok()?;
    let value: f64 = pattern.find(text)?.as_str().parse().ok()?;

    let normalized = if value > 10.0 && value <= 100.0 {
        value / 10.0
    } else {
        value
    };

    (0.0..=10.0).contains(&normalized).then_some(normalized)
}

/// Pull an episode count out of badge text like `Ep 16` or `12 / 24`.
pub fn parse_episodes(text: &str) -> Option<u32> {
    let pattern = Regex::new(r"\d+").ok()?;
    pattern.find(text)?.as_str().parse().ok()
}
