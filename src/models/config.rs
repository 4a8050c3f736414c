//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::source::SourceSite;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Relay fleet and fetch-retry behavior
    #[serde(default)]
    pub relay: RelayConfig,

    /// Scrape pacing and concurrency settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Catalog aggregation settings
    #[serde(default)]
    pub aggregator: AggregatorConfig,

    /// Content API settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Data directory layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Source site definitions
    #[serde(default = "defaults::sources")]
    pub sources: Vec<SourceSite>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.relay.endpoints.is_empty() && !self.relay.allow_direct {
            return Err(AppError::validation(
                "relay.endpoints is empty and relay.allow_direct is off",
            ));
        }
        if self.relay.max_retries == 0 {
            return Err(AppError::validation("relay.max_retries must be > 0"));
        }
        if self.relay.backoff_factor < 1.0 {
            return Err(AppError::validation("relay.backoff_factor must be >= 1.0"));
        }
        if self.relay.timeout_secs == 0 {
            return Err(AppError::validation("relay.timeout_secs must be > 0"));
        }
        if self.relay.user_agents.is_empty() {
            return Err(AppError::validation("relay.user_agents is empty"));
        }
        if self.scraper.max_concurrent == 0 {
            return Err(AppError::validation("scraper.max_concurrent must be > 0"));
        }
        if self.aggregator.max_items_per_file == 0 {
            return Err(AppError::validation(
                "aggregator.max_items_per_file must be > 0",
            ));
        }
        if self.aggregator.trending_count == 0 {
            return Err(AppError::validation("aggregator.trending_count must be > 0"));
        }
        if self.aggregator.hero_banner_count == 0 {
            return Err(AppError::validation(
                "aggregator.hero_banner_count must be > 0",
            ));
        }
        if self.server.listen_addr.trim().is_empty() {
            return Err(AppError::validation("server.listen_addr is empty"));
        }
        if self.sources.is_empty() {
            return Err(AppError::validation("No sources defined"));
        }
        for source in &self.sources {
            if source.id.trim().is_empty() {
                return Err(AppError::validation("A source has an empty id"));
            }
            if !source.base_url.starts_with("http") {
                return Err(AppError::validation(format!(
                    "Source {} base_url must be absolute",
                    source.id
                )));
            }
            if source.listing_paths.is_empty() {
                return Err(AppError::validation(format!(
                    "Source {} has no listing paths",
                    source.id
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relay: RelayConfig::default(),
            scraper: ScraperConfig::default(),
            aggregator: AggregatorConfig::default(),
            server: ServerConfig::default(),
            paths: PathsConfig::default(),
            sources: defaults::sources(),
        }
    }
}

/// Relay fleet and fetch-retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Relay endpoints, in priority order
    #[serde(default = "defaults::relay_endpoints")]
    pub endpoints: Vec<String>,

    /// Total fetch attempts across the relay fleet
    #[serde(default = "defaults::max_retries")]
    pub max_retries: usize,

    /// Base backoff delay in milliseconds
    #[serde(default = "defaults::backoff_base")]
    pub backoff_base_ms: u64,

    /// Backoff multiplier per attempt
    #[serde(default = "defaults::backoff_factor")]
    pub backoff_factor: f64,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Fetch the target directly once relays are exhausted
    #[serde(default = "defaults::allow_direct")]
    pub allow_direct: bool,

    /// Browser User-Agent strings, rotated per attempt
    #[serde(default = "defaults::user_agents")]
    pub user_agents: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoints: defaults::relay_endpoints(),
            max_retries: defaults::max_retries(),
            backoff_base_ms: defaults::backoff_base(),
            backoff_factor: defaults::backoff_factor(),
            timeout_secs: defaults::timeout(),
            allow_direct: defaults::allow_direct(),
            user_agents: defaults::user_agents(),
        }
    }
}

/// Scrape pacing and concurrency settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Delay between listing-page requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum sources scraped concurrently
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Pages fetched per `{page}` listing path
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
            max_pages: defaults::max_pages(),
        }
    }
}

/// Catalog aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Maximum items per output file before chunking
    #[serde(default = "defaults::max_items_per_file")]
    pub max_items_per_file: usize,

    /// Maximum items in trending.json
    #[serde(default = "defaults::trending_count")]
    pub trending_count: usize,

    /// Maximum items in hero_banner.json
    #[serde(default = "defaults::hero_banner_count")]
    pub hero_banner_count: usize,

    /// Years back from now an item still counts as recent for trending
    #[serde(default = "defaults::trending_window_years")]
    pub trending_window_years: i32,

    /// Maximum items in the global recent.json
    #[serde(default = "defaults::recent_count")]
    pub recent_count: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_items_per_file: defaults::max_items_per_file(),
            trending_count: defaults::trending_count(),
            hero_banner_count: defaults::hero_banner_count(),
            trending_window_years: defaults::trending_window_years(),
            recent_count: defaults::recent_count(),
        }
    }
}

/// Content API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address for the content API
    #[serde(default = "defaults::listen_addr")]
    pub listen_addr: String,

    /// Attach permissive CORS headers to every response
    #[serde(default = "defaults::cors_enabled")]
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: defaults::listen_addr(),
            cors_enabled: defaults::cors_enabled(),
        }
    }
}

/// Data directory layout, relative to the data dir.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Per-source scrape dumps
    #[serde(default = "defaults::dumps_dir")]
    pub dumps: String,

    /// Aggregated catalog output
    #[serde(default = "defaults::catalog_dir")]
    pub catalog: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dumps: defaults::dumps_dir(),
            catalog: defaults::catalog_dir(),
        }
    }
}

mod defaults {
    use crate::models::content::Category;
    use crate::models::source::{ExtractorKind, SourceSite};

    // Relay defaults
    pub fn relay_endpoints() -> Vec<String> {
        vec![
            "https://relay.flodrama.com".into(),
            "https://flodrama-relay.fly.dev".into(),
            "https://flodrama-proxy.onrender.com".into(),
        ]
    }
    pub fn max_retries() -> usize {
        5
    }
    pub fn backoff_base() -> u64 {
        500
    }
    pub fn backoff_factor() -> f64 {
        1.5
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn allow_direct() -> bool {
        true
    }
    pub fn user_agents() -> Vec<String> {
        vec![
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36".into(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15".into(),
            "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0".into(),
        ]
    }

    // Scraper defaults
    pub fn request_delay() -> u64 {
        250
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn max_pages() -> u32 {
        5
    }

    // Aggregator defaults
    pub fn max_items_per_file() -> usize {
        1000
    }
    pub fn trending_count() -> usize {
        20
    }
    pub fn hero_banner_count() -> usize {
        10
    }
    pub fn trending_window_years() -> i32 {
        2
    }
    pub fn recent_count() -> usize {
        30
    }

    // Server defaults
    pub fn listen_addr() -> String {
        "127.0.0.1:8787".into()
    }
    pub fn cors_enabled() -> bool {
        true
    }

    // Path defaults
    pub fn dumps_dir() -> String {
        "dumps".into()
    }
    pub fn catalog_dir() -> String {
        "catalog".into()
    }

    // Source defaults
    pub fn sources() -> Vec<SourceSite> {
        vec![
            SourceSite {
                id: "dramacool".to_string(),
                name: "DramaCool".to_string(),
                base_url: "https://dramacool.com.es".to_string(),
                listing_paths: vec![
                    "/most-popular-drama?page={page}".to_string(),
                    "/recently-added-drama?page={page}".to_string(),
                ],
                default_category: Category::Drama,
                extractor: ExtractorKind::Dramacool,
                enabled: true,
            },
            SourceSite {
                id: "aniwatch".to_string(),
                name: "Aniwatch".to_string(),
                base_url: "https://aniwatchtv.to".to_string(),
                listing_paths: vec![
                    "/most-popular?page={page}".to_string(),
                    "/recently-updated?page={page}".to_string(),
                ],
                default_category: Category::Anime,
                extractor: ExtractorKind::Aniwatch,
                enabled: true,
            },
            SourceSite {
                id: "fmovies".to_string(),
                name: "FMovies".to_string(),
                base_url: "https://fmovies.ps".to_string(),
                listing_paths: vec!["/movies?page={page}".to_string()],
                default_category: Category::Film,
                extractor: ExtractorKind::Fmovies,
                enabled: true,
            },
            SourceSite {
                id: "bollyplay".to_string(),
                name: "BollyPlay".to_string(),
                base_url: "https://bollyplay.app".to_string(),
                listing_paths: vec!["/category/bollywood-movies/page/{page}/".to_string()],
                default_category: Category::Bollywood,
                extractor: ExtractorKind::Bollyplay,
                enabled: true,
            },
        ]
    }
}
