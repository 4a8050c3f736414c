// src/relay/client.rs

//! Relay-backed HTML fetching.
//!
//! Rotates across the relay fleet with exponential backoff between attempts,
//! sending browser-like headers. Once the relay attempts are used up the
//! client can fall back to a direct fetch.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::RelayConfig;
use crate::relay::pool::RelayPool;

/// Request body for `POST {relay}/scrape`.
#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    url: &'a str,
    headers: HashMap<&'static str, String>,
}

/// Response body from a relay.
#[derive(Debug, Deserialize)]
struct RelayResponse {
    #[serde(default)]
    html: String,
    #[serde(default)]
    status: u16,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTML fetcher that rounds-robins across relay endpoints.
///
/// Shared across concurrent scrapes; the rotation state lives behind an async
/// mutex so failure marks from one task steer the others.
pub struct RelayClient {
    http: Client,
    pool: Mutex<RelayPool>,
    config: RelayConfig,
}

impl RelayClient {
    /// Create a client over the configured relay fleet.
    pub fn new(config: RelayConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            pool: Mutex::new(RelayPool::new(&config.endpoints)),
            config,
        })
    }

    /// Fetch the HTML behind `url`.
    ///
    /// Tries up to `max_retries` relay attempts (selection policy in
    /// [`RelayPool`]), sleeping a growing backoff between attempts, then the
    /// direct fallback when allowed. The final error carries the attempt count
    /// and the last underlying failure.
    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        let mut last_error = String::from("no relay endpoints configured");
        let mut attempts = 0usize;

        for attempt in 0..self.config.max_retries {
            let picked = {
                let mut pool = self.pool.lock().await;
                pool.select().map(|i| (i, pool.url(i).to_string()))
            };
            let Some((index, relay_url)) = picked else {
                break;
            };

            attempts += 1;
            match self.fetch_via_relay(&relay_url, url, attempt).await {
                Ok(html) => {
                    self.pool.lock().await.mark_success(index);
                    return Ok(html);
                }
                Err(error) => {
                    log::warn!("Relay {relay_url} failed for {url}: {error}");
                    last_error = error.to_string();
                    self.pool.lock().await.mark_failed(index);
                }
            }

            if attempt + 1 < self.config.max_retries {
                tokio::time::sleep(self.backoff_delay(attempt)).await;
            }
        }

        if self.config.allow_direct {
            attempts += 1;
            match self.fetch_direct(url, attempts).await {
                Ok(html) => return Ok(html),
                Err(error) => {
                    log::warn!("Direct fetch failed for {url}: {error}");
                    last_error = error.to_string();
                }
            }
        }

        Err(AppError::relay(url, attempts, last_error))
    }

    /// Ask one relay to fetch the target URL.
    async fn fetch_via_relay(
        &self,
        relay_url: &str,
        target: &str,
        attempt: usize,
    ) -> Result<String> {
        let endpoint = format!("{}/scrape", relay_url.trim_end_matches('/'));
        let request = RelayRequest {
            url: target,
            headers: self.spoofed_headers(target, attempt),
        };

        let response: RelayResponse = self
            .http
            .post(&endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error.filter(|e| !e.is_empty()) {
            return Err(AppError::scrape(relay_url, error));
        }
        // Minimal relays omit the upstream status; only reject explicit failures.
        if response.status != 0 && !(200..400).contains(&response.status) {
            return Err(AppError::scrape(
                relay_url,
                format!("upstream status {}", response.status),
            ));
        }
        if response.html.trim().is_empty() {
            return Err(AppError::scrape(relay_url, "empty html body"));
        }

        log::debug!(
            "Relay {} fetched {} ({} bytes, title {:?})",
            relay_url,
            target,
            response.html.len(),
            response.title
        );
        Ok(response.html)
    }

    /// Fetch the target URL without a relay, with the same spoofed headers.
    async fn fetch_direct(&self, target: &str, attempt: usize) -> Result<String> {
        let mut request = self.http.get(target);
        for (name, value) in self.spoofed_headers(target, attempt) {
            request = request.header(name, value);
        }

        let body = request
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if body.trim().is_empty() {
            return Err(AppError::scrape(target, "empty html body"));
        }
        Ok(body)
    }

    /// Browser-like headers, rotating the User-Agent per attempt.
    fn spoofed_headers(&self, target: &str, attempt: usize) -> HashMap<&'static str, String> {
        let mut headers = HashMap::new();

        let agents = &self.config.user_agents;
        if !agents.is_empty() {
            headers.insert("User-Agent", agents[attempt % agents.len()].clone());
        }
        headers.insert(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        );
        headers.insert("Accept-Language", "en-US,en;q=0.9".to_string());

        if let Ok(parsed) = Url::parse(target) {
            if let Some(host) = parsed.host_str() {
                headers.insert(
                    "Referer",
                    format!("{}://{}/", parsed.scheme(), host),
                );
            }
        }

        headers
    }

    /// Backoff before the attempt after `attempt`: `base * factor^attempt`.
    fn backoff_delay(&self, attempt: usize) -> Duration {
        let base = self.config.backoff_base_ms as f64;
        let ms = base * self.config.backoff_factor.powi(attempt as i32);
        Duration::from_millis(ms as u64)
    }
}
