//! Relay rotation state.
//!
//! Tracks which relays recently succeeded or failed and picks the next one to
//! try. State is in-memory only and resets once every relay has failed.

/// One relay endpoint with its in-memory health marks.
#[derive(Debug, Clone)]
pub struct RelayServer {
    /// Relay origin, e.g. `https://relay.flodrama.com`
    pub url: String,
    /// This relay served the most recent successful fetch
    pub last_success: bool,
    /// This relay failed since the last reset
    pub failed: bool,
}

impl RelayServer {
    fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            last_success: false,
            failed: false,
        }
    }
}

/// In-memory rotation over the configured relay fleet.
///
/// Selection policy: the last-successful relay first, else the next relay not
/// marked failed, else (every relay failed) the failure set clears and
/// selection cycles from the first relay.
#[derive(Debug, Clone, Default)]
pub struct RelayPool {
    servers: Vec<RelayServer>,
}

impl RelayPool {
    /// Build a pool from endpoint URLs, in priority order.
    pub fn new(endpoints: &[String]) -> Self {
        Self {
            servers: endpoints.iter().map(RelayServer::new).collect(),
        }
    }

    /// Pick the index of the next relay to try.
    ///
    /// Returns `None` only when no relays are configured.
    pub fn select(&mut self) -> Option<usize> {
        if self.servers.is_empty() {
            return None;
        }

        if let Some(index) = self
            .servers
            .iter()
            .position(|s| s.last_success && !s.failed)
        {
            return Some(index);
        }

        if let Some(index) = self.servers.iter().position(|s| !s.failed) {
            return Some(index);
        }

        // Every relay is marked failed: clear the set and cycle from the start.
        for server in &mut self.servers {
            server.failed = false;
        }
        Some(0)
    }

    /// Relay URL at `index`.
    pub fn url(&self, index: usize) -> &str {
        &self.servers[index].url
    }

    /// Record a successful fetch through the relay at `index`.
    pub fn mark_success(&mut self, index: usize) {
        for (i, server) in self.servers.iter_mut().enumerate() {
            server.last_success = i == index;
            if i == index {
                server.failed = false;
            }
        }
    }

    /// Record a failed fetch through the relay at `index`.
    pub fn mark_failed(&mut self, index: usize) {
        if let Some(server) = self.servers.get_mut(index) {
            server.failed = true;
            server.last_success = false;
        }
    }

    /// Whether every relay is currently marked failed.
    pub fn all_failed(&self) -> bool {
        !self.servers.is_empty() && self.servers.iter().all(|s| s.failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: usize) -> RelayPool {
        let endpoints: Vec<String> = (0..n).map(|i| format!("https://relay{i}.test")).collect();
        RelayPool::new(&endpoints)
    }

    #[test]
    fn test_select_starts_at_first() {
        let mut pool = pool(3);
        assert_eq!(pool.select(), Some(0));
    }

    #[test]
    fn test_select_prefers_last_success() {
        let mut pool = pool(3);
        pool.mark_success(2);
        assert_eq!(pool.select(), Some(2));
    }

    #[test]
    fn test_select_skips_failed() {
        let mut pool = pool(3);
        pool.mark_failed(0);
        assert_eq!(pool.select(), Some(1));

        pool.mark_failed(1);
        assert_eq!(pool.select(), Some(2));
    }

    #[test]
    fn test_exhaustion_resets_failure_set() {
        let mut pool = pool(3);
        for i in 0..3 {
            pool.mark_failed(i);
        }
        assert!(pool.all_failed());

        // Once all are exhausted the failure set clears and selection
        // proceeds from the first relay again.
        assert_eq!(pool.select(), Some(0));
        assert!(!pool.all_failed());
        pool.mark_failed(0);
        assert_eq!(pool.select(), Some(1));
    }

    #[test]
    fn test_failure_clears_last_success_preference() {
        let mut pool = pool(2);
        pool.mark_success(1);
        pool.mark_failed(1);
        assert_eq!(pool.select(), Some(0));
    }

    #[test]
    fn test_success_moves_preference() {
        let mut pool = pool(3);
        pool.mark_success(0);
        pool.mark_success(2);
        // Only the most recent success is preferred.
        assert_eq!(pool.select(), Some(2));
    }

    #[test]
    fn test_empty_pool_selects_nothing() {
        let mut pool = RelayPool::new(&[]);
        assert_eq!(pool.select(), None);
        assert!(!pool.all_failed());
    }
}
