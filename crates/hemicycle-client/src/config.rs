//! Client configuration.

use std::collections::HashMap;
use std::time::Duration;

use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_millis(30_000);
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Endpoint families that may carry their own cache TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointClass {
    /// Slow-moving reference data: parties, categories.
    Reference,
    /// Sessions, bills, speakers.
    Listing,
    Statements,
    /// Server-side analytics summaries.
    Analytics,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend address without trailing slash, e.g. `http://localhost:8000`.
    pub base_url: String,
    pub timeout: Duration,
    /// TTL for endpoint classes without an override.
    pub cache_ttl: Duration,
    pub ttl_overrides: HashMap<EndpointClass, Duration>,
    /// Maximum cached responses; `0` disables eviction.
    pub cache_capacity: usize,
    /// Backoff for landing-page fetches.
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            ttl_overrides: HashMap::new(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_ttl(mut self, class: EndpointClass, ttl: Duration) -> Self {
        self.ttl_overrides.insert(class, ttl);
        self
    }

    pub fn ttl_for(&self, class: EndpointClass) -> Duration {
        self.ttl_overrides
            .get(&class)
            .copied()
            .unwrap_or(self.cache_ttl)
    }
}
