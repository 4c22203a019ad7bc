//! Sync configuration
//!
//! Endpoints, credentials, timeouts and cache settings used by the sync
//! client. Defaults match the production carrier site.

use std::time::Duration;

use crate::data::ContactInfo;

/// Base URL of the carrier REST namespace
pub const DEFAULT_API_BASE: &str =
    "https://aliceblue-rabbit-873105.hostingersite.com/wp-json/carrier/v1";

/// Header carrying the static API key
pub const AUTH_HEADER: &str = "X-Carrier-Auth";

/// Request timeout for each API call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// How long cached contact numbers are trusted without a network call
pub const DEFAULT_CONTACTS_TTL: Duration = Duration::from_secs(60 * 60);

/// Number of posts requested from the blogs endpoint
pub const DEFAULT_POSTS_PER_PAGE: usize = 5;

/// Store key for contact numbers
pub const CONTACTS_CACHE_KEY: &str = "carrier_numbers_v3";

/// Store key for blog posts
pub const POSTS_CACHE_KEY: &str = "carrier_blog_posts";

/// Configuration for one sync pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// REST namespace base, without a trailing slash
    pub api_base: String,
    /// Static key sent as `X-Carrier-Auth`, if any
    pub api_key: Option<String>,
    /// Timeout applied to each request
    pub request_timeout: Duration,
    /// Freshness window for cached contact numbers
    pub contacts_ttl: Duration,
    /// Page size requested from the blogs endpoint
    pub posts_per_page: usize,
    /// Store key for contact numbers
    pub contacts_cache_key: String,
    /// Store key for blog posts
    pub posts_cache_key: String,
    /// Numbers used when neither the API nor the cache can supply them
    pub default_contacts: ContactInfo,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            contacts_ttl: DEFAULT_CONTACTS_TTL,
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            contacts_cache_key: CONTACTS_CACHE_KEY.to_string(),
            posts_cache_key: POSTS_CACHE_KEY.to_string(),
            default_contacts: ContactInfo::default(),
        }
    }
}

impl SyncConfig {
    /// Sets the API base, trimming any trailing slash
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of the settings endpoint
    pub fn settings_url(&self) -> String {
        format!("{}/settings", self.api_base)
    }

    /// URL of the blogs endpoint with the page size applied
    pub fn blogs_url(&self) -> String {
        format!("{}/blogs?per_page={}", self.api_base, self.posts_per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.contacts_ttl, Duration::from_secs(3600));
        assert_eq!(config.posts_per_page, 5);
        assert_eq!(config.contacts_cache_key, "carrier_numbers_v3");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_endpoint_urls() {
        let config = SyncConfig::default().with_api_base("https://example.com/wp-json/carrier/v1/");
        assert_eq!(
            config.settings_url(),
            "https://example.com/wp-json/carrier/v1/settings"
        );
        assert_eq!(
            config.blogs_url(),
            "https://example.com/wp-json/carrier/v1/blogs?per_page=5"
        );
    }
}
