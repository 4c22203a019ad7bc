//! Contact and blog post sync
//!
//! [`SyncClient`] resolves contact numbers and blog posts concurrently, each
//! through its own fallback chain, and then applies them to a page:
//!
//! - contacts: fresh cache → API → stale cache → configured defaults
//! - posts: API → cache → inline error message
//!
//! Every failure is caught at the resolution boundary; a sync pass always
//! produces a [`SyncReport`] and never an error.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::CacheManager;
use crate::config::{SyncConfig, AUTH_HEADER};
use crate::data::{parse_posts, parse_settings, ContactInfo, Post, ShapeError};
use crate::fetch::{FetchError, FetchRequest, FetchResponse, Fetcher};
use crate::page::{
    apply_contacts, has_tabs_container, render_error, render_posts, Document, LinkUpdates,
    POSTS_ERROR_MESSAGE,
};

/// Errors that end a resolution attempt and trigger its fallback
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport failure, non-2xx status, or timeout
    #[error(transparent)]
    Network(#[from] FetchError),

    /// Response body did not have the expected shape
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Where resolved contact numbers came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSource {
    /// Fresh cache entry; no request was made
    Cache,
    /// Settings endpoint
    Network,
    /// Expired cache entry used after the request failed
    StaleCache,
    /// Configured defaults used after the request failed with nothing cached
    Default,
}

/// Terminal state of one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Live or fresh data was rendered
    Rendered,
    /// Fallback data was rendered after a failure
    FallbackRendered,
    /// Nothing to render; an error message was shown instead
    ErrorShown,
    /// The page has no target for this resolution
    Skipped,
}

/// Resolved contact numbers with their origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactResolution {
    pub contacts: ContactInfo,
    pub source: ContactSource,
}

impl ContactResolution {
    pub fn outcome(&self) -> Outcome {
        match self.source {
            ContactSource::Cache | ContactSource::Network => Outcome::Rendered,
            ContactSource::StaleCache | ContactSource::Default => Outcome::FallbackRendered,
        }
    }
}

/// Result of resolving blog posts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostsResolution {
    /// Posts from the blogs endpoint
    Live(Vec<Post>),
    /// Posts from the cache after the request failed
    Cached(Vec<Post>),
    /// Neither the endpoint nor the cache had posts
    Unavailable,
    /// No tabs container on the page; nothing was requested
    Skipped,
}

impl PostsResolution {
    pub fn outcome(&self) -> Outcome {
        match self {
            PostsResolution::Live(_) => Outcome::Rendered,
            PostsResolution::Cached(_) => Outcome::FallbackRendered,
            PostsResolution::Unavailable => Outcome::ErrorShown,
            PostsResolution::Skipped => Outcome::Skipped,
        }
    }
}

/// Summary of one sync pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub contacts: ContactResolution,
    pub contacts_outcome: Outcome,
    pub links: LinkUpdates,
    pub posts_outcome: Outcome,
    pub posts_rendered: usize,
}

/// Resolves carrier data and applies it to pages
pub struct SyncClient<F: Fetcher> {
    config: SyncConfig,
    fetcher: F,
    cache: CacheManager,
}

impl<F: Fetcher> SyncClient<F> {
    /// Creates a client with injected fetcher and cache
    pub fn new(config: SyncConfig, fetcher: F, cache: CacheManager) -> Self {
        Self {
            config,
            fetcher,
            cache,
        }
    }

    /// Runs one sync pass over `doc`
    ///
    /// Both resolutions run concurrently; the page is mutated once both have
    /// settled, so nothing is written after a request is aborted.
    pub async fn run(&self, doc: &mut Document) -> SyncReport {
        let wants_posts = has_tabs_container(doc);
        if !wants_posts {
            debug!("No #tabs container; skipping posts");
        }

        let posts = async {
            if wants_posts {
                self.resolve_posts().await
            } else {
                PostsResolution::Skipped
            }
        };
        let (contacts, posts) = futures::future::join(self.resolve_contacts(), posts).await;

        let links = apply_contacts(doc, &contacts.contacts);
        info!(
            "Updated {} phone and {} WhatsApp links from {:?}",
            links.phone, links.whatsapp, contacts.source
        );

        let posts_rendered = match &posts {
            PostsResolution::Live(list) | PostsResolution::Cached(list) => {
                render_posts(doc, list);
                list.len()
            }
            PostsResolution::Unavailable => {
                render_error(doc, POSTS_ERROR_MESSAGE);
                0
            }
            PostsResolution::Skipped => 0,
        };

        SyncReport {
            contacts_outcome: contacts.outcome(),
            contacts,
            links,
            posts_outcome: posts.outcome(),
            posts_rendered,
        }
    }

    /// Resolves contact numbers
    ///
    /// A fresh cache entry short-circuits the request. On any request or
    /// validation failure the last cached value is used even if expired, then
    /// the configured defaults.
    pub async fn resolve_contacts(&self) -> ContactResolution {
        let key = &self.config.contacts_cache_key;

        let cached = match self
            .cache
            .read::<ContactInfo>(key, Some(self.config.contacts_ttl))
        {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Cache read failed: {}", e);
                None
            }
        };

        if let Some(entry) = &cached {
            if !entry.is_expired {
                debug!("Contacts: cache hit");
                return ContactResolution {
                    contacts: entry.data.clone(),
                    source: ContactSource::Cache,
                };
            }
        }

        debug!("Contacts: fetching {}", self.config.settings_url());
        match self.fetch_contacts().await {
            Ok(contacts) => {
                if let Err(e) = self.cache.write(key, &contacts) {
                    warn!("Cache write failed: {}", e);
                }
                ContactResolution {
                    contacts,
                    source: ContactSource::Network,
                }
            }
            Err(e) => {
                warn!("Contact lookup failed, falling back: {}", e);
                match cached {
                    Some(entry) => ContactResolution {
                        contacts: entry.data,
                        source: ContactSource::StaleCache,
                    },
                    None => ContactResolution {
                        contacts: self.config.default_contacts.clone(),
                        source: ContactSource::Default,
                    },
                }
            }
        }
    }

    /// Resolves blog posts
    ///
    /// Always asks the endpoint first; the cache is only a fallback.
    pub async fn resolve_posts(&self) -> PostsResolution {
        let key = &self.config.posts_cache_key;

        debug!("Posts: fetching {}", self.config.blogs_url());
        match self.fetch_posts().await {
            Ok(posts) => {
                if let Err(e) = self.cache.write(key, &posts) {
                    warn!("Cache write failed: {}", e);
                }
                return PostsResolution::Live(posts);
            }
            Err(e) => warn!("Post lookup failed, falling back to cache: {}", e),
        }

        match self.cache.read::<Vec<Post>>(key, None) {
            Ok(Some(entry)) if !entry.data.is_empty() => PostsResolution::Cached(entry.data),
            Ok(_) => {
                warn!("No cached posts available");
                PostsResolution::Unavailable
            }
            Err(e) => {
                warn!("Cache read failed: {}", e);
                PostsResolution::Unavailable
            }
        }
    }

    async fn fetch_contacts(&self) -> Result<ContactInfo, SyncError> {
        let response = self.fetch(self.request(self.config.settings_url())).await?;
        Ok(parse_settings(&response.body)?)
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>, SyncError> {
        let response = self.fetch(self.request(self.config.blogs_url())).await?;
        Ok(parse_posts(&response.body, self.config.posts_per_page)?)
    }

    fn request(&self, url: String) -> FetchRequest {
        let request = FetchRequest::get(url);
        match &self.config.api_key {
            Some(key) => request.header(AUTH_HEADER, key.as_str()),
            None => request,
        }
    }

    /// Issues a request under the configured timeout
    ///
    /// On timeout the request future is dropped, which aborts it.
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let timeout = self.config.request_timeout;
        let response = tokio::time::timeout(timeout, self.fetcher.get(request))
            .await
            .map_err(|_| FetchError::Timeout(timeout))??;

        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }
        Ok(response)
    }
}

/// Explicit entry point: one sync pass with injected dependencies
pub async fn run_page<F: Fetcher>(
    config: SyncConfig,
    fetcher: F,
    cache: CacheManager,
    doc: &mut Document,
) -> SyncReport {
    SyncClient::new(config, fetcher, cache).run(doc).await
}
