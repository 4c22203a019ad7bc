//! Command-line interface parsing for carrier-sync
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a [`SyncConfig`], a cache store, and an output target.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::cache::{FileStore, MemoryStore, Store};
use crate::config::{SyncConfig, DEFAULT_API_BASE};
use crate::data::ContactInfo;

/// Error types for CLI setup
#[derive(Debug, Error)]
pub enum CliError {
    /// No cache directory could be determined and none was given
    #[error("Could not determine a cache directory; pass --cache-dir or --no-cache")]
    NoCacheDir,
}

/// carrier-sync - Sync carrier contact numbers and blog previews into an HTML page
#[derive(Parser, Debug)]
#[command(name = "carrier-sync")]
#[command(about = "Sync carrier contact numbers and blog previews into an HTML page")]
#[command(version)]
pub struct Cli {
    /// HTML page to update
    #[arg(value_name = "PAGE")]
    pub page: PathBuf,

    /// Write the updated page here instead of stdout
    #[arg(short, long, value_name = "FILE", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Overwrite PAGE with the updated page
    #[arg(long)]
    pub in_place: bool,

    /// Base URL of the carrier REST namespace
    #[arg(long, env = "CARRIER_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Static key sent as X-Carrier-Auth
    #[arg(long, env = "CARRIER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// How long cached contact numbers are used without a request, in seconds
    #[arg(long, default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Number of blog posts to request
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..=100))]
    pub per_page: u64,

    /// Directory for cached responses (defaults to the user cache dir)
    #[arg(long, value_name = "DIR", conflicts_with = "no_cache")]
    pub cache_dir: Option<PathBuf>,

    /// Keep cached responses in memory for this run only
    #[arg(long)]
    pub no_cache: bool,

    /// Phone number used when neither the API nor the cache has one
    #[arg(long, value_name = "NUMBER")]
    pub default_phone: Option<String>,

    /// WhatsApp number used when neither the API nor the cache has one
    #[arg(long, value_name = "NUMBER")]
    pub default_whatsapp: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Where the updated page is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl Cli {
    /// Builds the sync configuration from the parsed arguments
    pub fn sync_config(&self) -> SyncConfig {
        let defaults = ContactInfo::default();
        SyncConfig {
            api_key: self.api_key.clone().filter(|k| !k.is_empty()),
            request_timeout: Duration::from_secs(self.timeout_secs),
            contacts_ttl: Duration::from_secs(self.cache_ttl_secs),
            posts_per_page: self.per_page as usize,
            default_contacts: ContactInfo {
                phone: self.default_phone.clone().unwrap_or(defaults.phone),
                whatsapp: self.default_whatsapp.clone().unwrap_or(defaults.whatsapp),
            },
            ..SyncConfig::default()
        }
        .with_api_base(self.api_base.as_str())
    }

    /// Picks the output target
    pub fn output_target(&self) -> OutputTarget {
        match (&self.output, self.in_place) {
            (Some(path), _) => OutputTarget::File(path.clone()),
            (None, true) => OutputTarget::File(self.page.clone()),
            (None, false) => OutputTarget::Stdout,
        }
    }

    /// Opens the cache store selected by the arguments
    pub fn store(&self) -> Result<Arc<dyn Store>, CliError> {
        if self.no_cache {
            return Ok(Arc::new(MemoryStore::new()));
        }
        let store = match &self.cache_dir {
            Some(dir) => FileStore::with_dir(dir.clone()),
            None => FileStore::new().ok_or(CliError::NoCacheDir)?,
        };
        debug!("Cache directory: {}", store.dir().display());
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_page_only() {
        let cli = Cli::parse_from(["carrier-sync", "index.html"]);
        assert_eq!(cli.page, PathBuf::from("index.html"));
        assert!(cli.output.is_none());
        assert!(!cli.in_place);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_requires_page() {
        assert!(Cli::try_parse_from(["carrier-sync"]).is_err());
    }

    #[test]
    fn test_output_and_in_place_conflict() {
        let result = Cli::try_parse_from(["carrier-sync", "a.html", "-o", "b.html", "--in-place"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cache_dir_and_no_cache_conflict() {
        let result =
            Cli::try_parse_from(["carrier-sync", "a.html", "--cache-dir", "/tmp/x", "--no-cache"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = Cli::try_parse_from(["carrier-sync", "a.html", "--timeout-secs", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_target() {
        let stdout = Cli::parse_from(["carrier-sync", "a.html"]);
        assert_eq!(stdout.output_target(), OutputTarget::Stdout);

        let file = Cli::parse_from(["carrier-sync", "a.html", "-o", "b.html"]);
        assert_eq!(file.output_target(), OutputTarget::File(PathBuf::from("b.html")));

        let in_place = Cli::parse_from(["carrier-sync", "a.html", "--in-place"]);
        assert_eq!(in_place.output_target(), OutputTarget::File(PathBuf::from("a.html")));
    }

    #[test]
    fn test_sync_config_from_flags() {
        let cli = Cli::parse_from([
            "carrier-sync",
            "a.html",
            "--api-base",
            "https://example.com/wp-json/carrier/v1/",
            "--api-key",
            "k",
            "--timeout-secs",
            "2",
            "--cache-ttl-secs",
            "60",
            "--per-page",
            "3",
            "--default-phone",
            "111",
        ]);
        let config = cli.sync_config();

        assert_eq!(config.api_base, "https://example.com/wp-json/carrier/v1");
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.contacts_ttl, Duration::from_secs(60));
        assert_eq!(config.posts_per_page, 3);
        assert_eq!(config.default_contacts.phone, "111");
        assert_eq!(config.default_contacts.whatsapp, ContactInfo::default().whatsapp);
    }

    #[test]
    fn test_no_cache_uses_memory_store() {
        let cli = Cli::parse_from(["carrier-sync", "a.html", "--no-cache"]);
        let store = cli.store().unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }
}
