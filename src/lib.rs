//! carrier-sync library
//!
//! Resolves carrier contact numbers and blog posts from the WordPress carrier
//! API, with a timestamped cache as fallback, and writes them into HTML pages.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod fetch;
pub mod page;
pub mod sync;

pub use config::SyncConfig;
pub use sync::{run_page, SyncClient, SyncReport};
