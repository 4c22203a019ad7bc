//! Cache module for persisting API responses between runs
//!
//! This module provides a string key-value [`Store`] seam with file-backed and
//! in-memory implementations, and a cache manager that wraps every cached
//! entity in a `{data, timestamp}` envelope. Expired entries are still handed
//! back with an `is_expired` flag so callers can fall back to stale data when
//! the API is unavailable.

mod manager;
mod store;

pub use manager::{CacheError, CacheManager, CachedData};
pub use store::{FileStore, MemoryStore, Store};
