//! Caching layer for profilecard-core
//!
//! Provides the JSON-backed per-user, per-year commit count cache.

pub mod commit_cache;

pub use commit_cache::{
    CacheLoadStatus, CommitCache, YearCommits, DEFAULT_CACHE_FILE, DEFAULT_MAX_AGE_YEARS,
};
