//! JSON commit-count cache
//!
//! Stores `username -> { "year": commits }` in a single JSON file (default
//! `commits_cache.json` in the working directory).
//!
//! Persistence model:
//! - The file is read once on load and rewritten in full after every mutation
//! - A missing file starts an empty store; a corrupt one is recovered to empty and reported
//!   through [`CacheLoadStatus::Recovered`]
//! - Save failures are logged and swallowed by the mutating operations
//!
//! There is no cross-process locking: two processes writing the same file race and the last
//! writer wins.

use crate::error::CoreError;
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Default cache file name
pub const DEFAULT_CACHE_FILE: &str = "commits_cache.json";

/// Default pruning horizon in years
pub const DEFAULT_MAX_AGE_YEARS: i32 = 10;

/// Year (as string) to commit count for one user
pub type YearCommits = BTreeMap<String, u64>;

static EMPTY: YearCommits = BTreeMap::new();

/// How the store was initialized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLoadStatus {
    /// Existing file read and parsed
    Loaded,
    /// No backing file yet, started empty
    Fresh,
    /// Backing file unreadable or malformed, started empty
    Recovered { reason: String },
}

impl CacheLoadStatus {
    pub fn is_recovered(&self) -> bool {
        matches!(self, CacheLoadStatus::Recovered { .. })
    }
}

/// Per-user, per-year commit count cache backed by a JSON file
#[derive(Debug)]
pub struct CommitCache {
    path: PathBuf,
    store: BTreeMap<String, YearCommits>,
    status: CacheLoadStatus,
}

impl CommitCache {
    /// Load the cache from `path`. Never fails: missing or malformed files yield an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let (store, status) = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, YearCommits>>(&content) {
                Ok(store) => {
                    debug!(path = %path.display(), users = store.len(), "Loaded commit cache");
                    (store, CacheLoadStatus::Loaded)
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Commit cache is malformed, starting empty"
                    );
                    (
                        BTreeMap::new(),
                        CacheLoadStatus::Recovered {
                            reason: format!("invalid JSON: {}", e),
                        },
                    )
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No commit cache found, starting empty");
                (BTreeMap::new(), CacheLoadStatus::Fresh)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Commit cache is unreadable, starting empty"
                );
                (
                    BTreeMap::new(),
                    CacheLoadStatus::Recovered {
                        reason: format!("unreadable: {}", e),
                    },
                )
            }
        };

        Self {
            path,
            store,
            status,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> &CacheLoadStatus {
        &self.status
    }

    /// Merge `year_commits` into the user's map (new values win) and persist
    pub fn update<I, K>(&mut self, username: &str, year_commits: I)
    where
        I: IntoIterator<Item = (K, u64)>,
        K: ToString,
    {
        let entry = self.store.entry(username.to_string()).or_default();
        for (year, commits) in year_commits {
            entry.insert(year.to_string(), commits);
        }

        self.save_logged();
    }

    /// The user's year map, empty if the user is unknown
    pub fn get(&self, username: &str) -> &YearCommits {
        self.store.get(username).unwrap_or(&EMPTY)
    }

    pub fn users(&self) -> impl Iterator<Item = (&str, &YearCommits)> {
        self.store.iter().map(|(user, years)| (user.as_str(), years))
    }

    pub fn is_empty(&self) -> bool {
        self.store.values().all(|years| years.is_empty())
    }

    /// Drop entries older than `max_age_years` relative to the current calendar year
    pub fn prune(&mut self, max_age_years: i32) -> Result<usize, CoreError> {
        let current_year = chrono::Local::now().year();
        self.prune_relative_to(max_age_years, current_year)
    }

    /// Drop every `(user, year)` with `current_year - year > max_age_years` and persist.
    ///
    /// A non-numeric year key fails the whole operation before anything is removed.
    pub fn prune_relative_to(
        &mut self,
        max_age_years: i32,
        current_year: i32,
    ) -> Result<usize, CoreError> {
        for (username, years) in &self.store {
            for year in years.keys() {
                if year.parse::<i32>().is_err() {
                    return Err(CoreError::InvalidYearKey {
                        username: username.clone(),
                        year: year.clone(),
                    });
                }
            }
        }

        let mut removed = 0;
        for years in self.store.values_mut() {
            let before = years.len();
            years.retain(|year, _| {
                // Validated above; i64 so extreme keys cannot overflow
                let year: i64 = year.parse().unwrap_or(i64::from(current_year));
                i64::from(current_year) - year <= i64::from(max_age_years)
            });
            removed += before - years.len();
        }

        info!(removed, max_age_years, current_year, "Pruned commit cache");
        self.save_logged();
        Ok(removed)
    }

    /// Sum of every count over every user and year, saturating at `u64::MAX`
    pub fn total_commits(&self) -> u64 {
        self.store
            .values()
            .flat_map(|years| years.values())
            .fold(0u64, |total, commits| total.saturating_add(*commits))
    }

    /// Write the whole store to disk (4-space indented JSON)
    pub fn persist(&self) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CoreError::write(parent, e))?;
            }
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.store
            .serialize(&mut serializer)
            .map_err(|e| CoreError::JsonParse {
                path: self.path.clone(),
                message: "failed to serialize commit cache".to_string(),
                source: e,
            })?;

        std::fs::write(&self.path, buf).map_err(|e| CoreError::write(&self.path, e))?;
        debug!(path = %self.path.display(), "Saved commit cache");
        Ok(())
    }

    fn save_logged(&self) {
        if let Err(e) = self.persist() {
            error!(error = %e, "Error saving commits cache");
        }
    }
}
