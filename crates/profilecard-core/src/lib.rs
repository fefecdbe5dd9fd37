//! profilecard-core - Core library for profilecard
//!
//! GitHub GraphQL queries, profile badge scraping, the commit-count cache, and SVG output
//! (template patching and fresh profile rendering).

pub mod age;
pub mod ascii;
pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod http;
pub mod metrics;
pub mod models;
pub mod scraper;
pub mod svg;
pub mod tracker;

pub use age::{format_age, Age};
pub use ascii::{image_to_ascii, AsciiOptions};
pub use cache::{CacheLoadStatus, CommitCache};
pub use config::{CardConfig, Credentials};
pub use error::CoreError;
pub use github::GithubClient;
pub use metrics::{PerformanceLog, QueryCounter};
pub use scraper::CardScraper;
pub use svg::{SvgBuilder, TemplateSlots};
pub use tracker::{RefreshReport, StatsTracker};
