//! Configuration: GitHub credentials and the card settings file
//!
//! Credentials come from `USER_NAME` / `ACCESS_TOKEN` (process environment, or a `.env` file
//! loaded by the binary). Everything else lives in an optional TOML file:
//!
//! ```toml
//! birth_date = "2004-01-12"
//! template = "profile_card.svg"
//! affiliations = ["OWNER", "COLLABORATOR"]
//!
//! [slots]
//! age = 38
//!
//! [[profile.info]]
//! label = "OS"
//! value = "Linux"
//! ```
//!
//! Dates are quoted strings; bare TOML dates are not accepted.

use crate::ascii::AsciiOptions;
use crate::cache::{DEFAULT_CACHE_FILE, DEFAULT_MAX_AGE_YEARS};
use crate::error::CoreError;
use crate::github::DEFAULT_GRAPHQL_ENDPOINT;
use crate::models::{InfoEntry, RepositoryAffiliation};
use crate::scraper::DEFAULT_BADGE_URL;
use crate::svg::TemplateSlots;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable holding the GitHub login
pub const USER_NAME_VAR: &str = "USER_NAME";
/// Environment variable holding the GitHub access token
pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";
/// Settings file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "profilecard.toml";
/// Template patched by `update`
pub const DEFAULT_TEMPLATE: &str = "profile_card.svg";

/// GitHub login and token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    token: String,
}

impl Credentials {
    /// Both values must be present and non-blank
    pub fn new(username: Option<String>, token: Option<String>) -> Result<Self, CoreError> {
        let username = require(username, USER_NAME_VAR)?;
        let token = require(token, ACCESS_TOKEN_VAR)?;
        Ok(Self { username, token })
    }

    /// Read `USER_NAME` and `ACCESS_TOKEN` from the process environment
    pub fn from_env() -> Result<Self, CoreError> {
        Self::new(
            std::env::var(USER_NAME_VAR).ok(),
            std::env::var(ACCESS_TOKEN_VAR).ok(),
        )
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn require(value: Option<String>, key: &str) -> Result<String, CoreError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(CoreError::MissingConfig {
            key: key.to_string(),
        }),
    }
}

/// Card settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Start of the age counter; the account creation date when unset
    pub birth_date: Option<NaiveDate>,
    pub template: PathBuf,
    pub cache_file: PathBuf,
    /// Badge URL with a `{username}` placeholder
    pub badge_url: String,
    pub affiliations: Vec<RepositoryAffiliation>,
    /// Pruning horizon for `cache prune` and `update --prune`
    pub prune_years: i32,
    pub graphql_endpoint: String,
    pub slots: TemplateSlots,
    pub profile: ProfileConfig,
    pub ascii: AsciiConfig,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            birth_date: None,
            template: PathBuf::from(DEFAULT_TEMPLATE),
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            badge_url: DEFAULT_BADGE_URL.to_string(),
            affiliations: vec![RepositoryAffiliation::Owner],
            prune_years: DEFAULT_MAX_AGE_YEARS,
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            slots: TemplateSlots::default(),
            profile: ProfileConfig::default(),
            ascii: AsciiConfig::default(),
        }
    }
}

/// `[profile]`: inputs of the SVG builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub ascii: PathBuf,
    pub output: PathBuf,
    pub info: Vec<InfoEntry>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            ascii: PathBuf::from("ascii.txt"),
            output: PathBuf::from("profile.svg"),
            info: Vec::new(),
        }
    }
}

/// `[ascii]`: image conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiConfig {
    pub image: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub brightness: f32,
    pub sharpen: f32,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        let options = AsciiOptions::default();
        Self {
            image: PathBuf::from("image.png"),
            output: PathBuf::from("ascii.txt"),
            width: options.width,
            height: options.height,
            brightness: options.brightness,
            sharpen: options.sharpen,
        }
    }
}

impl AsciiConfig {
    pub fn options(&self) -> AsciiOptions {
        AsciiOptions {
            width: self.width,
            height: self.height,
            brightness: self.brightness,
            sharpen: self.sharpen,
        }
    }
}

impl CardConfig {
    /// Load settings from `path`.
    ///
    /// When `explicit` is false (the default location), a missing file yields defaults.
    pub fn load(path: &Path, explicit: bool) -> Result<Self, CoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(CoreError::read(path, e)),
        };

        let config: CardConfig = toml::from_str(&content).map_err(|e| CoreError::TomlParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.slots.validate()?;
        self.ascii.options().validate()?;
        if self.prune_years < 0 {
            return Err(CoreError::InvalidConfig {
                message: format!("prune_years must be >= 0, got {}", self.prune_years),
            });
        }
        if !self.badge_url.contains("{username}") {
            return Err(CoreError::InvalidConfig {
                message: "badge_url must contain a {username} placeholder".to_string(),
            });
        }
        Ok(())
    }
}
