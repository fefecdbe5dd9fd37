//! Error types for profilecard-core
//!
//! One error hierarchy built with thiserror. Recoverable conditions (a corrupt cache file,
//! an unparseable badge) are handled where they occur; everything else bubbles up as
//! `CoreError` so the binary can report it and exit.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for profilecard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===================
    // Parse Errors
    // ===================
    #[error("Failed to parse JSON in {path}: {message}")]
    JsonParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse TOML in {path}: {message}")]
    TomlParse { path: PathBuf, message: String },

    #[error("Malformed SVG document: {message}")]
    XmlParse { message: String },

    #[error("Invalid year key '{year}' for user '{username}'")]
    InvalidYearKey { username: String, year: String },

    #[error("Invalid date: {message}")]
    InvalidDate { message: String },

    // ===================
    // Network Errors
    // ===================
    #[error("HTTP request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client")]
    HttpClient {
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request to {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("GitHub GraphQL request failed: {message}")]
    GraphQl { message: String },

    // ===================
    // Template Errors
    // ===================
    #[error("Template {path} does not match the expected layout: expected {expected}, found {found}")]
    TemplateMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("Missing required configuration: {key}")]
    MissingConfig { key: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    // ===================
    // Image Errors
    // ===================
    #[error("Failed to process image {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl CoreError {
    /// Map an `std::io::Error` from a read into `FileRead`
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Map an `std::io::Error` from a write into `FileWrite`
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::FileWrite {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn xml(message: impl std::fmt::Display) -> Self {
        CoreError::XmlParse {
            message: message.to_string(),
        }
    }

    /// True for errors caused by the network or the remote API
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CoreError::Http { .. } | CoreError::HttpStatus { .. } | CoreError::GraphQl { .. }
        )
    }
}
