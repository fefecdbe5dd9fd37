//! Shared HTTP client construction
//!
//! GitHub rejects requests without a `User-Agent`, so every client built here carries one.

use crate::error::CoreError;
use reqwest::Client;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("profilecard/", env!("CARGO_PKG_VERSION"));

/// Build the client used for GraphQL calls and badge fetches.
///
/// No timeout is configured beyond reqwest's defaults.
pub fn build_client() -> Result<Client, CoreError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| CoreError::HttpClient { source })
}

/// Map a transport error for `url`
pub(crate) fn transport_error(url: &str, source: reqwest::Error) -> CoreError {
    CoreError::Http {
        url: url.to_string(),
        source,
    }
}
