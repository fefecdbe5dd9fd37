//! GitHub GraphQL API access
//!
//! Two operations are used: the identity lookup (`user { id createdAt }`) and the repository
//! count (`repositories { totalCount }`). Requests are sent one at a time; there is no retry.

pub mod client;
pub mod queries;

pub use client::{GithubClient, DEFAULT_GRAPHQL_ENDPOINT};
