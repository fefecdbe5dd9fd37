//! GraphQL query documents and response shapes

use crate::models::UserIdentity;
use serde::{Deserialize, Serialize};

/// Identity lookup for a login
pub const USER_QUERY: &str = r#"
query($login: String!){
    user(login: $login){
        id
        createdAt
    }
}"#;

/// Repository count for a login, filtered by affiliation.
///
/// Only `totalCount` of the first page is read; `after` is declared so a cursor can be passed,
/// but pagination is never followed.
pub const REPOSITORY_COUNT_QUERY: &str = r#"
query($owner_affiliation: [RepositoryAffiliation], $login: String!, $cursor: String){
    user(login: $login){
        repositories(first: 100, after: $cursor, ownerAffiliations: $owner_affiliation){
            totalCount
        }
    }
}"#;

/// Request body posted to the GraphQL endpoint
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Serialize)]
pub struct UserVariables<'a> {
    pub login: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RepositoryCountVariables<'a> {
    pub owner_affiliation: Vec<&'static str>,
    pub login: &'a str,
    pub cursor: Option<&'a str>,
}

/// Generic GraphQL envelope: `data` and/or `errors`
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UserData {
    pub user: Option<UserIdentity>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryCountData {
    pub user: Option<RepositoryOwner>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryOwner {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection {
    pub total_count: u64,
}
