//! GraphQL client for the GitHub API

use super::queries::{
    GraphQlRequest, GraphQlResponse, RepositoryCountData, RepositoryCountVariables, UserData,
    UserVariables, REPOSITORY_COUNT_QUERY, USER_QUERY,
};
use crate::error::CoreError;
use crate::http::{build_client, transport_error};
use crate::models::{RepositoryAffiliation, UserIdentity};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Public GitHub GraphQL endpoint
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// Authenticated GraphQL client. Not `Debug`, so the token never ends up in logs.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl GithubClient {
    pub fn new(token: impl Into<String>) -> Result<Self, CoreError> {
        Ok(Self::with_client(build_client()?, token))
    }

    pub fn with_client(client: Client, token: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            token: token.into(),
        }
    }

    /// Point the client at another endpoint (GitHub Enterprise, local test server)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Account id and creation time for `login`
    pub async fn user_info(&self, login: &str) -> Result<UserIdentity, CoreError> {
        let data: UserData = self.execute(USER_QUERY, UserVariables { login }).await?;

        data.user.ok_or_else(|| CoreError::GraphQl {
            message: format!("user '{}' not found", login),
        })
    }

    /// `totalCount` of the user's repositories matching `affiliations`.
    ///
    /// An empty filter falls back to `[OWNER]`.
    pub async fn repository_count(
        &self,
        login: &str,
        affiliations: &[RepositoryAffiliation],
    ) -> Result<u64, CoreError> {
        let owner_affiliation = if affiliations.is_empty() {
            vec![RepositoryAffiliation::Owner.as_str()]
        } else {
            affiliations.iter().map(|a| a.as_str()).collect()
        };

        let data: RepositoryCountData = self
            .execute(
                REPOSITORY_COUNT_QUERY,
                RepositoryCountVariables {
                    owner_affiliation,
                    login,
                    cursor: None,
                },
            )
            .await?;

        data.user
            .map(|owner| owner.repositories.total_count)
            .ok_or_else(|| CoreError::GraphQl {
                message: format!("user '{}' not found", login),
            })
    }

    /// POST one query and unwrap its `data`
    async fn execute<V, T>(&self, query: &str, variables: V) -> Result<T, CoreError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        debug!(endpoint = %self.endpoint, "Sending GraphQL request");

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("bearer {}", self.token))
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(|e| transport_error(&self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::HttpStatus {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(&self.endpoint, e))?;

        parse_response(&body)
    }
}

/// Decode a GraphQL envelope. An `errors` array wins over any partial `data`.
pub(crate) fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T, CoreError> {
    let envelope: GraphQlResponse<T> =
        serde_json::from_str(body).map_err(|e| CoreError::GraphQl {
            message: format!("unexpected response body: {}", e),
        })?;

    if !envelope.errors.is_empty() {
        let message = envelope
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(CoreError::GraphQl { message });
    }

    envelope.data.ok_or_else(|| CoreError::GraphQl {
        message: "response contained no data".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identity() {
        let data: UserData = parse_response(
            r#"{"data":{"user":{"id":"U_kgDOABCDEF","createdAt":"2021-07-12T08:30:00Z"}}}"#,
        )
        .unwrap();

        let user = data.user.unwrap();
        assert_eq!(user.id, "U_kgDOABCDEF");
        assert_eq!(user.created_at.date_naive().to_string(), "2021-07-12");
    }

    #[test]
    fn test_errors_payload_is_error() {
        let result: Result<UserData, _> = parse_response(
            r#"{"data":null,"errors":[{"message":"Bad credentials"},{"message":"again"}]}"#,
        );

        match result {
            Err(CoreError::GraphQl { message }) => assert_eq!(message, "Bad credentials; again"),
            other => panic!("expected GraphQl error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_data_is_error() {
        let result: Result<RepositoryCountData, _> = parse_response("{}");
        assert!(matches!(result, Err(CoreError::GraphQl { .. })));
    }

    #[test]
    fn test_non_json_body_is_error() {
        let result: Result<UserData, _> = parse_response("<html>rate limited</html>");
        assert!(matches!(result, Err(CoreError::GraphQl { .. })));
    }

    #[test]
    fn test_default_endpoint() {
        let client = GithubClient::with_client(Client::new(), "token");
        assert_eq!(client.endpoint(), DEFAULT_GRAPHQL_ENDPOINT);
        let client = client.with_endpoint("http://127.0.0.1:9/graphql");
        assert_eq!(client.endpoint(), "http://127.0.0.1:9/graphql");
    }
}
