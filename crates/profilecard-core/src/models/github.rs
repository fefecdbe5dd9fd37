//! GitHub account models returned by the GraphQL API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account identity resolved at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Opaque GraphQL node id
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Ownership filter for repository counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepositoryAffiliation {
    Owner,
    Collaborator,
    OrganizationMember,
}

impl RepositoryAffiliation {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryAffiliation::Owner => "OWNER",
            RepositoryAffiliation::Collaborator => "COLLABORATOR",
            RepositoryAffiliation::OrganizationMember => "ORGANIZATION_MEMBER",
        }
    }
}

impl fmt::Display for RepositoryAffiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepositoryAffiliation {
    type Err = String;

    /// Accepts the GraphQL spelling or its lowercase / kebab-case variants
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "OWNER" => Ok(RepositoryAffiliation::Owner),
            "COLLABORATOR" => Ok(RepositoryAffiliation::Collaborator),
            "ORGANIZATION_MEMBER" => Ok(RepositoryAffiliation::OrganizationMember),
            other => Err(format!(
                "unknown affiliation '{}' (expected owner, collaborator or organization_member)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affiliation_parse_variants() {
        assert_eq!(
            "owner".parse::<RepositoryAffiliation>().unwrap(),
            RepositoryAffiliation::Owner
        );
        assert_eq!(
            "organization-member".parse::<RepositoryAffiliation>().unwrap(),
            RepositoryAffiliation::OrganizationMember
        );
        assert!("maintainer".parse::<RepositoryAffiliation>().is_err());
    }

    #[test]
    fn test_identity_deserializes_graphql_shape() {
        let identity: UserIdentity =
            serde_json::from_str(r#"{"id":"MDQ6VXNlcjE=","createdAt":"2019-03-04T10:00:00Z"}"#)
                .unwrap();
        assert_eq!(identity.id, "MDQ6VXNlcjE=");
        assert_eq!(identity.created_at.to_rfc3339(), "2019-03-04T10:00:00+00:00");
    }
}
