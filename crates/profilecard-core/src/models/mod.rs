//! Data models for profilecard

pub mod card;
pub mod github;
pub mod profile;

pub use card::{CardLabel, CardStats};
pub use github::{RepositoryAffiliation, UserIdentity};
pub use profile::InfoEntry;
