//! Stats tracker: ties the GraphQL client, badge scraper and commit cache together
//!
//! One tracker is created per run. Connecting resolves the account identity (fatal on
//! failure), scrapes the badge (non-fatal) and loads the commit cache. The tracker then
//! answers the individual queries and drives the full card refresh.

use crate::age::format_age;
use crate::cache::CommitCache;
use crate::config::{CardConfig, Credentials};
use crate::error::CoreError;
use crate::github::GithubClient;
use crate::http::build_client;
use crate::metrics::{render_summary, PerformanceLog, QueryCounter, GRAPH_REPOS_STARS, USER_GETTER};
use crate::models::{CardStats, RepositoryAffiliation, UserIdentity};
use crate::scraper::{badge_url, CardScraper};
use crate::svg::{format_thousands, patch_template_file, PatchValues, TemplateSlots};
use chrono::{Datelike, NaiveDate};
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of [`StatsTracker::refresh_card`]
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub age: String,
    pub repositories: u64,
    pub total_commits: u64,
    /// Whether the badge supplied a commit count for the current year
    pub badge_commits_recorded: bool,
    pub performance: PerformanceLog,
    pub queries: QueryCounter,
}

impl RefreshReport {
    /// Timing and API call summary
    pub fn summary(&self) -> String {
        render_summary(&self.performance, &self.queries)
    }
}

pub struct StatsTracker {
    credentials: Credentials,
    github: GithubClient,
    identity: UserIdentity,
    card_stats: Option<CardStats>,
    cache: CommitCache,
    counter: QueryCounter,
    affiliations: Vec<RepositoryAffiliation>,
    slots: TemplateSlots,
}

impl StatsTracker {
    /// Resolve identity, scrape the badge and load the cache
    pub async fn connect(credentials: Credentials, config: &CardConfig) -> Result<Self, CoreError> {
        let client = build_client()?;
        let github = GithubClient::with_client(client.clone(), credentials.token())
            .with_endpoint(config.graphql_endpoint.clone());

        let mut counter = QueryCounter::with_operations([USER_GETTER, GRAPH_REPOS_STARS]);
        counter.increment(USER_GETTER);
        let identity = github.user_info(&credentials.username).await?;
        debug!(user = %credentials.username, id = %identity.id, "Resolved GitHub identity");

        let url = badge_url(&config.badge_url, &credentials.username);
        let card_stats = CardScraper::with_client(client).scrape(&url).await;
        if card_stats.is_none() {
            warn!(user = %credentials.username, "No badge data available");
        }

        let cache = CommitCache::load(&config.cache_file);

        Ok(Self {
            credentials,
            github,
            identity,
            card_stats,
            cache,
            counter,
            affiliations: config.affiliations.clone(),
            slots: config.slots,
        })
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Badge values, `None` when scraping failed
    pub fn card_stats(&self) -> Option<&CardStats> {
        self.card_stats.as_ref()
    }

    pub fn cache(&self) -> &CommitCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut CommitCache {
        &mut self.cache
    }

    pub fn query_counter(&self) -> &QueryCounter {
        &self.counter
    }

    /// Account creation date, the default start of the age counter
    pub fn account_created(&self) -> NaiveDate {
        self.identity.created_at.date_naive()
    }

    /// Query the identity again
    pub async fn user_info(&mut self) -> Result<UserIdentity, CoreError> {
        self.counter.increment(USER_GETTER);
        let identity = self.github.user_info(&self.credentials.username).await?;
        self.identity = identity.clone();
        Ok(identity)
    }

    /// Repository `totalCount` for `affiliations` (first page only)
    pub async fn repository_count(
        &mut self,
        affiliations: &[RepositoryAffiliation],
    ) -> Result<u64, CoreError> {
        self.counter.increment(GRAPH_REPOS_STARS);
        self.github
            .repository_count(&self.credentials.username, affiliations)
            .await
    }

    /// Record the badge's commit count under `year`. Returns false when the badge had none.
    pub fn sync_badge_commits(&mut self, year: i32) -> bool {
        let Some(commits) = self.card_stats.as_ref().and_then(CardStats::commits) else {
            return false;
        };

        self.cache.update(&self.credentials.username, [(year, commits)]);
        debug!(year, commits, "Recorded badge commits");
        true
    }

    /// Age string from `birth` to `today`
    pub fn age_string(birth: NaiveDate, today: NaiveDate) -> Result<String, CoreError> {
        format_age(birth, today)
    }

    /// Write age, repository count and cached commit total into the template slots
    pub fn patch_template(
        &self,
        path: &Path,
        age: &str,
        repositories: u64,
    ) -> Result<(), CoreError> {
        let values = PatchValues {
            age: age.to_string(),
            repos: format_thousands(repositories),
            commits: format_thousands(self.cache.total_commits()),
        };
        patch_template_file(path, &self.slots, &values)
    }

    /// Full refresh: badge commits into the cache, age, repository count, template patch
    pub async fn refresh_card(
        &mut self,
        template: &Path,
        birth: NaiveDate,
        today: NaiveDate,
    ) -> Result<RefreshReport, CoreError> {
        let mut performance = PerformanceLog::new();

        let badge_commits_recorded = self.sync_badge_commits(today.year());

        let age = performance.track("age calculation", || Self::age_string(birth, today))?;

        let affiliations = self.affiliations.clone();
        let repositories = performance
            .track_async("my repositories", self.repository_count(&affiliations))
            .await?;

        self.patch_template(template, &age, repositories)?;

        let total_commits = self.cache.total_commits();
        info!(
            user = %self.credentials.username,
            repositories,
            total_commits,
            "Card refreshed"
        );

        Ok(RefreshReport {
            age,
            repositories,
            total_commits,
            badge_commits_recorded,
            performance,
            queries: self.counter.clone(),
        })
    }
}
