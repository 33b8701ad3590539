//! Glimpse GitHub Activity Layer
//!
//! Date-ranged, optionally token- and repo-filtered summary of a user's
//! public GitHub events. Consumed by the CLI's `activity` command; the
//! capture pipeline core does not depend on this crate.
//!
//! The network layer pages through the events API; filtering and
//! summarizing are pure functions so they can be tested without the
//! network.

#![warn(missing_docs)]

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// GitHub REST API base URL
pub const API_BASE: &str = "https://api.github.com";

/// Events fetched per page (the API maximum)
const PER_PAGE: u32 = 100;

/// Errors that can occur while fetching activity
#[derive(Error, Debug)]
pub enum GithubError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Unexpected payload from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Non-success HTTP status
    #[error("GitHub API error: HTTP {0}")]
    Api(u16),

    /// The requested date range is inverted
    #[error("Invalid date range: {since} is after {until}")]
    InvalidRange {
        /// Start of the requested range
        since: NaiveDate,
        /// End of the requested range
        until: NaiveDate,
    },
}

/// One public event as returned by the events API.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Event type, e.g. `PushEvent`
    #[serde(rename = "type")]
    pub kind: String,

    /// Repository the event happened in
    pub repo: EventRepo,

    /// When the event happened
    pub created_at: DateTime<Utc>,
}

/// Repository reference inside an [`Event`].
#[derive(Debug, Clone, Deserialize)]
pub struct EventRepo {
    /// Full name, `owner/name`
    pub name: String,
}

/// Summary of a user's activity over a date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySummary {
    /// The user the summary is for
    pub username: String,

    /// Inclusive start of the range
    pub since: NaiveDate,

    /// Inclusive end of the range
    pub until: NaiveDate,

    /// Total events after filtering
    pub total_events: usize,

    /// Event counts keyed by event type
    pub events_by_type: BTreeMap<String, usize>,

    /// Event counts keyed by repository full name
    pub events_by_repo: BTreeMap<String, usize>,
}

/// Client for the GitHub events API.
pub struct ActivityClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl ActivityClient {
    /// Create a client. When `token` is `None`, the `GITHUB_TOKEN`
    /// environment variable is used if set; otherwise requests go out
    /// unauthenticated (lower rate limit).
    pub fn new(token: Option<String>) -> Self {
        let token = token.or_else(|| std::env::var("GITHUB_TOKEN").ok());
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }

    /// Fetch and summarize a user's public activity in `[since, until]`,
    /// optionally restricted to the given repositories. A repo filter
    /// entry matches either the full `owner/name` or the bare name.
    pub async fn fetch_user_activity(
        &self,
        username: &str,
        since: NaiveDate,
        until: NaiveDate,
        repos: Option<&[String]>,
    ) -> Result<ActivitySummary, GithubError> {
        if since > until {
            return Err(GithubError::InvalidRange { since, until });
        }

        let mut events = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.fetch_page(username, page).await?;
            if batch.is_empty() {
                break;
            }

            // The API returns newest first; once a whole page predates
            // the range there is nothing further back worth fetching.
            let all_before_range = batch
                .iter()
                .all(|e| e.created_at.date_naive() < since);
            events.extend(batch);

            if all_before_range {
                break;
            }
            page += 1;
        }

        tracing::debug!(username, fetched = events.len(), "fetched activity events");

        let filtered = filter_events(events, since, until, repos);
        Ok(summarize(username, since, until, &filtered))
    }

    async fn fetch_page(&self, username: &str, page: u32) -> Result<Vec<Event>, GithubError> {
        let url = format!(
            "{}/users/{}/events/public?per_page={}&page={}",
            API_BASE, username, PER_PAGE, page
        );

        let mut request = self
            .client
            .get(&url)
            .header("User-Agent", "glimpse")
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GithubError::Communication(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GithubError::Api(response.status().as_u16()));
        }

        response
            .json::<Vec<Event>>()
            .await
            .map_err(|e| GithubError::InvalidResponse(e.to_string()))
    }
}

/// Keep only events inside `[since, until]` (inclusive) and, when a repo
/// filter is given, in one of the listed repositories.
pub fn filter_events(
    events: Vec<Event>,
    since: NaiveDate,
    until: NaiveDate,
    repos: Option<&[String]>,
) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| {
            let date = event.created_at.date_naive();
            date >= since && date <= until
        })
        .filter(|event| match repos {
            None => true,
            Some(filter) => filter.iter().any(|wanted| {
                event.repo.name == *wanted
                    || event
                        .repo
                        .name
                        .rsplit('/')
                        .next()
                        .is_some_and(|name| name == wanted)
            }),
        })
        .collect()
}

/// Build the per-type and per-repo counts for a set of filtered events.
pub fn summarize(
    username: &str,
    since: NaiveDate,
    until: NaiveDate,
    events: &[Event],
) -> ActivitySummary {
    let mut events_by_type = BTreeMap::new();
    let mut events_by_repo = BTreeMap::new();

    for event in events {
        *events_by_type.entry(event.kind.clone()).or_insert(0) += 1;
        *events_by_repo.entry(event.repo.name.clone()).or_insert(0) += 1;
    }

    ActivitySummary {
        username: username.to_string(),
        since,
        until,
        total_events: events.len(),
        events_by_type,
        events_by_repo,
    }
}
