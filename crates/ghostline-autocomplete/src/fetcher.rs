//! Suggestion fetching boundary
//!
//! A [`SuggestionFetcher`] turns a token into an ordered list of candidate
//! strings. The engine only ever shows the first candidate that is a
//! case-insensitive extension of the token, and any fetch failure collapses to
//! "no suggestion" inside [`resolve_suggestion`].
//!
//! Two sources are provided:
//!
//! - [`HttpSuggestionFetcher`]: `GET {base}/autocomplete?query=<token>` with a
//!   bearer credential, answering `{"suggestions": [...]}`
//! - [`StaticSuggestionSource`]: an in-process vocabulary

use crate::config::EndpointConfig;
use crate::error::{AutocompleteError, AutocompleteResult};
use crate::types::starts_with_ignore_case;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of completion candidates for a token
#[async_trait]
pub trait SuggestionFetcher: Send + Sync {
    /// Candidates for `token`, best first
    async fn fetch(&self, token: &str) -> AutocompleteResult<Vec<String>>;
}

/// Supplies the credential attached to authenticated fetches
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// The current credential, or `None` when the user is signed out
    async fn credential(&self) -> Option<String>;
}

/// A fixed credential
#[derive(Debug, Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn credential(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// First candidate that case-insensitively starts with `token`
pub fn best_candidate<I>(token: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    candidates
        .into_iter()
        .find(|candidate| starts_with_ignore_case(candidate, token))
}

/// Fetch and select the suggestion for `token`, swallowing failures
pub async fn resolve_suggestion(fetcher: &dyn SuggestionFetcher, token: &str) -> Option<String> {
    match fetcher.fetch(token).await {
        Ok(candidates) => {
            let count = candidates.len();
            let best = best_candidate(token, candidates);
            debug!(
                "Fetched {} candidates for '{}', best: {:?}",
                count, token, best
            );
            best
        }
        Err(e) => {
            warn!("Suggestion fetch for '{}' failed: {}", token, e);
            None
        }
    }
}

/// Wire format of the suggestion endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<String>,
}

/// Fetches suggestions from the HTTP autocomplete endpoint
#[derive(Clone)]
pub struct HttpSuggestionFetcher {
    client: Client,
    endpoint: String,
    credentials: Option<Arc<dyn CredentialProvider>>,
}

impl HttpSuggestionFetcher {
    /// Create a fetcher for the endpoint described by `config`
    ///
    /// When `credentials` is set, every request carries
    /// `Authorization: Bearer <credential>` and a missing credential fails the
    /// fetch before any request is sent.
    pub fn new(
        config: &EndpointConfig,
        credentials: Option<Arc<dyn CredentialProvider>>,
    ) -> AutocompleteResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/autocomplete", config.base_url.trim_end_matches('/')),
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SuggestionFetcher for HttpSuggestionFetcher {
    async fn fetch(&self, token: &str) -> AutocompleteResult<Vec<String>> {
        let mut request = self.client.get(&self.endpoint).query(&[("query", token)]);

        if let Some(credentials) = &self.credentials {
            let credential = credentials
                .credential()
                .await
                .ok_or(AutocompleteError::MissingCredential)?;
            request = request.bearer_auth(credential);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AutocompleteError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body: SuggestionResponse = response.json().await?;
        Ok(body.suggestions)
    }
}

/// Default number of candidates returned by [`StaticSuggestionSource`]
pub const DEFAULT_STATIC_LIMIT: usize = 5;

/// Serves candidates from a fixed vocabulary
///
/// Entries that start with the query (ignoring case) are returned shortest
/// first, at most `limit` of them. An empty query yields nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSuggestionSource {
    entries: Vec<String>,
    limit: usize,
}

impl StaticSuggestionSource {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
            limit: DEFAULT_STATIC_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Synchronous lookup behind [`SuggestionFetcher::fetch`]
    pub fn lookup(&self, query: &str) -> Vec<String> {
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| starts_with_ignore_case(entry, query))
            .cloned()
            .collect();
        matches.sort_by_key(|entry| entry.chars().count());
        matches.truncate(self.limit);
        matches
    }
}

#[async_trait]
impl SuggestionFetcher for StaticSuggestionSource {
    async fn fetch(&self, token: &str) -> AutocompleteResult<Vec<String>> {
        Ok(self.lookup(token))
    }
}
