use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::models::{Dog, FilterCriteria, MatchResponse, SearchResponse};

/// Errors that can occur when talking to the catalog service
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog returned error: {0}")]
    Api(String),

    #[error("Catalog session expired, please sign in again")]
    AuthExpired,

    #[error("No favorites selected to match from")]
    NoFavorites,

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Operations the engine needs from the catalog service.
///
/// `CatalogClient` is the production implementation; tests swap in scripted
/// fakes to drive the orchestrator deterministically.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// List every breed the catalog knows about.
    async fn list_breeds(&self) -> Result<Vec<String>, CatalogError>;

    /// Phase one of a page fetch: IDs for one page plus the overall total.
    async fn search_ids(&self, criteria: &FilterCriteria)
        -> Result<SearchResponse, CatalogError>;

    /// Phase two of a page fetch: resolve IDs into full records.
    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<Dog>, CatalogError>;

    /// Ask the catalog to pick one match from the given candidates.
    async fn request_match(&self, ids: &[String]) -> Result<MatchResponse, CatalogError>;
}

/// HTTP client for the dog catalog service
///
/// Handles all communication with the catalog including:
/// - Listing available breeds
/// - Two-phase page fetches (search for IDs, then resolve details)
/// - Requesting a match from a set of favorites
pub struct CatalogClient {
    base_url: String,
    session_cookie: String,
    client: Client,
}

impl CatalogClient {
    /// Create a new catalog client
    ///
    /// `session_cookie` is sent verbatim as the `Cookie` header on every
    /// request when non-empty. `timeout` bounds each request; `None` leaves
    /// requests unbounded.
    pub fn new(base_url: String, session_cookie: String, timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().expect("Failed to create HTTP client");

        Self {
            base_url,
            session_cookie,
            client,
        }
    }

    fn with_session(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.session_cookie.is_empty() {
            request
        } else {
            request.header(reqwest::header::COOKIE, &self.session_cookie)
        }
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn list_breeds(&self) -> Result<Vec<String>, CatalogError> {
        let url = format!("{}/breeds", self.base_url.trim_end_matches('/'));

        tracing::debug!("Fetching breed list from: {}", url);

        let response = self.with_session(self.client.get(&url)).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::AuthExpired);
        }
        if !status.is_success() {
            return Err(CatalogError::Api(format!(
                "Failed to fetch breeds: {}",
                status
            )));
        }

        Ok(response.json().await?)
    }

    async fn search_ids(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<SearchResponse, CatalogError> {
        let query = criteria
            .query_params()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!("{}/search?{}", self.base_url.trim_end_matches('/'), query);

        tracing::debug!("Searching catalog: {}", url);

        let response = self.with_session(self.client.get(&url)).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::AuthExpired);
        }
        if !status.is_success() {
            return Err(CatalogError::Api(format!(
                "Failed to search: {}",
                status
            )));
        }

        Ok(response.json().await?)
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<Dog>, CatalogError> {
        let url = format!("{}/details", self.base_url.trim_end_matches('/'));

        tracing::debug!("Fetching details for {} dogs", ids.len());

        let response = self
            .with_session(self.client.post(&url).json(&ids))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::AuthExpired);
        }
        if !status.is_success() {
            return Err(CatalogError::Api(format!(
                "Failed to fetch details: {}",
                status
            )));
        }

        Ok(response.json().await?)
    }

    async fn request_match(&self, ids: &[String]) -> Result<MatchResponse, CatalogError> {
        if ids.is_empty() {
            return Err(CatalogError::NoFavorites);
        }

        let url = format!("{}/match", self.base_url.trim_end_matches('/'));

        tracing::debug!("Requesting a match from {} candidates", ids.len());

        let response = self
            .with_session(self.client.post(&url).json(&ids))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::AuthExpired);
        }
        if !status.is_success() {
            return Err(CatalogError::Api(format!(
                "Failed to request match: {}",
                status
            )));
        }

        Ok(response.json().await?)
    }
}
