//! REST API client for the character catalog.
//!
//! Covers the three read endpoints the app uses: the paginated character
//! list, a character by id, and a location by id.

use citadel_core::models::{CharacterDetail, CharacterPage, LocationDetail};
use citadel_core::types::{EntityId, PageNumber};
use serde::de::DeserializeOwned;

/// Public catalog endpoint used when no base URL is configured.
pub const DEFAULT_API_URL: &str = "https://rickandmortyapi.com/api";

/// HTTP client for one catalog API deployment.
#[derive(Clone)]
pub struct CatalogApi {
    client: reqwest::Client,
    api_url: String,
}

/// Server-side list filters. Each is sent only when present and non-blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFilters {
    pub status: Option<String>,
    pub gender: Option<String>,
    pub species: Option<String>,
}

/// Errors from the catalog REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (offline, DNS, TLS, reset).
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not the JSON shape we expected.
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API answered 404 for the requested record.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Any other non-2xx status.
    #[error("Catalog API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ApiError {
    /// Whether the failure happened below HTTP, i.e. a cached copy is worth trying.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

/// Build the query string for `GET /character`.
///
/// `page` is always sent; `name` and each filter only when non-blank.
pub fn page_query(
    page: PageNumber,
    filters: Option<&PageFilters>,
    name: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("page", page.to_string())];

    let mut push = |key: &'static str, value: Option<&str>| {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            pairs.push((key, value.to_string()));
        }
    };

    push("name", name);
    if let Some(filters) = filters {
        push("status", filters.status.as_deref());
        push("gender", filters.gender.as_deref());
        push("species", filters.species.as_deref());
    }

    pairs
}

impl CatalogApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base URL, e.g. `https://rickandmortyapi.com/api`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch one page of the character list.
    ///
    /// Sends `GET /character?page=N[&name=..][&status=..][&gender=..][&species=..]`.
    pub async fn fetch_character_page(
        &self,
        page: PageNumber,
        filters: Option<&PageFilters>,
        name: Option<&str>,
    ) -> Result<CharacterPage, ApiError> {
        tracing::debug!(page, "Fetching character page");

        let response = self
            .client
            .get(format!("{}/character", self.api_url))
            .query(&page_query(page, filters, name))
            .send()
            .await?;

        Self::parse_response(response, "character page", i64::from(page)).await
    }

    /// Fetch a single character. Sends `GET /character/{id}`.
    pub async fn fetch_character(&self, id: EntityId) -> Result<CharacterDetail, ApiError> {
        tracing::debug!(id, "Fetching character");

        let response = self
            .client
            .get(format!("{}/character/{}", self.api_url, id))
            .send()
            .await?;

        Self::parse_response(response, "character", id).await
    }

    /// Fetch a single location. Sends `GET /location/{id}`.
    pub async fn fetch_location(&self, id: EntityId) -> Result<LocationDetail, ApiError> {
        tracing::debug!(id, "Fetching location");

        let response = self
            .client
            .get(format!("{}/location/{}", self.api_url, id))
            .send()
            .await?;

        Self::parse_response(response, "location", id).await
    }

    // ---- private helpers ----

    /// Map a 404 to [`ApiError::NotFound`] and any other failure status to
    /// [`ApiError::Status`]. Returns the response unchanged on success.
    async fn ensure_success(
        response: reqwest::Response,
        entity: &'static str,
        id: i64,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound { entity, id });
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Read the body, then decode it, so a truncated transfer is reported
    /// as [`ApiError::Network`] and a schema mismatch as [`ApiError::Decode`].
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        entity: &'static str,
        id: i64,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response, entity, id).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
