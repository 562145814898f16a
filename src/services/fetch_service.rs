//! Fetching entity collections from the index API.
//!
//! The [`CollectionFetcher`] trait is the seam between collection views and
//! the network. [`HttpFetcher`] is the production implementation:
//! - `GET` on the bound endpoint, `q` only for non-empty queries
//! - caching disabled on every request
//! - non-2xx statuses and undecodable bodies are errors

use std::time::Duration;

use reqwest::header::{ACCEPT, CACHE_CONTROL, PRAGMA};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{Entity, EntityId, EntityKind, Query};

/// Errors from a single fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, TLS or timeout failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("server returned {status}")]
    Status { status: StatusCode },
    /// The body was not a JSON entity array.
    #[error("invalid response body: {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
    /// The endpoint could not be built.
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport(err) => err.status().map(|s| s.as_u16()),
            FetchError::Status { status } | FetchError::Decode { status, .. } => {
                Some(status.as_u16())
            }
            FetchError::InvalidUrl(_) => None,
        }
    }
}

/// How a collection view treats overlapping responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOrdering {
    /// Apply responses as they arrive; the last arrival wins, even if stale.
    #[default]
    ArrivalOrder,
    /// Drop responses older than the newest one already applied.
    LatestRequest,
}

/// Source of entity collections.
#[async_trait::async_trait]
pub trait CollectionFetcher: Send + Sync {
    /// Fetches the collection at `endpoint` filtered by `query`.
    async fn fetch(&self, endpoint: &Url, query: &Query) -> Result<Vec<Entity>, FetchError>;
}

/// Fetcher backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with an optional per-request timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("interfaces-index/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Builds the collection request without sending it.
    pub fn build_request(
        &self,
        endpoint: &Url,
        query: &Query,
    ) -> Result<reqwest::Request, FetchError> {
        let mut request = self
            .client
            .get(endpoint.clone())
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");
        if let Some(q) = query.as_param() {
            request = request.query(&[("q", q)]);
        }
        Ok(request.build()?)
    }

    /// Fetches one entity from its API resource.
    pub async fn fetch_entity(
        &self,
        base: &Url,
        kind: EntityKind,
        id: &EntityId,
    ) -> Result<Entity, FetchError> {
        let url = base.join(&kind.resource_path(id))?;
        let request = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .build()?;
        let mut entity: Entity = self.execute(request).await?;
        entity.kind.get_or_insert(kind);
        Ok(entity)
    }

    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::Request,
    ) -> Result<T, FetchError> {
        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { status, source })
    }
}

#[async_trait::async_trait]
impl CollectionFetcher for HttpFetcher {
    async fn fetch(&self, endpoint: &Url, query: &Query) -> Result<Vec<Entity>, FetchError> {
        let request = self.build_request(endpoint, query)?;
        tracing::debug!(url = %request.url(), "fetching collection");
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Url {
        Url::parse("http://localhost:8888/api/v1/interfaces").unwrap()
    }

    #[test]
    fn empty_query_omits_param() {
        let fetcher = HttpFetcher::new(None).unwrap();
        let request = fetcher.build_request(&endpoint(), &Query::empty()).unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8888/api/v1/interfaces");
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn non_empty_query_sent_as_q() {
        let fetcher = HttpFetcher::new(None).unwrap();
        let request = fetcher
            .build_request(&endpoint(), &Query::normalize("  netw "))
            .unwrap();
        let pairs: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("q".to_string(), "netw".to_string())]);
    }

    #[test]
    fn query_is_url_encoded() {
        let fetcher = HttpFetcher::new(None).unwrap();
        let request = fetcher
            .build_request(&endpoint(), &Query::normalize("a b&c"))
            .unwrap();
        let q = request
            .url()
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned());
        assert_eq!(q.as_deref(), Some("a b&c"));
    }

    #[test]
    fn requests_bypass_cache() {
        let fetcher = HttpFetcher::new(None).unwrap();
        let request = fetcher.build_request(&endpoint(), &Query::empty()).unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.headers()[CACHE_CONTROL], "no-cache");
        assert_eq!(request.headers()[PRAGMA], "no-cache");
        assert_eq!(request.headers()[ACCEPT], "application/json");
    }

    #[test]
    fn error_status() {
        let err = FetchError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "server returned 500 Internal Server Error");

        let source = serde_json::from_str::<Vec<Entity>>("{").unwrap_err();
        let err = FetchError::Decode {
            status: StatusCode::OK,
            source,
        };
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn ordering_serialization() {
        let json = serde_json::to_string(&FetchOrdering::LatestRequest).unwrap();
        assert_eq!(json, "\"latest_request\"");
        assert_eq!(FetchOrdering::default(), FetchOrdering::ArrivalOrder);
    }
}
