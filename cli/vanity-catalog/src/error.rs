//! Error handling for catalog operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors constructing a catalog client.
#[derive(Debug, Error)]
pub enum CatalogClientError {
    #[error("invalid catalog URL")]
    InvalidUrl(#[source] url::ParseError),
    #[error("invalid header name '{name}'")]
    InvalidHeaderName {
        name: String,
        #[source]
        source: reqwest::header::InvalidHeaderName,
    },
    #[error("invalid header value for '{name}'")]
    InvalidHeaderValue {
        name: String,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),
}

/// Errors performing a product search.
///
/// Transport failures, error statuses and malformed payloads are distinct
/// here so callers _can_ tell them apart; the session layer collapses all of
/// them into a single user-facing fetch error.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    CatalogClientError(#[from] CatalogClientError),
    /// DNS, connection or timeout failure before a response arrived.
    #[error("request failed")]
    Request(#[source] reqwest::Error),
    /// The catalog answered with a non-2xx status.
    #[error("catalog returned {0}")]
    ErrorResponse(StatusCode),
    /// The response body was not the expected JSON array of products.
    #[error("could not parse catalog response")]
    InvalidResponse(#[source] reqwest::Error),
}
