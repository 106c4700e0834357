//! Catalog client for the product search endpoint.

use std::fmt::Debug;
use std::str::FromStr;
use std::time::Duration;

use enum_dispatch::enum_dispatch;
use reqwest::header::{self, HeaderMap};
use tracing::{debug, instrument};
use url::Url;

use crate::config::CatalogClientConfig;
use crate::error::{CatalogClientError, SearchError};
use crate::mock::MockClient;
use crate::types::{Product, ProductFilter};

/// Path of the product search endpoint, relative to the catalog base URL.
const PRODUCTS_ENDPOINT: &str = "api/v1/products.json";

// The remote side gives no guarantee it ever answers, so requests are
// bounded client-side.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Either a client for the actual catalog service,
/// or a mock client for testing.
#[derive(Debug)]
#[enum_dispatch(ClientTrait)]
pub enum Client {
    Catalog(CatalogClient),
    Mock(MockClient),
}

/// The catalog search interface.
///
/// This trait enables alternate implementations:
/// - **HTTP** (production): one GET against the search endpoint via
///   [`CatalogClient`]
/// - **Mock** (tests): canned responses without HTTP via [`MockClient`]
#[enum_dispatch]
#[allow(async_fn_in_trait)]
pub trait ClientTrait {
    /// Fetch the products matching `filter`.
    ///
    /// An all-empty filter is valid and returns the unfiltered catalog.
    async fn search_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, SearchError>;
}

// ---------------------------------------------------------------------------
// ClientTrait implementation for CatalogClient
// ---------------------------------------------------------------------------

/// A client for the product catalog service.
///
/// Wraps a [`reqwest::Client`] configured with timeouts and the headers from
/// [`CatalogClientConfig`].
pub struct CatalogClient {
    client: reqwest::Client,
    config: CatalogClientConfig,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("catalog_url", &self.config.catalog_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogClientError> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    /// Get the configured catalog URL.
    pub fn catalog_url(&self) -> &str {
        &self.config.catalog_url
    }

    /// Build the URL for a search request, appending one query pair per
    /// non-empty filter field.
    ///
    /// An all-empty filter produces no query string at all, which the
    /// service answers with the full, unfiltered catalog.
    fn products_url(&self, filter: &ProductFilter) -> Result<Url, CatalogClientError> {
        let endpoint = format!(
            "{base}/{PRODUCTS_ENDPOINT}",
            base = self.config.catalog_url.trim_end_matches('/')
        );
        let mut url = Url::parse(&endpoint).map_err(CatalogClientError::InvalidUrl)?;

        let params = filter.to_query_params();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(url)
    }
}

impl ClientTrait for CatalogClient {
    #[instrument(skip_all, fields(progress = "Searching the product catalog"))]
    async fn search_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, SearchError> {
        let url = self.products_url(filter)?;
        debug!(%url, "sending product search request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(SearchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "catalog returned an error response");
            return Err(SearchError::ErrorResponse(status));
        }

        let products: Vec<Product> = response.json().await.map_err(SearchError::InvalidResponse)?;
        debug!(n_products = products.len(), "received products");

        Ok(products)
    }
}

// ---------------------------------------------------------------------------
// HTTP client builder
// ---------------------------------------------------------------------------

/// Build the HTTP client used for catalog requests.
fn build_http_client(config: &CatalogClientConfig) -> Result<reqwest::Client, CatalogClientError> {
    let mut headers = HeaderMap::new();

    for (key, value) in &config.extra_headers {
        headers.insert(
            header::HeaderName::from_str(key).map_err(|source| {
                CatalogClientError::InvalidHeaderName {
                    name: key.clone(),
                    source,
                }
            })?,
            header::HeaderValue::from_str(value).map_err(|source| {
                CatalogClientError::InvalidHeaderValue {
                    name: key.clone(),
                    source,
                }
            })?,
        );
    }

    debug!(
        catalog_url = %config.catalog_url,
        extra_headers = config.extra_headers.len(),
        "building catalog HTTP client"
    );

    let client_builder = reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT);

    let client_builder = if let Some(ref user_agent) = config.user_agent {
        client_builder.user_agent(user_agent)
    } else {
        client_builder
    };

    client_builder.build().map_err(CatalogClientError::Build)
}

#[cfg(test)]
pub mod tests {
    use std::collections::BTreeMap;

    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::types::FilterField;

    fn client_config(url: &str) -> CatalogClientConfig {
        CatalogClientConfig {
            catalog_url: url.to_string(),
            extra_headers: Default::default(),
            user_agent: None,
        }
    }

    fn lip_gloss() -> Product {
        Product {
            id: 1,
            name: "Lip Gloss".to_string(),
            brand: "maybelline".to_string(),
            price: "5.00".to_string(),
            product_type: "lipstick".to_string(),
            rating: None,
            image_link: None,
            tag_list: None,
        }
    }

    fn lip_gloss_json() -> serde_json::Value {
        json!([{
            "id": 1,
            "name": "Lip Gloss",
            "brand": "maybelline",
            "price": "5.00",
            "product_type": "lipstick",
        }])
    }

    #[test]
    fn empty_filter_produces_no_query_string() {
        let client = CatalogClient::new(client_config("https://catalog.invalid")).unwrap();
        let url = client.products_url(&ProductFilter::default()).unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(url.as_str(), "https://catalog.invalid/api/v1/products.json");
    }

    #[test]
    fn base_url_trailing_slash_is_tolerated() {
        let client = CatalogClient::new(client_config("https://catalog.invalid/")).unwrap();
        let url = client.products_url(&ProductFilter::default()).unwrap();
        assert_eq!(url.as_str(), "https://catalog.invalid/api/v1/products.json");
    }

    #[tokio::test]
    async fn brand_filter_sent_as_query_parameter() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/products.json")
                .query_param("brand", "maybelline");
            then.status(200).json_body(lip_gloss_json());
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let mut filter = ProductFilter::default();
        filter.set(FilterField::Brand, "maybelline");

        let products = client.search_products(&filter).await.unwrap();
        assert_eq!(products, vec![lip_gloss()]);
        mock.assert();
    }

    #[tokio::test]
    async fn empty_filter_returns_unfiltered_catalog() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v1/products.json");
            then.status(200).json_body(json!([
                {
                    "id": 1,
                    "name": "Lip Gloss",
                    "brand": "maybelline",
                    "price": "5.00",
                    "product_type": "lipstick",
                },
                {
                    "id": 2,
                    "name": "Eyeliner",
                    "brand": "nyx",
                    "price": "8.50",
                    "product_type": "eyeliner",
                    "rating": 4.5,
                    "tag_list": ["vegan"],
                },
            ]));
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let products = client
            .search_products(&ProductFilter::default())
            .await
            .unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].rating, Some(4.5));
        assert_eq!(products[1].tag_list, Some(vec!["vegan".to_string()]));
        mock.assert();
    }

    #[tokio::test]
    async fn extra_headers_set_on_requests() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.header("x-catalog-test", "test-value");
            then.status(200).json_body(json!([]));
        });

        let mut extra_headers = BTreeMap::new();
        extra_headers.insert("x-catalog-test".to_string(), "test-value".to_string());
        let config = CatalogClientConfig {
            extra_headers,
            ..client_config(&server.base_url())
        };

        let client = CatalogClient::new(config).unwrap();
        let _ = client.search_products(&ProductFilter::default()).await;
        mock.assert();
    }

    #[tokio::test]
    async fn user_agent_set_on_requests() {
        let expected_agent = "my-custom-user-agent";

        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.header("user-agent", expected_agent);
            then.status(200).json_body(json!([]));
        });

        let config = CatalogClientConfig {
            user_agent: Some(expected_agent.to_owned()),
            ..client_config(&server.base_url())
        };

        let client = CatalogClient::new(config).unwrap();
        let _ = client.search_products(&ProductFilter::default()).await;
        mock.assert();
    }

    #[tokio::test]
    async fn server_error_surfaces_as_error_response() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|_when, then| {
            then.status(500).body("internal server error");
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let result = client.search_products(&ProductFilter::default()).await;
        assert!(
            matches!(
                result,
                Err(SearchError::ErrorResponse(status)) if status.as_u16() == 500
            ),
            "expected ErrorResponse, found: {result:?}"
        );
        mock.assert();
    }

    #[tokio::test]
    async fn malformed_payload_surfaces_as_invalid_response() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|_when, then| {
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"unexpected": "shape"}));
        });

        let client = CatalogClient::new(client_config(&server.base_url())).unwrap();
        let result = client.search_products(&ProductFilter::default()).await;
        assert!(
            matches!(result, Err(SearchError::InvalidResponse(_))),
            "expected InvalidResponse, found: {result:?}"
        );
        mock.assert();
    }

    #[tokio::test]
    async fn transport_failure_surfaces_as_request_error() {
        // Nothing listens on this port.
        let client = CatalogClient::new(client_config("http://127.0.0.1:9")).unwrap();
        let result = client.search_products(&ProductFilter::default()).await;
        assert!(
            matches!(result, Err(SearchError::Request(_))),
            "expected Request error, found: {result:?}"
        );
    }
}
