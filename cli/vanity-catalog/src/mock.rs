//! A catalog client that can be seeded with mock responses.
//!
//! Used to drive the fetch lifecycle in tests without HTTP. Responses are
//! consumed in FIFO order, one per search call, and can carry an artificial
//! delay so overlapping in-flight requests can be simulated under a paused
//! clock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::StatusCode;

use crate::client::ClientTrait;
use crate::error::SearchError;
use crate::types::{Product, ProductFilter};

// Arc allows you to push things into the client from outside the client if
// necessary, Mutex allows you to share across tasks.
type MockField<T> = Arc<Mutex<T>>;

/// A canned response, optionally delayed to simulate a slow catalog.
#[derive(Debug)]
struct MockResponse {
    delay: Option<Duration>,
    outcome: Result<Vec<Product>, StatusCode>,
}

/// A catalog client that can be seeded with mock responses.
#[derive(Debug, Default)]
pub struct MockClient {
    mock_responses: MockField<VecDeque<MockResponse>>,
    seen_filters: MockField<Vec<ProductFilter>>,
}

impl MockClient {
    /// Create a new mock client with an empty response queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a successful response into the list of mock responses.
    pub fn push_search_response(&self, products: Vec<Product>) {
        self.push_response(MockResponse {
            delay: None,
            outcome: Ok(products),
        });
    }

    /// Push a successful response that resolves after `delay`.
    pub fn push_delayed_search_response(&self, products: Vec<Product>, delay: Duration) {
        self.push_response(MockResponse {
            delay: Some(delay),
            outcome: Ok(products),
        });
    }

    /// Push an error response with the given status code.
    pub fn push_error_response(&self, status_code: u16) {
        self.push_response(MockResponse {
            delay: None,
            outcome: Err(StatusCode::from_u16(status_code).expect("invalid status code")),
        });
    }

    /// Push an error response that resolves after `delay`.
    pub fn push_delayed_error_response(&self, status_code: u16, delay: Duration) {
        self.push_response(MockResponse {
            delay: Some(delay),
            outcome: Err(StatusCode::from_u16(status_code).expect("invalid status code")),
        });
    }

    /// The filters received so far, in call order.
    pub fn seen_filters(&self) -> Vec<ProductFilter> {
        self.seen_filters
            .lock()
            .expect("couldn't acquire mock lock")
            .clone()
    }

    fn push_response(&self, response: MockResponse) {
        self.mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .push_back(response);
    }
}

impl ClientTrait for MockClient {
    async fn search_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, SearchError> {
        self.seen_filters
            .lock()
            .expect("couldn't acquire mock lock")
            .push(filter.clone());

        let response = self
            .mock_responses
            .lock()
            .expect("couldn't acquire mock lock")
            .pop_front()
            .expect("no mock response queued");

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }

        response.outcome.map_err(SearchError::ErrorResponse)
    }
}
