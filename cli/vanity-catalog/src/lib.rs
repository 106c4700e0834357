//! Client library for a remote product catalog.
//!
//! This crate provides:
//! - the filter model and its translation into query parameters
//! - an HTTP client for the catalog's product search endpoint
//! - the fetch lifecycle state machine (`Idle`/`Loading`/`Success`/`Error`)
//!   that drives searches and drops superseded responses
//! - a mock client for driving the lifecycle in tests without HTTP
//!
//! ## Usage
//!
//! ```ignore
//! use vanity_catalog::{CatalogClient, CatalogClientConfig, Client, SearchSession, SubmitMode};
//!
//! let config = CatalogClientConfig {
//!     catalog_url: "https://makeup-api.herokuapp.com".to_string(),
//!     extra_headers: BTreeMap::new(),
//!     user_agent: None,
//! };
//!
//! let client = Client::Catalog(CatalogClient::new(config)?);
//! let session = SearchSession::new(client, SubmitMode::Manual);
//! session.set_filter(FilterField::Brand, "maybelline");
//! session.submit().await?;
//! ```

mod client;
mod config;
mod error;
pub mod mock;
mod session;
mod types;

// Public exports
pub use client::{CatalogClient, Client, ClientTrait};
pub use config::CatalogClientConfig;
pub use error::{CatalogClientError, SearchError};
pub use mock::MockClient;
pub use session::{
    FETCH_ERROR_MESSAGE,
    FetchController,
    FetchState,
    RequestToken,
    SearchSession,
    SubmitMode,
};
pub use types::{FilterField, Product, ProductFilter};
