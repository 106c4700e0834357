//! Configuration types for catalog client construction.

use std::collections::BTreeMap;

/// Configuration for catalog client construction.
#[derive(Debug, Clone, Default)]
pub struct CatalogClientConfig {
    /// Base URL for the catalog API.
    // Using a URL here adds an extra trailing slash,
    // so just use a String.
    pub catalog_url: String,
    /// Additional headers to include in requests.
    pub extra_headers: BTreeMap<String, String>,
    /// User agent reported to the catalog.
    pub user_agent: Option<String>,
}
