//! Provider implementation for the Ecoleta collection point backend.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use ecoleta_core::{
    model::{CategoryItem, SubmissionRecord},
    ports::{CatalogPort, CollectPointPort, PortError},
};

/// Path of the category catalog, relative to the backend URL.
pub const CATEGORIES_PATH: &str = "itemscollect";
/// Path receiving new collection points, relative to the backend URL.
pub const COLLECT_POINTS_PATH: &str = "collectPoints";

/// Category catalog served by the backend.
pub struct BackendCatalogPort {
    client: Client,
    base_url: String,
}

impl BackendCatalogPort {
    /// Create a new catalog port bound to the given HTTP client and backend URL.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }
}

#[async_trait]
impl CatalogPort for BackendCatalogPort {
    async fn categories(&self) -> Result<Vec<CategoryItem>, PortError> {
        let url = format!("{}/{CATEGORIES_PATH}", self.base_url);
        debug!(%url, "GET category catalog");
        fetch_json(self.client.get(url)).await
    }
}

/// Registration endpoint of the backend.
pub struct BackendCollectPointPort {
    client: Client,
    base_url: String,
}

impl BackendCollectPointPort {
    /// Create a new registration port bound to the given HTTP client and backend URL.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }
}

#[async_trait]
impl CollectPointPort for BackendCollectPointPort {
    async fn create(&self, record: &SubmissionRecord) -> Result<(), PortError> {
        let url = format!("{}/{COLLECT_POINTS_PATH}", self.base_url);
        debug!(%url, "POST collection point");
        // The response body carries nothing the form needs.
        self.client
            .post(url)
            .json(record)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_owned()
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}
