//! Traits describing the remote capabilities the registration form depends on.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{CategoryItem, CityName, Coordinate, StateCode, SubmissionRecord};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to remote services.
pub enum PortError {
    /// Network layer failed or the server answered with a non-success status.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The current position could not be determined.
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),
    /// The service answered with a body we could not use.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Backend catalog of material categories.
pub trait CatalogPort: Send + Sync {
    /// Fetch every category a collection point may accept.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails.
    async fn categories(&self) -> Result<Vec<CategoryItem>, PortError>;
}

#[async_trait]
/// Backend endpoint that stores new collection points.
pub trait CollectPointPort: Send + Sync {
    /// Register a collection point.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the backend rejects it.
    async fn create(&self, record: &SubmissionRecord) -> Result<(), PortError>;
}

#[async_trait]
/// Public geography service listing states and their municipalities.
pub trait GeographyPort: Send + Sync {
    /// Fetch all state codes.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the service request fails.
    async fn states(&self) -> Result<Vec<StateCode>, PortError>;

    /// Fetch the municipalities of a state.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the service request fails.
    async fn municipalities(&self, uf: &StateCode) -> Result<Vec<CityName>, PortError>;
}

#[async_trait]
/// Source of the operator's current position.
pub trait LocationPort: Send + Sync {
    /// Resolve the current position.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::LocationUnavailable`] when no position can be determined.
    async fn current_position(&self) -> Result<Coordinate, PortError>;
}
