//! Bundle of port implementations wired into the service.

use std::sync::Arc;

use crate::ports::{CatalogPort, CollectPointPort, GeographyPort, LocationPort};

/// Collection of ports implementing every remote dependency of the form.
#[derive(Clone)]
pub struct ProviderSet {
    /// Category catalog.
    pub catalog_port: Arc<dyn CatalogPort>,
    /// Collection point registration.
    pub collect_point_port: Arc<dyn CollectPointPort>,
    /// States and municipalities.
    pub geography_port: Arc<dyn GeographyPort>,
    /// Current position.
    pub location_port: Arc<dyn LocationPort>,
}
