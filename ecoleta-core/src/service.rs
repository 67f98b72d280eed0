//! High-level service facade combining all providers.

use tracing::{debug, info};

use crate::model::{CategoryItem, CityName, Coordinate, StateCode, SubmissionRecord};
use crate::plugin::ProviderSet;
use crate::ports::PortError;

/// Public entry point for loading reference data and registering collection points.
pub struct RegistrationService {
    providers: ProviderSet,
}

impl RegistrationService {
    /// Create a new service bound to the provided ports.
    #[must_use]
    pub fn new(providers: ProviderSet) -> Self {
        Self { providers }
    }

    /// Load the category catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the backend call fails.
    pub async fn categories(&self) -> Result<Vec<CategoryItem>, PortError> {
        debug!("loading category catalog");
        self.providers.catalog_port.categories().await
    }

    /// Load all state codes.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the geography service call fails.
    pub async fn states(&self) -> Result<Vec<StateCode>, PortError> {
        debug!("loading states");
        self.providers.geography_port.states().await
    }

    /// Load municipalities for a state.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the geography service call fails.
    pub async fn cities(&self, uf: &StateCode) -> Result<Vec<CityName>, PortError> {
        debug!(%uf, "loading municipalities");
        self.providers.geography_port.municipalities(uf).await
    }

    /// Resolve the operator's current position.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if no position can be determined.
    pub async fn locate(&self) -> Result<Coordinate, PortError> {
        self.providers.location_port.current_position().await
    }

    /// Register a collection point.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the backend call fails or rejects the record.
    pub async fn register(&self, record: &SubmissionRecord) -> Result<(), PortError> {
        info!(name = %record.name, items = record.items.len(), "registering collection point");
        self.providers.collect_point_port.create(record).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::model::{CategoryId, Selection};
    use crate::ports::{CatalogPort, CollectPointPort, GeographyPort, LocationPort};

    struct FakeBackend {
        posted: Mutex<Vec<SubmissionRecord>>,
    }

    #[async_trait]
    impl CatalogPort for FakeBackend {
        async fn categories(&self) -> Result<Vec<CategoryItem>, PortError> {
            Ok(vec![CategoryItem {
                id: CategoryId(1),
                title: "Lâmpadas".to_owned(),
                image_url: "x".to_owned(),
            }])
        }
    }

    #[async_trait]
    impl CollectPointPort for FakeBackend {
        async fn create(&self, record: &SubmissionRecord) -> Result<(), PortError> {
            self.posted
                .lock()
                .expect("lock not poisoned")
                .push(record.clone());
            Ok(())
        }
    }

    struct FakeGeography;

    #[async_trait]
    impl GeographyPort for FakeGeography {
        async fn states(&self) -> Result<Vec<StateCode>, PortError> {
            Ok(vec![StateCode::from("SP"), StateCode::from("RJ")])
        }

        async fn municipalities(&self, uf: &StateCode) -> Result<Vec<CityName>, PortError> {
            if uf.0 == "SP" {
                Ok(vec![CityName::from("Campinas")])
            } else {
                Err(PortError::InvalidResponse(format!("unknown state {uf}")))
            }
        }
    }

    struct NoLocation;

    #[async_trait]
    impl LocationPort for NoLocation {
        async fn current_position(&self) -> Result<Coordinate, PortError> {
            Err(PortError::LocationUnavailable("denied".to_owned()))
        }
    }

    fn service(backend: &Arc<FakeBackend>) -> RegistrationService {
        RegistrationService::new(ProviderSet {
            catalog_port: Arc::clone(backend) as Arc<dyn CatalogPort>,
            collect_point_port: Arc::clone(backend) as Arc<dyn CollectPointPort>,
            geography_port: Arc::new(FakeGeography),
            location_port: Arc::new(NoLocation),
        })
    }

    #[tokio::test]
    async fn delegates_to_ports() {
        let backend = Arc::new(FakeBackend {
            posted: Mutex::new(Vec::new()),
        });
        let service = service(&backend);

        assert_eq!(service.categories().await.expect("catalog").len(), 1);
        assert_eq!(service.states().await.expect("states").len(), 2);
        assert_eq!(
            service.cities(&StateCode::from("SP")).await.expect("cities"),
            vec![CityName::from("Campinas")]
        );
        assert!(service.cities(&StateCode::from("XX")).await.is_err());
        assert!(matches!(
            service.locate().await,
            Err(PortError::LocationUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn register_posts_once() {
        let backend = Arc::new(FakeBackend {
            posted: Mutex::new(Vec::new()),
        });
        let service = service(&backend);
        let record = SubmissionRecord {
            name: "ONG X".to_owned(),
            email: "a@b.com".to_owned(),
            whatsapp: "1111".to_owned(),
            uf: Selection::Chosen(StateCode::from("SP")),
            city: Selection::Chosen(CityName::from("Campinas")),
            items: vec![CategoryId(1), CategoryId(2)],
            latitude: -22.9,
            longitude: -47.0,
        };

        service.register(&record).await.expect("registered");

        let posted = backend.posted.lock().expect("lock not poisoned");
        assert_eq!(posted.as_slice(), &[record]);
    }
}
