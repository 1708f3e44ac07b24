//! Read-only reference data: the locations and services jobs and vendors point at.

mod loader;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use loader::CatalogError;

pub type LocationId = i32;
pub type ServiceId = i32;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub state: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Lookup contract the registry validates references against.
pub trait ReferenceCatalog: Send + Sync {
    fn lookup_location(&self, id: LocationId) -> Option<&Location>;
    fn lookup_service(&self, id: ServiceId) -> Option<&Service>;
    fn locations(&self) -> Vec<Location>;
    fn services(&self) -> Vec<Service>;
}

/// Catalog loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locations: BTreeMap<LocationId, Location>,
    services: BTreeMap<ServiceId, Service>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

impl ReferenceCatalog for Catalog {
    fn lookup_location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    fn lookup_service(&self, id: ServiceId) -> Option<&Service> {
        self.services.get(&id)
    }

    fn locations(&self) -> Vec<Location> {
        self.locations.values().cloned().collect()
    }

    fn services(&self) -> Vec<Service> {
        self.services.values().cloned().collect()
    }
}

/// Programmatic catalog assembly. Later entries replace earlier ones with the same id.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    pub fn location(mut self, id: LocationId, state: &str, name: &str) -> Self {
        self.catalog.locations.insert(
            id,
            Location {
                id,
                state: state.to_string(),
                name: name.to_string(),
            },
        );
        self
    }

    pub fn service(mut self, id: ServiceId, name: &str) -> Self {
        self.catalog.services.insert(
            id,
            Service {
                id,
                name: name.to_string(),
                description: String::new(),
            },
        );
        self
    }

    pub fn build(self) -> Catalog {
        self.catalog
    }
}
