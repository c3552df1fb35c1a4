//! Registry construction and lookup

use crate::{Error, Result, Service};
use stack_config::{Location, ServicesConfig, StackPaths, normalize_name};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Reserved name of the always-present shared data store
pub const RESERVED_DATA_STORE: &str = "mysql";

/// The full name-to-service mapping, built once per process
///
/// Keys are normalized names; iteration order is the sorted key order, so
/// pattern lookup and listings are deterministic.
#[derive(Debug)]
pub struct Registry {
    services: BTreeMap<String, Service>,
}

impl Registry {
    /// Build the registry from the declared location tables
    ///
    /// Tables are processed in their fixed declaration order; a normalized
    /// name appearing in two tables is a fatal configuration error naming
    /// both locations. The reserved data store is injected last,
    /// unconditionally.
    pub fn build(config: &ServicesConfig, paths: &StackPaths) -> Result<Self> {
        let mut services: BTreeMap<String, Service> = BTreeMap::new();

        for (location, records) in config.services.iter() {
            for record in records {
                let key = normalize_name(&record.name);
                if let Some(existing) = services.get(&key) {
                    return Err(Error::DuplicateName {
                        name: record.name.clone(),
                        first: existing.location(),
                        second: location,
                    });
                }

                let service = Service::from_record(record.clone(), location, paths)?;
                debug!("registered {} at {}", service.name(), location);
                services.insert(key, service);
            }
        }

        services.insert(
            RESERVED_DATA_STORE.to_string(),
            Service::data_store(RESERVED_DATA_STORE, paths),
        );

        info!("registry built with {} services", services.len());
        Ok(Self { services })
    }

    /// Number of registered services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the registry is empty (it never is: the data store is
    /// always injected)
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Get a service by exact name (normalized before lookup)
    pub fn get(&self, name: &str) -> Result<&Service> {
        self.services
            .get(&normalize_name(name))
            .ok_or_else(|| Error::ServiceNotFound(name.to_string()))
    }

    /// Find a service by exact name or by case-insensitive substring match
    /// against display names
    ///
    /// The pattern is matched literally, never compiled; candidates are
    /// scanned in sorted key order so the first match is deterministic.
    pub fn find(&self, pattern: &str) -> Result<&Service> {
        if let Some(service) = self.services.get(&normalize_name(pattern)) {
            return Ok(service);
        }

        let needle = pattern.to_lowercase();
        self.services
            .values()
            .find(|service| service.name().to_lowercase().contains(&needle))
            .ok_or_else(|| Error::NoMatch(pattern.to_string()))
    }

    /// Iterate all services in sorted key order
    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    /// All services declared at the given location
    pub fn at_location(&self, location: Location) -> Vec<&Service> {
        self.services
            .values()
            .filter(|service| service.location() == location)
            .collect()
    }
}
