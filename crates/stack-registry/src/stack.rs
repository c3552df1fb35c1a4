//! The process-wide stack context

use crate::{DeployResolver, DomainResolver, Registry, Result};
use stack_config::{ServersConfig, StackPaths, StackSettings, loader};
use std::collections::HashMap;
use tracing::info;

/// Everything a command needs to resolve services, domains, and deploy
/// targets
///
/// Constructed once at process start by [`Stack::load`] and passed by
/// reference from there on: settings, paths, the built registry, the
/// servers table, and the inverse of its hostnames map all live here for
/// the lifetime of the process.
#[derive(Debug)]
pub struct Stack {
    settings: StackSettings,
    paths: StackPaths,
    registry: Registry,
    servers: ServersConfig,
    key_by_address: HashMap<String, String>,
}

impl Stack {
    /// Load both configuration tables and build the registry
    pub fn load(paths: StackPaths) -> Result<Self> {
        let services_config = loader::load_services(&paths)?;
        let servers = loader::load_servers(&paths)?;
        let registry = Registry::build(&services_config, &paths)?;
        let key_by_address = servers
            .hostnames
            .iter()
            .map(|(key, address)| (address.clone(), key.clone()))
            .collect();

        info!(
            "stack loaded from {}: {} services, {} servers",
            paths.root().display(),
            registry.len(),
            servers.servers.len()
        );

        Ok(Self {
            settings: services_config.settings,
            paths,
            registry,
            servers,
            key_by_address,
        })
    }

    /// Process-wide settings
    pub fn settings(&self) -> &StackSettings {
        &self.settings
    }

    /// Well-known stack paths
    pub fn paths(&self) -> &StackPaths {
        &self.paths
    }

    /// The built service registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The parsed servers table
    pub fn servers(&self) -> &ServersConfig {
        &self.servers
    }

    /// Domain resolver over this stack
    pub fn domains(&self) -> DomainResolver<'_> {
        DomainResolver::new(&self.settings, &self.registry)
    }

    /// Deploy resolver over this stack
    pub fn deploy(&self) -> DeployResolver<'_> {
        DeployResolver::new(&self.servers, &self.key_by_address)
    }
}
