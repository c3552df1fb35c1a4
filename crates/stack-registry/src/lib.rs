//! # Stack Registry
//!
//! Service resolution and location dispatch for devstack.
//!
//! This crate turns the declarative configuration tables into typed,
//! location-specific service descriptors: the [`Registry`] maps every
//! normalized service name to exactly one [`Service`], the
//! [`DomainResolver`] derives internally and externally reachable names,
//! and the [`DeployResolver`] derives SSH/deploy parameters. The
//! [`Stack`] context owns all of it for the lifetime of the process.

#![warn(missing_docs)]

use stack_config::{Kind, Location};

mod deploy;
mod domain;
mod registry;
mod service;
mod stack;

pub use deploy::{DeployConfig, DeployResolver, SshConfig};
pub use domain::{DomainResolver, EnvToken};
pub use registry::{RESERVED_DATA_STORE, Registry};
pub use service::{Service, Variant};
pub use stack::Stack;

/// Error types for registry operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] stack_config::ConfigError),

    /// The same normalized name is declared in two location tables
    #[error("Service '{name}' can't have two locations: {first} and {second}")]
    DuplicateName {
        /// Conflicting service name
        name: String,
        /// Location of the first declaration
        first: Location,
        /// Location of the second declaration
        second: Location,
    },

    /// A process-host record declares a runtime kind nothing can run
    #[error("Service '{name}' has unsupported kind '{kind}' for the process host")]
    UnsupportedKind {
        /// Offending service name
        name: String,
        /// Declared runtime kind
        kind: Kind,
    },

    /// A record is missing a field its location requires
    #[error("Service '{name}' is missing required field '{field}'")]
    MissingField {
        /// Offending service name
        name: String,
        /// Name of the missing field
        field: &'static str,
    },

    /// No service registered under the given name
    #[error("Service '{0}' not found")]
    ServiceNotFound(String),

    /// No service display name matched the given pattern
    #[error("Did not find any services for pattern '{0}'")]
    NoMatch(String),

    /// No deploy target configured for the given name
    #[error("Deploy config for '{0}' not found")]
    ServerNotFound(String),

    /// A server lists a hostname key the hostnames table does not define
    #[error("Unknown hostname key '{0}'")]
    UnknownHostname(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;
