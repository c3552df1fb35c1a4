//! # Stack Configuration
//!
//! YAML configuration model for devstack.
//!
//! This crate provides the declarative tables the registry is built from:
//! the services file (per-location service records plus process-wide
//! settings) and the servers file (deploy targets and their hostnames).
//! Both are searched for in `configs/local-settings/` first, falling back
//! to the checked-in `configs/templates/`.

#![warn(missing_docs)]

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub mod loader;
pub mod paths;

pub use paths::StackPaths;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither an override nor a template copy of a config file exists
    #[error("Could not find '{filename}' in either local-settings or templates")]
    Missing {
        /// The expected file name
        filename: String,
    },

    /// Failed to read configuration file
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// Failed to parse YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Where the whole stack is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigType {
    /// Developer workstation: services spread over the local locations
    DevPc,
    /// Office-colocated rack: everything reachable through the office rack
    ConvoxOffice,
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigType::DevPc => "dev-pc",
            ConfigType::ConvoxOffice => "convox-office",
        })
    }
}

/// One deployment context a service can be declared under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// Plain process on the developer host
    ProcessHost,
    /// App on the local container rack
    LocalRack,
    /// App on the office container rack
    OfficeRack,
    /// Apache virtual host on the developer host
    VirtualHost,
}

impl Location {
    /// Kebab-case name used in messages and CLI arguments
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::ProcessHost => "process-host",
            Location::LocalRack => "local-rack",
            Location::OfficeRack => "office-rack",
            Location::VirtualHost => "virtual-host",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "process-host" => Ok(Location::ProcessHost),
            "local-rack" => Ok(Location::LocalRack),
            "office-rack" => Ok(Location::OfficeRack),
            "virtual-host" => Ok(Location::VirtualHost),
            other => Err(ConfigError::Validation(format!(
                "unknown location '{other}'"
            ))),
        }
    }
}

/// Runtime kind of a declared service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Rails application
    Rails,
    /// Node application
    Node,
    /// PHP site served by Apache
    Php,
    /// MySQL data store
    Mysql,
    /// No runtime of its own
    #[default]
    None,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Rails => "rails",
            Kind::Node => "node",
            Kind::Php => "php",
            Kind::Mysql => "mysql",
            Kind::None => "none",
        };
        f.write_str(name)
    }
}

/// One configuration entry for a named service
///
/// The location is not part of the record; it comes from which table slot
/// the record was declared in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceRecord {
    /// Service name, globally unique after normalization
    pub name: String,

    /// Source repository name, when the service is checked out from git
    #[serde(default)]
    pub gitname: Option<String>,

    /// Runtime kind
    #[serde(default)]
    pub kind: Kind,

    /// Network port the service listens on
    #[serde(default)]
    pub port: Option<u16>,

    /// Checkout path; defaulted from the services directory if absent
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// The four per-location service tables
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceTables {
    /// Services run as plain processes on the developer host
    #[serde(default)]
    pub process_host: Vec<ServiceRecord>,

    /// Services run on the local container rack
    #[serde(default)]
    pub local_rack: Vec<ServiceRecord>,

    /// Services reached on the office container rack
    #[serde(default)]
    pub office_rack: Vec<ServiceRecord>,

    /// Sites served as Apache virtual hosts
    #[serde(default)]
    pub virtual_host: Vec<ServiceRecord>,
}

impl ServiceTables {
    /// Iterate the tables in their fixed declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Location, &[ServiceRecord])> {
        [
            (Location::ProcessHost, self.process_host.as_slice()),
            (Location::LocalRack, self.local_rack.as_slice()),
            (Location::OfficeRack, self.office_rack.as_slice()),
            (Location::VirtualHost, self.virtual_host.as_slice()),
        ]
        .into_iter()
    }
}

/// Process-wide settings, read-only after load
#[derive(Debug, Clone, Deserialize)]
pub struct StackSettings {
    /// Which deployment flavor the whole stack runs under
    #[serde(default = "default_config_type")]
    pub config_type: ConfigType,

    /// Identifier of the local container rack
    #[serde(default = "default_local_rack")]
    pub local_rack: String,

    /// Named racks available to rack-management commands
    #[serde(default)]
    pub racks: IndexMap<String, String>,

    /// Resolve external domains against the staging tables
    #[serde(default)]
    pub use_staging_domains: bool,

    /// Certificate name to hostname-suffix table
    #[serde(default)]
    pub certificates: IndexMap<String, String>,
}

impl StackSettings {
    /// Whether the stack runs office-colocated
    pub fn is_office(&self) -> bool {
        self.config_type == ConfigType::ConvoxOffice
    }

    /// Whether the local rack is the `dev` rack
    pub fn local_rack_is_dev(&self) -> bool {
        self.local_rack == "dev"
    }

    /// Certificate whose hostname suffix matches `domain`, if any
    pub fn certificate_for_domain(&self, domain: &str) -> Option<&str> {
        self.certificates
            .iter()
            .find(|(_, suffix)| domain.ends_with(suffix.as_str()))
            .map(|(name, _)| name.as_str())
    }
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            config_type: default_config_type(),
            local_rack: default_local_rack(),
            racks: IndexMap::new(),
            use_staging_domains: false,
            certificates: IndexMap::new(),
        }
    }
}

fn default_config_type() -> ConfigType {
    ConfigType::DevPc
}

fn default_local_rack() -> String {
    "local/convox".to_string()
}

/// Root structure of the services file
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    /// Process-wide settings
    #[serde(flatten)]
    pub settings: StackSettings,

    /// Per-location service tables
    #[serde(default)]
    pub services: ServiceTables,
}

/// One deploy target in the servers file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerRecord {
    /// Hostname keys served by this machine, resolved via the hostnames map
    pub hostnames: Vec<String>,

    /// SSH user
    pub user: String,

    /// SSH identity file
    pub key: String,

    /// SSH port
    #[serde(default = "default_ssh_port")]
    pub port: u16,

    /// Remote path deployments unpack into
    #[serde(default)]
    pub deploy_path: Option<String>,

    /// Archive name used when shipping a build
    #[serde(default)]
    pub zip_name: Option<String>,
}

fn default_ssh_port() -> u16 {
    22
}

/// Root structure of the servers file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServersConfig {
    /// Server name to deploy target, in declaration order
    #[serde(default)]
    pub servers: IndexMap<String, ServerRecord>,

    /// Hostname key to literal address
    #[serde(default)]
    pub hostnames: IndexMap<String, String>,
}

/// Canonicalize a service name for use as a uniqueness key
///
/// Case-folds and collapses whitespace, underscore, and hyphen runs into a
/// single `-`, so `"My Service"`, `"my_service"`, and `"my-service"` all
/// share one key.
pub fn normalize_name(name: &str) -> String {
    let re = Regex::new(r"[\s_-]+").unwrap();
    let lowered = name.to_lowercase();
    let collapsed = re.replace_all(&lowered, "-");
    collapsed.trim_matches('-').to_string()
}
