//! Stack root discovery and config-file search

use crate::{ConfigError, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming the stack root
pub const ROOT_ENV_VAR: &str = "DEVSTACK_ROOT";

/// Well-known locations inside a stack checkout
///
/// Everything is derived from a single root directory: configuration
/// templates and their local-settings overrides, the directory service
/// checkouts live in, and the shared data-store compose directory.
#[derive(Debug, Clone)]
pub struct StackPaths {
    root: PathBuf,
}

impl StackPaths {
    /// Create paths rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the stack root from an explicit flag, the `DEVSTACK_ROOT`
    /// environment variable, or `~/devstack`, in that order
    pub fn discover(explicit: Option<PathBuf>) -> Self {
        let root = explicit
            .or_else(|| std::env::var_os(ROOT_ENV_VAR).map(PathBuf::from))
            .or_else(|| dirs::home_dir().map(|home| home.join("devstack")))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(root)
    }

    /// The stack root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Per-machine configuration overrides
    pub fn local_settings(&self) -> PathBuf {
        self.root.join("configs").join("local-settings")
    }

    /// Checked-in configuration templates
    pub fn templates(&self) -> PathBuf {
        self.root.join("configs").join("templates")
    }

    /// Directory service checkouts live in
    pub fn services(&self) -> PathBuf {
        self.root.join("services")
    }

    /// Compose directory of the shared data store
    pub fn superlocal(&self) -> PathBuf {
        self.root.join("superlocal")
    }

    /// Source env file kept in local-settings for a service
    pub fn env_source(&self, name: &str) -> PathBuf {
        self.local_settings().join("envs").join(format!("{name}.env"))
    }

    /// Destination env file inside a service checkout
    pub fn env_destination(&self, service_path: &Path) -> PathBuf {
        service_path.join(".env")
    }

    /// Locate a config file: the local-settings copy wins, the template is
    /// the fallback, absence of both is fatal
    pub fn find_config(&self, filename: &str) -> Result<PathBuf> {
        let override_path = self.local_settings().join(filename);
        if override_path.is_file() {
            return Ok(override_path);
        }
        let template_path = self.templates().join(filename);
        if template_path.is_file() {
            return Ok(template_path);
        }
        Err(ConfigError::Missing {
            filename: filename.to_string(),
        })
    }
}
