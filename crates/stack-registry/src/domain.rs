//! Domain derivation for services
//!
//! Internal domains follow `<short>.convox.<env>`; external domains come
//! from fixed per-service hostname tables. The environment position is an
//! explicit `{env}` template slot rendered from an [`EnvToken`], never a
//! substring substitution on an already-built hostname.

use crate::{Registry, Result};
use stack_config::{Location, StackSettings, normalize_name};

/// Environment token substituted into domain templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvToken {
    /// Reachable on the developer host
    Local,
    /// Reachable through the office rack
    Office,
}

impl EnvToken {
    /// The token as it appears inside hostnames
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvToken::Local => "local",
            EnvToken::Office => "office",
        }
    }
}

/// Template slot the environment token is rendered into
const ENV_SLOT: &str = "{env}";

/// Legacy aliases whose internal domains use short brand names
const INTERNAL_RENAMES: [(&str, &str); 2] = [
    ("dietbet-game-service", "dietbet"),
    ("stepbet-game-service", "stepbet"),
];

/// External hostnames when resolving against staging
///
/// Staging hostnames carry no `{env}` slot: they are the same from every
/// location.
const STAGING_DOMAINS: &[(&str, &[(&str, &str)])] = &[
    ("wb-auth-service", &[("default", "accounts-staging.waybetter.com")]),
    (
        "wb-graphql-service",
        &[
            ("default", "graphql-staging.waybetter.com"),
            ("ninja", "graphql-staging.waybetter.ninja"),
        ],
    ),
    ("wb-hub", &[("default", "hub-staging.waybetter.com")]),
    (
        "wb-admin-auth-service",
        &[("default", "admin-auth-staging.waybetter.ninja")],
    ),
    ("wb-admin-web", &[("default", "www-staging.waybetter.ninja")]),
];

/// External hostnames when resolving against the local dev domains
const LOCAL_DEV_DOMAINS: &[(&str, &[(&str, &str)])] = &[
    (
        "wb-auth-service",
        &[("default", "accounts-{env}.waybetterdev.com")],
    ),
    (
        "wb-graphql-service",
        &[
            ("default", "graphql-{env}.waybetterdev.com"),
            ("ninja", "graphql-{env}.waybetter.ninja"),
        ],
    ),
    ("wb-hub", &[("default", "hub-{env}.waybetterdev.com")]),
    (
        "wb-admin-auth-service",
        &[("default", "admin-auth-{env}.waybetter.ninja")],
    ),
    ("wb-admin-web", &[("default", "www-{env}.waybetter.ninja")]),
];

/// Derives reachable names for services
///
/// Borrows the process-wide settings and the built registry; resolutions
/// are pure functions of that state and safe to recompute.
#[derive(Debug, Clone, Copy)]
pub struct DomainResolver<'a> {
    settings: &'a StackSettings,
    registry: &'a Registry,
}

impl<'a> DomainResolver<'a> {
    /// Create a resolver over the given settings and registry
    pub fn new(settings: &'a StackSettings, registry: &'a Registry) -> Self {
        Self { settings, registry }
    }

    /// Internally reachable domain for a service
    ///
    /// `location` overrides the service's own declared location when
    /// computing the environment token.
    pub fn internal_domain(&self, name: &str, location: Option<Location>) -> Result<String> {
        let normalized = normalize_name(name);
        let token = self.env_token(&normalized, location)?;

        let renamed = INTERNAL_RENAMES
            .iter()
            .find(|(from, _)| *from == normalized)
            .map(|(_, to)| *to);
        let short = renamed.unwrap_or_else(|| normalized.strip_prefix("wb-").unwrap_or(&normalized));

        Ok(format!("{short}.convox.{}", token.as_str()))
    }

    /// Externally reachable hostname for a service, if one is configured
    ///
    /// `variant` selects a named alternate hostname and defaults to
    /// `"default"`; an unknown service or variant is not an error, there
    /// is simply no hostname.
    pub fn external_domain(
        &self,
        name: &str,
        variant: Option<&str>,
        location: Option<Location>,
    ) -> Result<Option<String>> {
        let normalized = normalize_name(name);
        let table = if self.settings.use_staging_domains {
            STAGING_DOMAINS
        } else {
            LOCAL_DEV_DOMAINS
        };

        let Some(template) = lookup(table, &normalized, variant.unwrap_or("default")) else {
            return Ok(None);
        };

        let token = self.env_token(&normalized, location)?;
        Ok(Some(template.replace(ENV_SLOT, token.as_str())))
    }

    /// Rack-internal address of an app on the local container rack
    pub fn rack_domain(&self, name: &str) -> String {
        if self.settings.local_rack_is_dev() {
            format!("web.{name}.dev.convox")
        } else {
            format!("web.{name}.convox")
        }
    }

    /// Resolve the environment token for a service
    ///
    /// Office co-location overrides per-service placement: under the
    /// office config type the token is always `office`. Otherwise the
    /// explicit location wins over the declared one, and only the office
    /// rack maps to `office`.
    fn env_token(&self, normalized: &str, location: Option<Location>) -> Result<EnvToken> {
        if self.settings.is_office() {
            return Ok(EnvToken::Office);
        }

        let location = match location {
            Some(location) => location,
            None => self.registry.get(normalized)?.location(),
        };

        Ok(match location {
            Location::OfficeRack => EnvToken::Office,
            _ => EnvToken::Local,
        })
    }
}

fn lookup(
    table: &[(&str, &[(&str, &'static str)])],
    name: &str,
    variant: &str,
) -> Option<&'static str> {
    table
        .iter()
        .find(|(service, _)| *service == name)
        .and_then(|(_, variants)| {
            variants
                .iter()
                .find(|(key, _)| *key == variant)
                .map(|(_, template)| *template)
        })
}
