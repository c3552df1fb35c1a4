//! Deploy-target and SSH parameter resolution

use crate::{Error, Result};
use stack_config::{ServersConfig, normalize_name};
use std::collections::HashMap;

/// Deploy parameters for a server, with hostname keys resolved to literal
/// addresses
#[derive(Debug, Clone, PartialEq)]
pub struct DeployConfig {
    /// SSH user
    pub user: String,
    /// SSH identity file
    pub key: String,
    /// Literal addresses of the hosts this server serves
    pub hostnames: Vec<String>,
    /// SSH port
    pub port: u16,
    /// Remote path deployments unpack into
    pub deploy_path: Option<String>,
    /// Archive name used when shipping a build
    pub zip_name: Option<String>,
}

/// SSH parameters for reaching the server behind one hostname key
#[derive(Debug, Clone, PartialEq)]
pub struct SshConfig {
    /// SSH user
    pub user: String,
    /// SSH identity file
    pub key: String,
    /// Literal address of the host
    pub hostname: String,
    /// SSH port
    pub port: u16,
    /// Remote path deployments unpack into
    pub deploy_path: Option<String>,
    /// Archive name used when shipping a build
    pub zip_name: Option<String>,
}

/// Resolves deploy and SSH parameters from the servers table
///
/// Lookups clone and project from the parsed configuration; the source
/// tables are never mutated.
#[derive(Debug, Clone, Copy)]
pub struct DeployResolver<'a> {
    servers: &'a ServersConfig,
    key_by_address: &'a HashMap<String, String>,
}

impl<'a> DeployResolver<'a> {
    /// Create a resolver over the servers table and the prebuilt inverse
    /// of its hostnames map
    pub fn new(servers: &'a ServersConfig, key_by_address: &'a HashMap<String, String>) -> Self {
        Self {
            servers,
            key_by_address,
        }
    }

    /// Deploy parameters for the named server
    ///
    /// The entry's hostname keys are translated into literal addresses; a
    /// key missing from the hostnames table is a configuration error.
    pub fn deploy_config(&self, name: &str) -> Result<DeployConfig> {
        let server = self
            .servers
            .servers
            .get(&normalize_name(name))
            .ok_or_else(|| Error::ServerNotFound(name.to_string()))?;

        let mut addresses = Vec::with_capacity(server.hostnames.len());
        for key in &server.hostnames {
            let address = self
                .servers
                .hostnames
                .get(key)
                .ok_or_else(|| Error::UnknownHostname(key.clone()))?;
            addresses.push(address.clone());
        }

        Ok(DeployConfig {
            user: server.user.clone(),
            key: server.key.clone(),
            hostnames: addresses,
            port: server.port,
            deploy_path: server.deploy_path.clone(),
            zip_name: server.zip_name.clone(),
        })
    }

    /// SSH parameters for the server listing the given hostname key
    ///
    /// Servers are scanned in declaration order and the first entry whose
    /// hostname-key set contains the name wins.
    pub fn ssh_config(&self, name: &str) -> Result<SshConfig> {
        let key = normalize_name(name);
        let server = self
            .servers
            .servers
            .values()
            .find(|server| server.hostnames.iter().any(|hostname| *hostname == key))
            .ok_or_else(|| Error::ServerNotFound(name.to_string()))?;

        let address = self
            .servers
            .hostnames
            .get(&key)
            .ok_or_else(|| Error::UnknownHostname(key.clone()))?;

        Ok(SshConfig {
            user: server.user.clone(),
            key: server.key.clone(),
            hostname: address.clone(),
            port: server.port,
            deploy_path: server.deploy_path.clone(),
            zip_name: server.zip_name.clone(),
        })
    }

    /// Hostname key for a literal address, via the memoized inverse of the
    /// hostnames table
    pub fn key_for_address(&self, address: &str) -> Option<&str> {
        self.key_by_address.get(address).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stack_config::loader;

    const SERVERS_YAML: &str = r#"
servers:
  web1:
    hostnames: [app-a, app-b]
    user: deploy
    key: ~/.ssh/id_deploy
    deploy_path: /var/www/app
    zip_name: app.zip
  web2:
    hostnames: [app-c]
    user: admin
    key: ~/.ssh/id_admin
    port: 2222
hostnames:
  app-a: 10.0.1.20
  app-b: 10.0.1.21
  app-c: 10.0.2.20
"#;

    fn fixture() -> (ServersConfig, HashMap<String, String>) {
        let servers = loader::parse_servers(SERVERS_YAML).unwrap();
        let inverse = servers
            .hostnames
            .iter()
            .map(|(key, address)| (address.clone(), key.clone()))
            .collect();
        (servers, inverse)
    }

    #[test]
    fn test_deploy_config_translates_hostname_keys() {
        let (servers, inverse) = fixture();
        let deploy = DeployResolver::new(&servers, &inverse);

        let config = deploy.deploy_config("web1").unwrap();
        assert_eq!(config.user, "deploy");
        assert_eq!(config.hostnames, ["10.0.1.20", "10.0.1.21"]);
        assert_eq!(config.port, 22);
        assert_eq!(config.deploy_path.as_deref(), Some("/var/www/app"));

        // The source table still holds the keys, not the addresses.
        assert_eq!(servers.servers["web1"].hostnames, ["app-a", "app-b"]);
    }

    #[test]
    fn test_deploy_config_unknown_server_is_fatal() {
        let (servers, inverse) = fixture();
        let deploy = DeployResolver::new(&servers, &inverse);

        assert!(matches!(
            deploy.deploy_config("web9"),
            Err(Error::ServerNotFound(_))
        ));
    }

    #[test]
    fn test_ssh_config_reverse_lookup() {
        let (servers, inverse) = fixture();
        let deploy = DeployResolver::new(&servers, &inverse);

        let config = deploy.ssh_config("app-a").unwrap();
        assert_eq!(config.hostname, servers.hostnames["app-a"]);
        assert_eq!(config.user, "deploy");
        assert_eq!(config.port, 22);

        let config = deploy.ssh_config("app-c").unwrap();
        assert_eq!(config.hostname, "10.0.2.20");
        assert_eq!(config.user, "admin");
        assert_eq!(config.port, 2222);
    }

    #[test]
    fn test_ssh_config_normalizes_the_name() {
        let (servers, inverse) = fixture();
        let deploy = DeployResolver::new(&servers, &inverse);

        assert_eq!(
            deploy.ssh_config("App A").unwrap().hostname,
            "10.0.1.20"
        );
    }

    #[test]
    fn test_ssh_config_unlisted_name_is_fatal() {
        let (servers, inverse) = fixture();
        let deploy = DeployResolver::new(&servers, &inverse);

        assert!(matches!(
            deploy.ssh_config("app-z"),
            Err(Error::ServerNotFound(_))
        ));
    }

    #[test]
    fn test_key_for_address_inverse_lookup() {
        let (servers, inverse) = fixture();
        let deploy = DeployResolver::new(&servers, &inverse);

        assert_eq!(deploy.key_for_address("10.0.1.21"), Some("app-b"));
        assert_eq!(deploy.key_for_address("10.9.9.9"), None);
    }
}
