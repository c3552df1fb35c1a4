//! Configuration loading and validation

use crate::{Result, ConfigError, ServersConfig, ServicesConfig, StackPaths};
use tracing::debug;

/// File name of the services table
pub const SERVICES_FILE: &str = "services.yaml";

/// File name of the servers table
pub const SERVERS_FILE: &str = "servers.yaml";

/// Load and validate the services file for a stack
pub fn load_services(paths: &StackPaths) -> Result<ServicesConfig> {
    let path = paths.find_config(SERVICES_FILE)?;
    debug!("loading services config from {}", path.display());
    parse_services(&std::fs::read_to_string(path)?)
}

/// Parse the services file from a string
pub fn parse_services(content: &str) -> Result<ServicesConfig> {
    let config: ServicesConfig = serde_yaml::from_str(content)?;
    validate_services(&config)?;
    Ok(config)
}

/// Load and validate the servers file for a stack
pub fn load_servers(paths: &StackPaths) -> Result<ServersConfig> {
    let path = paths.find_config(SERVERS_FILE)?;
    debug!("loading servers config from {}", path.display());
    parse_servers(&std::fs::read_to_string(path)?)
}

/// Parse the servers file from a string
pub fn parse_servers(content: &str) -> Result<ServersConfig> {
    let config: ServersConfig = serde_yaml::from_str(content)?;
    validate_servers(&config)?;
    Ok(config)
}

fn validate_services(config: &ServicesConfig) -> Result<()> {
    for (location, records) in config.services.iter() {
        for record in records {
            if record.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "service with empty name in the {location} table"
                )));
            }
            if record.port == Some(0) {
                return Err(ConfigError::Validation(format!(
                    "service '{}' declares port 0",
                    record.name
                )));
            }
        }
    }
    Ok(())
}

fn validate_servers(config: &ServersConfig) -> Result<()> {
    for (name, server) in &config.servers {
        if server.user.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "server '{name}' declares an empty user"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigType, Kind};

    #[test]
    fn test_parse_minimal_services_config() {
        let yaml = r#"
services:
  process_host:
    - name: wb-hub
      gitname: wb-hub
      kind: node
      port: 3000
"#;

        let config = parse_services(yaml).unwrap();
        assert_eq!(config.settings.config_type, ConfigType::DevPc);
        assert_eq!(config.settings.local_rack, "local/convox");
        assert!(!config.settings.use_staging_domains);

        let record = &config.services.process_host[0];
        assert_eq!(record.name, "wb-hub");
        assert_eq!(record.kind, Kind::Node);
        assert_eq!(record.port, Some(3000));
        assert!(record.path.is_none());
    }

    #[test]
    fn test_parse_full_settings() {
        let yaml = r#"
config_type: convox-office
local_rack: dev
use_staging_domains: true
racks:
  local: local/convox
  staging: waybetter/stagingv3
certificates:
  apache-local-selfsigned: .convox.local
services:
  office_rack:
    - name: wb-notify-service
      gitname: wb-notify-service
      kind: rails
"#;

        let config = parse_services(yaml).unwrap();
        assert!(config.settings.is_office());
        assert!(config.settings.local_rack_is_dev());
        assert!(config.settings.use_staging_domains);
        assert_eq!(
            config.settings.racks.get("staging").map(String::as_str),
            Some("waybetter/stagingv3")
        );
        assert_eq!(config.services.office_rack.len(), 1);
        assert_eq!(config.services.office_rack[0].port, None);
    }

    #[test]
    fn test_kind_defaults_to_none() {
        let yaml = r#"
services:
  virtual_host:
    - name: phpmyadmin
      path: /var/www/phpmyadmin
"#;

        let config = parse_services(yaml).unwrap();
        assert_eq!(config.services.virtual_host[0].kind, Kind::None);
    }

    #[test]
    fn test_port_zero_is_rejected() {
        let yaml = r#"
services:
  process_host:
    - name: wb-hub
      kind: node
      port: 0
"#;

        assert!(matches!(
            parse_services(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_servers_config() {
        let yaml = r#"
servers:
  web1:
    hostnames: [app-a, app-b]
    user: deploy
    key: ~/.ssh/id_deploy
    deploy_path: /var/www
    zip_name: app.zip
  web2:
    hostnames: [app-c]
    user: deploy
    key: ~/.ssh/id_deploy
    port: 2222
hostnames:
  app-a: 10.0.1.20
  app-b: 10.0.1.21
  app-c: 10.0.2.20
"#;

        let config = parse_servers(yaml).unwrap();
        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.servers["web1"].port, 22);
        assert_eq!(config.servers["web2"].port, 2222);
        assert_eq!(config.hostnames["app-c"], "10.0.2.20");

        let order: Vec<&String> = config.servers.keys().collect();
        assert_eq!(order, ["web1", "web2"]);
    }
}
