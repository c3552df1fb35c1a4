//! Typed service descriptors and location dispatch

use crate::{Error, Result};
use command_runner::{Command, exec_with_env};
use stack_config::{Kind, Location, ServiceRecord, StackPaths, StackSettings};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Behavioral flavor of a service, picked from its location and kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Rails app run as a plain process on the developer host
    RailsProcess,
    /// Node app run as a plain process on the developer host
    NodeProcess,
    /// App running on the local container rack
    RackContainer,
    /// App reached on the office container rack
    OfficeContainer,
    /// Site served as an Apache virtual host
    ApacheVhost,
    /// The shared docker-run data store
    DataStore,
}

/// A resolved service: one configuration record plus its location-derived
/// behavior
///
/// Owned by the [`Registry`](crate::Registry) for the lifetime of the
/// process; callers only ever borrow it.
#[derive(Debug, Clone)]
pub struct Service {
    name: String,
    gitname: Option<String>,
    kind: Kind,
    port: Option<u16>,
    path: PathBuf,
    location: Location,
    variant: Variant,
}

impl Service {
    /// Build the service for a located record
    ///
    /// This is the location policy: it enforces per-location required
    /// fields, defaults the checkout path, and dispatches on the
    /// `(location, kind)` pair. A process-host record with a kind nothing
    /// can run is a hard error, not a silently missing entry.
    pub fn from_record(
        record: ServiceRecord,
        location: Location,
        paths: &StackPaths,
    ) -> Result<Self> {
        let variant = match (location, record.kind) {
            (Location::LocalRack, _) => Variant::RackContainer,
            (Location::ProcessHost, Kind::Rails) => Variant::RailsProcess,
            (Location::ProcessHost, Kind::Node) => Variant::NodeProcess,
            (Location::ProcessHost, kind) => {
                return Err(Error::UnsupportedKind {
                    name: record.name,
                    kind,
                });
            }
            (Location::OfficeRack, _) => Variant::OfficeContainer,
            (Location::VirtualHost, _) => Variant::ApacheVhost,
        };

        if location == Location::ProcessHost && record.port.is_none() {
            return Err(Error::MissingField {
                name: record.name,
                field: "port",
            });
        }
        if location == Location::VirtualHost && record.path.is_none() {
            return Err(Error::MissingField {
                name: record.name,
                field: "path",
            });
        }

        let path = record
            .path
            .unwrap_or_else(|| paths.services().join(&record.name));

        Ok(Self {
            name: record.name,
            gitname: record.gitname,
            kind: record.kind,
            port: record.port,
            path,
            location,
            variant,
        })
    }

    /// The always-present shared data store
    pub fn data_store(name: &str, paths: &StackPaths) -> Self {
        Self {
            name: name.to_string(),
            gitname: None,
            kind: Kind::Mysql,
            port: Some(3306),
            path: paths.superlocal(),
            location: Location::LocalRack,
            variant: Variant::DataStore,
        }
    }

    /// Display name of the service
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source repository name, if the service is checked out from git
    pub fn gitname(&self) -> Option<&str> {
        self.gitname.as_deref()
    }

    /// Runtime kind
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Port the service listens on, if declared
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Checkout path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared location
    pub fn location(&self) -> Location {
        self.location
    }

    /// Behavioral variant
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Whether the service runs as a plain process on the developer host
    pub fn is_on_process_host(&self) -> bool {
        self.location == Location::ProcessHost
    }

    /// Whether the service runs on the local container rack
    pub fn is_on_local_rack(&self) -> bool {
        self.location == Location::LocalRack
    }

    /// Whether the service is served as an Apache virtual host
    pub fn is_on_virtual_host(&self) -> bool {
        self.location == Location::VirtualHost
    }

    /// Whether the service declares the given runtime kind
    pub fn is_kind(&self, kind: Kind) -> bool {
        self.kind == kind
    }

    /// Environment-variable overrides applied when running in a named
    /// environment
    fn override_envs(&self, environment: Option<&str>) -> Vec<(String, String)> {
        let var = match self.variant {
            Variant::RailsProcess => "RAILS_ENV",
            Variant::NodeProcess => "NODE_ENV",
            _ => return Vec::new(),
        };
        environment
            .map(|env| vec![(var.to_string(), env.to_string())])
            .unwrap_or_default()
    }

    /// Command that starts the service, when the location supports
    /// starting it from here
    pub fn start_command(&self, settings: &StackSettings, paths: &StackPaths) -> Option<Command> {
        match self.variant {
            Variant::RailsProcess => {
                self.run_command("bin/start_web_server.sh", Some("development"), settings, paths)
            }
            Variant::NodeProcess => {
                self.run_command("npm start", Some("development"), settings, paths)
            }
            Variant::RackContainer => {
                let mut cmd = Command::new("convox");
                cmd.arg("start").current_dir(&self.path);
                Some(cmd)
            }
            Variant::DataStore => {
                let mut cmd = Command::new("docker");
                cmd.args(["compose", "up", "-d", "mysql"]).current_dir(&self.path);
                Some(cmd)
            }
            Variant::OfficeContainer | Variant::ApacheVhost => None,
        }
    }

    /// Command that runs `cmd` inside the service's environment
    pub fn run_command(
        &self,
        cmd: &str,
        environment: Option<&str>,
        settings: &StackSettings,
        paths: &StackPaths,
    ) -> Option<Command> {
        match self.variant {
            Variant::RailsProcess | Variant::NodeProcess => Some(exec_with_env(
                Some(cmd),
                &self.path,
                &paths.env_destination(&self.path),
                &self.override_envs(environment),
                &self.name,
            )),
            Variant::RackContainer => Some(self.convox_run(cmd, Some(settings.local_rack.as_str()))),
            Variant::OfficeContainer => {
                Some(self.convox_run(cmd, settings.racks.get("office").map(String::as_str)))
            }
            Variant::ApacheVhost | Variant::DataStore => None,
        }
    }

    /// Command that opens an interactive session inside the service
    pub fn connect_command(
        &self,
        environment: Option<&str>,
        settings: &StackSettings,
        paths: &StackPaths,
    ) -> Option<Command> {
        match self.variant {
            Variant::RailsProcess | Variant::NodeProcess => Some(exec_with_env(
                None,
                &self.path,
                &paths.env_destination(&self.path),
                &self.override_envs(environment),
                &self.name,
            )),
            Variant::RackContainer | Variant::OfficeContainer => {
                self.run_command("bash", environment, settings, paths)
            }
            Variant::DataStore => {
                let mut cmd = Command::new("docker");
                cmd.args(["compose", "exec", "mysql", "mysql"]).current_dir(&self.path);
                Some(cmd)
            }
            Variant::ApacheVhost => None,
        }
    }

    /// Prepare the service before starting it
    ///
    /// Only Rails apps need preparation: their env file is copied from
    /// local-settings into the checkout. No-op everywhere else, and for
    /// services not actually located on the process host.
    pub fn prepare(&self, paths: &StackPaths) -> Result<()> {
        if self.variant != Variant::RailsProcess || !self.is_on_process_host() {
            return Ok(());
        }

        let source = paths.env_source(&self.name);
        if source.is_file() {
            let destination = paths.env_destination(&self.path);
            debug!(
                "copying env file {} -> {}",
                source.display(),
                destination.display()
            );
            std::fs::copy(&source, &destination)?;
        }
        Ok(())
    }

    fn convox_run(&self, cmd: &str, rack: Option<&str>) -> Command {
        let mut command = Command::new("convox");
        command.args(["run", "web", cmd]);
        if let Some(rack) = rack {
            command.arg("--rack").arg(rack);
        }
        command.arg("--app").arg(&self.name);
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> StackPaths {
        StackPaths::new("/stack")
    }

    fn record(name: &str, kind: Kind, port: Option<u16>) -> ServiceRecord {
        ServiceRecord {
            name: name.to_string(),
            gitname: Some(name.to_string()),
            kind,
            port,
            path: None,
        }
    }

    #[test]
    fn test_dispatch_by_location_and_kind() {
        let cases = [
            (Location::LocalRack, Kind::Rails, Variant::RackContainer),
            (Location::ProcessHost, Kind::Rails, Variant::RailsProcess),
            (Location::ProcessHost, Kind::Node, Variant::NodeProcess),
            (Location::OfficeRack, Kind::Rails, Variant::OfficeContainer),
            (Location::OfficeRack, Kind::Node, Variant::OfficeContainer),
        ];
        for (location, kind, expected) in cases {
            let service =
                Service::from_record(record("svc", kind, Some(3000)), location, &paths()).unwrap();
            assert_eq!(service.variant(), expected, "{location} {kind}");
        }

        let vhost = Service::from_record(
            ServiceRecord {
                path: Some(PathBuf::from("/var/www/stepbet")),
                ..record("stepbet", Kind::Php, None)
            },
            Location::VirtualHost,
            &paths(),
        )
        .unwrap();
        assert_eq!(vhost.variant(), Variant::ApacheVhost);
        assert!(vhost.is_on_virtual_host());
        assert!(vhost.is_kind(Kind::Php));
        assert!(!vhost.is_on_process_host());
    }

    #[test]
    fn test_unsupported_process_host_kind_is_an_error() {
        let err = Service::from_record(
            record("stepbet", Kind::Php, Some(8080)),
            Location::ProcessHost,
            &paths(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind { .. }));
    }

    #[test]
    fn test_process_host_requires_port() {
        let err = Service::from_record(
            record("wb-hub", Kind::Node, None),
            Location::ProcessHost,
            &paths(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "port", .. }));
    }

    #[test]
    fn test_virtual_host_requires_explicit_path() {
        let err = Service::from_record(
            record("stepbet", Kind::Php, None),
            Location::VirtualHost,
            &paths(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "path", .. }));
    }

    #[test]
    fn test_path_defaults_to_services_dir() {
        let service = Service::from_record(
            record("wb-social-service", Kind::Rails, Some(3005)),
            Location::LocalRack,
            &paths(),
        )
        .unwrap();
        assert_eq!(service.path(), Path::new("/stack/services/wb-social-service"));
    }

    #[test]
    fn test_rails_commands_use_env_injection() {
        let settings = StackSettings::default();
        let service = Service::from_record(
            record("wb-social-service", Kind::Rails, Some(3005)),
            Location::ProcessHost,
            &paths(),
        )
        .unwrap();

        let run = service
            .run_command("rails console", Some("development"), &settings, &paths())
            .unwrap();
        let script = run.get_args()[1].clone();
        assert!(script.contains("export RAILS_ENV=development"));
        assert!(script.ends_with("exec rails console"));

        let connect = service.connect_command(None, &settings, &paths()).unwrap();
        let script = connect.get_args()[1].clone();
        assert!(!script.contains("RAILS_ENV"));
        assert!(script.ends_with("exec bash -i"));
    }

    #[test]
    fn test_rack_container_commands_target_the_rack() {
        let settings = StackSettings::default();
        let service = Service::from_record(
            record("wb-social-service", Kind::Rails, Some(3005)),
            Location::LocalRack,
            &paths(),
        )
        .unwrap();

        let start = service.start_command(&settings, &paths()).unwrap();
        assert_eq!(start.to_string(), "convox start");

        let connect = service.connect_command(None, &settings, &paths()).unwrap();
        assert_eq!(
            connect.to_string(),
            "convox run web bash --rack local/convox --app wb-social-service"
        );
    }

    #[test]
    fn test_office_container_has_no_start_command() {
        let settings = StackSettings::default();
        let service = Service::from_record(
            record("wb-notify-service", Kind::Rails, None),
            Location::OfficeRack,
            &paths(),
        )
        .unwrap();
        assert!(service.start_command(&settings, &paths()).is_none());
        assert!(service.run_command("rails c", None, &settings, &paths()).is_some());
    }

    #[test]
    fn test_prepare_copies_the_env_file_into_the_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let stack_paths = StackPaths::new(dir.path());
        let checkout = dir.path().join("services").join("wb-social-service");
        std::fs::create_dir_all(&checkout).unwrap();

        let env_source = stack_paths.env_source("wb-social-service");
        std::fs::create_dir_all(env_source.parent().unwrap()).unwrap();
        std::fs::write(&env_source, "DATABASE_URL=mysql://localhost\n").unwrap();

        let service = Service::from_record(
            record("wb-social-service", Kind::Rails, Some(3005)),
            Location::ProcessHost,
            &stack_paths,
        )
        .unwrap();
        service.prepare(&stack_paths).unwrap();

        let copied = std::fs::read_to_string(checkout.join(".env")).unwrap();
        assert_eq!(copied, "DATABASE_URL=mysql://localhost\n");
    }

    #[test]
    fn test_prepare_is_a_no_op_off_the_process_host() {
        let dir = tempfile::tempdir().unwrap();
        let stack_paths = StackPaths::new(dir.path());

        let service = Service::from_record(
            record("wb-social-service", Kind::Rails, Some(3005)),
            Location::LocalRack,
            &stack_paths,
        )
        .unwrap();
        service.prepare(&stack_paths).unwrap();

        let checkout = dir.path().join("services").join("wb-social-service");
        assert!(!checkout.join(".env").exists());
    }

    #[test]
    fn test_data_store_lives_in_superlocal() {
        let settings = StackSettings::default();
        let service = Service::data_store("mysql", &paths());
        assert_eq!(service.port(), Some(3306));
        assert_eq!(service.path(), Path::new("/stack/superlocal"));
        assert!(service.is_on_local_rack());

        let start = service.start_command(&settings, &paths()).unwrap();
        assert_eq!(start.to_string(), "docker compose up -d mysql");
        assert_eq!(start.get_current_dir(), Some(Path::new("/stack/superlocal")));
    }
}
