//! devstack CLI entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use stack_config::StackPaths;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "devstack")]
#[command(about = "Devstack - developer service registry and deploy helper")]
#[command(version)]
struct Cli {
    /// Stack root directory (defaults to $DEVSTACK_ROOT, then ~/devstack)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration files
    Validate,

    /// Show all registered services
    Status,

    /// Start a service in its assigned location
    Start {
        /// Service name or pattern
        service: String,
    },

    /// Run a command inside a service's environment
    Run {
        /// Service name or pattern
        service: String,

        /// Environment name (e.g. development, staging)
        #[arg(short, long)]
        env: Option<String>,

        /// Command to run
        #[arg(last = true, required = true)]
        cmd: Vec<String>,
    },

    /// Open an interactive session inside a service's environment
    Connect {
        /// Service name or pattern
        service: String,

        /// Environment name (e.g. development, staging)
        #[arg(short, long)]
        env: Option<String>,
    },

    /// Print the domains a service is reachable under
    Domain {
        /// Service name or pattern
        service: String,

        /// Named external-domain variant
        #[arg(long)]
        variant: Option<String>,

        /// Resolve as if the service lived at this location
        #[arg(long)]
        location: Option<String>,
    },

    /// Show the resolved deploy parameters for a server
    Server {
        /// Server name from the servers table
        name: String,
    },

    /// Open an SSH session to a deploy target
    Ssh {
        /// Hostname key from the servers table
        name: String,

        /// Command to run instead of an interactive shell
        #[arg(short, long)]
        command: Option<String>,
    },

    /// Clone a service's repository into the services directory
    Checkout {
        /// Service name or pattern
        service: String,
    },

    /// Container rack management
    Rack {
        #[command(subcommand)]
        command: RackCommands,
    },
}

#[derive(Subcommand)]
enum RackCommands {
    /// List the configured racks
    List,

    /// Create a rack app for a service
    CreateApp {
        /// Service name or pattern
        service: String,
    },

    /// Delete a rack app
    DeleteApp {
        /// App name
        app: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", style("Error:").red().bold());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = StackPaths::discover(cli.root);

    match cli.command {
        Commands::Validate => commands::validate::run(&paths),
        Commands::Status => commands::status::run(&paths),
        Commands::Start { service } => commands::start::run(&paths, &service),
        Commands::Run { service, env, cmd } => {
            commands::run::run(&paths, &service, env.as_deref(), &cmd)
        }
        Commands::Connect { service, env } => {
            commands::connect::run(&paths, &service, env.as_deref())
        }
        Commands::Domain {
            service,
            variant,
            location,
        } => commands::domain::run(&paths, &service, variant.as_deref(), location.as_deref()),
        Commands::Server { name } => commands::server::run(&paths, &name),
        Commands::Ssh { name, command } => commands::ssh::run(&paths, &name, command.as_deref()),
        Commands::Checkout { service } => commands::checkout::run(&paths, &service),
        Commands::Rack { command } => match command {
            RackCommands::List => commands::rack::list(&paths),
            RackCommands::CreateApp { service } => commands::rack::create_app(&paths, &service),
            RackCommands::DeleteApp { app } => commands::rack::delete_app(&paths, &app),
        },
    }
}
