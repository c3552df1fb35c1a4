use anyhow::{Result, bail};
use console::style;
use stack_config::StackPaths;
use stack_registry::Stack;

pub fn run(paths: &StackPaths, pattern: &str, environment: Option<&str>) -> Result<()> {
    let stack = Stack::load(paths.clone())?;
    let service = stack.registry().find(pattern)?;

    let Some(command) = service.connect_command(environment, stack.settings(), stack.paths())
    else {
        bail!(
            "service '{}' on {} does not support interactive sessions",
            service.name(),
            service.location()
        );
    };

    println!("Connecting to {}...", style(service.name()).green());
    command.run_interactive()?;
    Ok(())
}
