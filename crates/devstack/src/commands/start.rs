use anyhow::{Context, Result, bail};
use console::style;
use stack_config::StackPaths;
use stack_registry::Stack;

pub fn run(paths: &StackPaths, pattern: &str) -> Result<()> {
    let stack = Stack::load(paths.clone()).context("Failed to load stack configuration")?;
    let service = stack.registry().find(pattern)?;

    let Some(command) = service.start_command(stack.settings(), stack.paths()) else {
        bail!(
            "service '{}' on {} has no start command",
            service.name(),
            service.location()
        );
    };

    service.prepare(stack.paths())?;

    println!("Starting {}...", style(service.name()).green());
    if !command.run_interactive()? {
        bail!("failed to start '{}'", service.name());
    }
    Ok(())
}
