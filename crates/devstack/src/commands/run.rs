use anyhow::{Result, bail};
use stack_config::StackPaths;
use stack_registry::Stack;

pub fn run(
    paths: &StackPaths,
    pattern: &str,
    environment: Option<&str>,
    cmd: &[String],
) -> Result<()> {
    let stack = Stack::load(paths.clone())?;
    let service = stack.registry().find(pattern)?;
    let cmd = cmd.join(" ");

    let Some(command) = service.run_command(&cmd, environment, stack.settings(), stack.paths())
    else {
        bail!(
            "service '{}' on {} does not support running commands",
            service.name(),
            service.location()
        );
    };

    if !command.run_interactive()? {
        bail!("command failed in '{}'", service.name());
    }
    Ok(())
}
