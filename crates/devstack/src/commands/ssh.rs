use anyhow::{Result, bail};
use command_runner::Command;
use console::style;
use stack_config::StackPaths;
use stack_registry::Stack;

pub fn run(paths: &StackPaths, name: &str, remote_command: Option<&str>) -> Result<()> {
    let stack = Stack::load(paths.clone())?;
    let config = stack.deploy().ssh_config(name)?;

    println!(
        "Connecting to {}",
        style(format!("{}@{}", config.user, config.hostname)).green()
    );

    let mut command = Command::new("ssh");
    command
        .arg("-i")
        .arg(&config.key)
        .arg(format!("{}@{}", config.user, config.hostname))
        .arg("-p")
        .arg(config.port.to_string());
    if let Some(remote) = remote_command {
        command.arg("-t").arg(remote);
    }

    if !command.run_interactive()? {
        bail!("ssh to '{name}' failed");
    }
    Ok(())
}
