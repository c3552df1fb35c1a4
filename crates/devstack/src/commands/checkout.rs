use anyhow::{Result, bail};
use command_runner::Command;
use console::style;
use stack_config::StackPaths;
use stack_registry::Stack;

pub fn run(paths: &StackPaths, pattern: &str) -> Result<()> {
    let stack = Stack::load(paths.clone())?;
    let service = stack.registry().find(pattern)?;

    let Some(gitname) = service.gitname() else {
        bail!("service '{}' has no git repository configured", service.name());
    };

    println!(
        "Cloning {} from {}",
        style(service.name()).green(),
        style(gitname).green()
    );

    let services_dir = stack.paths().services();
    std::fs::create_dir_all(&services_dir)?;

    let mut command = Command::new("git");
    command
        .arg("clone")
        .arg(format!("git@github.com:wbetterdev/{gitname}.git"))
        .arg(service.name())
        .current_dir(&services_dir);

    if !command.run_interactive()? {
        bail!("clone of '{}' failed", service.name());
    }
    Ok(())
}
