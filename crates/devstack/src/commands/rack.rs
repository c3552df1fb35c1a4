use anyhow::{Result, bail};
use command_runner::Command;
use comfy_table::Table;
use stack_config::StackPaths;
use stack_registry::Stack;

pub fn list(paths: &StackPaths) -> Result<()> {
    let stack = Stack::load(paths.clone())?;

    let mut table = Table::new();
    table.set_header(vec!["NAME", "RACK", ""]);
    for (name, rack) in &stack.settings().racks {
        let marker = if *rack == stack.settings().local_rack {
            "(local)"
        } else {
            ""
        };
        table.add_row(vec![name.clone(), rack.clone(), marker.to_string()]);
    }

    println!("{table}");
    Ok(())
}

pub fn create_app(paths: &StackPaths, pattern: &str) -> Result<()> {
    let stack = Stack::load(paths.clone())?;
    let service = stack.registry().find(pattern)?;

    if !service.is_on_local_rack() {
        bail!(
            "service '{}' is on {}, not the local rack",
            service.name(),
            service.location()
        );
    }

    let mut command = Command::new("convox");
    command
        .args(["apps", "create", service.name()])
        .current_dir(service.path());

    if !command.run_interactive()? {
        bail!("failed to create rack app '{}'", service.name());
    }
    Ok(())
}

pub fn delete_app(_paths: &StackPaths, app: &str) -> Result<()> {
    // Takes the app name as-is so stale apps without a config entry can
    // still be removed.
    let mut command = Command::new("convox");
    command.args(["apps", "delete", app]);

    if !command.run_interactive()? {
        bail!("failed to delete rack app '{app}'");
    }
    Ok(())
}
