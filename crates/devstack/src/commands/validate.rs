use anyhow::{Context, Result};
use console::style;
use stack_config::StackPaths;
use stack_registry::Stack;

pub fn run(paths: &StackPaths) -> Result<()> {
    println!("Validating stack at {}...", paths.root().display());

    let stack = Stack::load(paths.clone()).context("Failed to load stack configuration")?;

    println!("{} Configuration valid", style("✓").green());
    println!("  Config type: {}", stack.settings().config_type);
    println!("  Local rack: {}", stack.settings().local_rack);
    println!("  Services: {}", stack.registry().len());
    println!("  Servers: {}", stack.servers().servers.len());
    Ok(())
}
