use anyhow::Result;
use stack_config::{Location, StackPaths};
use stack_registry::Stack;

pub fn run(
    paths: &StackPaths,
    pattern: &str,
    variant: Option<&str>,
    location: Option<&str>,
) -> Result<()> {
    let stack = Stack::load(paths.clone())?;
    let service = stack.registry().find(pattern)?;
    let location = location.map(str::parse::<Location>).transpose()?;
    let domains = stack.domains();

    println!(
        "internal: {}",
        domains.internal_domain(service.name(), location)?
    );

    match domains.external_domain(service.name(), variant, location)? {
        Some(external) => println!("external: {external}"),
        None => println!("external: (none configured)"),
    }

    if service.is_on_local_rack() {
        println!("rack:     {}", domains.rack_domain(service.name()));
    }

    Ok(())
}
