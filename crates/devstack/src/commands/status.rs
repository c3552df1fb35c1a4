use anyhow::Result;
use comfy_table::Table;
use stack_config::StackPaths;
use stack_registry::Stack;

pub fn run(paths: &StackPaths) -> Result<()> {
    let stack = Stack::load(paths.clone())?;
    let domains = stack.domains();

    let mut table = Table::new();
    table.set_header(vec!["SERVICE", "LOCATION", "KIND", "PORT", "DOMAIN"]);

    for service in stack.registry().iter() {
        let port = service
            .port()
            .map(|port| port.to_string())
            .unwrap_or_else(|| "-".to_string());
        let domain = domains
            .internal_domain(service.name(), None)
            .unwrap_or_else(|_| "-".to_string());

        table.add_row(vec![
            service.name().to_string(),
            service.location().to_string(),
            service.kind().to_string(),
            port,
            domain,
        ]);
    }

    println!("{table}");
    Ok(())
}
