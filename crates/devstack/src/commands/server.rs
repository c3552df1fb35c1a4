use anyhow::Result;
use stack_config::StackPaths;
use stack_registry::Stack;

pub fn run(paths: &StackPaths, name: &str) -> Result<()> {
    let stack = Stack::load(paths.clone())?;
    let deploy = stack.deploy();
    let config = deploy.deploy_config(name)?;

    println!("user:        {}", config.user);
    println!("key:         {}", config.key);
    println!("port:        {}", config.port);
    if let Some(deploy_path) = &config.deploy_path {
        println!("deploy path: {deploy_path}");
    }
    if let Some(zip_name) = &config.zip_name {
        println!("zip name:    {zip_name}");
    }
    for address in &config.hostnames {
        match deploy.key_for_address(address) {
            Some(key) => println!("host:        {address} ({key})"),
            None => println!("host:        {address}"),
        }
    }
    Ok(())
}
