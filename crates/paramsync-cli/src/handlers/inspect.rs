use crate::context::ExecutionContext;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::collections::BTreeMap;

pub async fn handle_get_parameter(
    ctx: &ExecutionContext,
    environment: &str,
    service: &str,
    name: &str,
    decrypt: bool,
) -> Result<()> {
    let facade = ctx.facade().await?;
    let param = facade
        .get_parameter(environment, service, name, decrypt)
        .await?;

    println!("{}", param.full_name.bold());
    println!("  value:   {}", param.value);
    println!("  type:    {}", param.parameter_type);
    println!("  version: {}", param.version);
    if let Some(modified) = param.last_modified {
        println!("  updated: {}", modified.to_rfc3339());
    }
    Ok(())
}

fn print_counts(title: &str, counts: &BTreeMap<String, usize>) {
    println!("{}", title.bold());
    if counts.is_empty() {
        println!("  {}", "(none)".dimmed());
        return;
    }
    let width = counts.keys().map(String::len).max().unwrap_or(0);
    for (name, count) in counts {
        println!("  {:<width$}  {}", name, count, width = width);
    }
}

pub async fn handle_list_environments(ctx: &ExecutionContext) -> Result<()> {
    let facade = ctx.facade().await?;
    let counts = facade.list_environments().await?;
    print_counts("Environments", &counts);
    Ok(())
}

pub async fn handle_list_services(ctx: &ExecutionContext, environment: &str) -> Result<()> {
    let facade = ctx.facade().await?;
    let counts = facade.list_services(environment).await?;
    print_counts(&format!("Services in {}", environment), &counts);
    Ok(())
}
