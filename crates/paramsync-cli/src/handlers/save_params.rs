use crate::context::ExecutionContext;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn handle(
    ctx: &ExecutionContext,
    environment: &str,
    service: &str,
    outfile: &Path,
) -> Result<()> {
    let facade = ctx.facade().await?;
    let path = facade.service_path(environment, service);
    println!(
        "{}",
        format!("Saving '{}' out to {}", path, outfile.display()).green()
    );

    let count = facade.save_params_file(environment, service, outfile).await?;

    println!(
        "{}",
        format!("Saved {} parameters to {}", count, outfile.display()).green()
    );
    Ok(())
}
