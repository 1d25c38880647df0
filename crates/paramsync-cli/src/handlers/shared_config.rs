use crate::context::ExecutionContext;
use anyhow::Result;
use owo_colors::OwoColorize;
use paramsync_runtime::ensure_batches_complete;
use std::path::Path;

pub async fn handle_get(
    ctx: &ExecutionContext,
    environment: &str,
    service: &str,
    outfile: &Path,
) -> Result<()> {
    let facade = ctx.facade().await?;
    let count = facade
        .get_shared_config_to_file(environment, service, outfile)
        .await?;

    println!(
        "{}",
        format!(
            "Saved {} shared config values for {}/{} to {}",
            count,
            environment,
            service,
            outfile.display()
        )
        .green()
    );
    Ok(())
}

pub async fn handle_put(
    ctx: &ExecutionContext,
    infile: &Path,
    environment: &str,
    service: &str,
) -> Result<()> {
    let facade = ctx.facade().await?;
    let outcomes = facade
        .put_shared_config_from_file(infile, environment, service)
        .await?;

    let written: usize = outcomes
        .iter()
        .map(|o| o.names.len() - o.failed_names().len())
        .sum();
    for outcome in outcomes.iter().filter(|o| !o.is_complete()) {
        println!(
            "  {} batch {}: {} not written",
            "✗".red(),
            outcome.index,
            outcome.failed_names().join(", ")
        );
    }
    println!(
        "{}",
        format!(
            "Wrote {} shared config values for {}/{} in {} batches",
            written,
            environment,
            service,
            outcomes.len()
        )
        .green()
    );

    ensure_batches_complete(&outcomes)?;
    Ok(())
}
