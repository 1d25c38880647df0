use crate::context::ExecutionContext;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub struct PutOptions {
    pub overwrite: bool,
    pub encrypt: bool,
}

pub async fn handle(
    ctx: &ExecutionContext,
    infile: &Path,
    environment: &str,
    service: &str,
    options: PutOptions,
) -> Result<()> {
    let facade = ctx.facade().await?;
    let path = facade.service_path(environment, service);
    println!(
        "{}",
        format!("Reading params from file: {}", infile.display()).green()
    );

    let report = facade
        .put_file_to_store(
            infile,
            environment,
            service,
            options.overwrite,
            options.encrypt,
        )
        .await?;

    for outcome in &report.outcomes {
        if let Err(err) = &outcome.result {
            println!("  {} {}: {}", "✗".red(), outcome.key, err);
        }
    }
    println!(
        "{}",
        format!(
            "Saved {} of {} parameters to AWS for \"{}\"",
            report.written(),
            report.outcomes.len(),
            path
        )
        .green()
    );

    report.ensure_complete()?;
    Ok(())
}
