use crate::context::ExecutionContext;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn handle(ctx: &ExecutionContext, folder: &Path, decrypt: bool) -> Result<()> {
    let facade = ctx.facade().await?;
    println!(
        "{}",
        format!("Exporting all parameters to {}", folder.display()).green()
    );

    let report = facade.export_all_to_files(folder, decrypt).await?;

    for file in &report.files {
        println!("  {}", file.display().dimmed());
    }
    println!(
        "{}",
        format!(
            "Exported {} parameters into {} files",
            report.parameters,
            report.files.len()
        )
        .green()
    );
    Ok(())
}
