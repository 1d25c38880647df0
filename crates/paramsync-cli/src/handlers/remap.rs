use anyhow::Result;
use owo_colors::OwoColorize;
use paramsync_core::load_into_environment;
use paramsync_runtime::ConfigFacade;
use std::path::Path;

/// Runs before any async runtime exists, so the process is still
/// single-threaded when the environment is updated.
pub fn handle(outfile: &Path, old_prefix: &str, new_prefix: &str) -> Result<()> {
    println!("{}", "Remapping keys in env".green());

    let remapped = ConfigFacade::remap_prefix_and_save(None, old_prefix, new_prefix, outfile)?;

    // SAFETY: no other threads are running at this point.
    unsafe { load_into_environment(&remapped) };

    println!(
        "{}",
        format!(
            "Saved {} parameters to {}",
            remapped.len(),
            outfile.display()
        )
        .green()
    );
    Ok(())
}
