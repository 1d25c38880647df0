use crate::types::LogLevel;
use tracing_subscriber::EnvFilter;

const CRATES: [&str; 5] = [
    "paramsync",
    "paramsync_cli",
    "paramsync_runtime",
    "paramsync_store",
    "paramsync_core",
];

/// Filter applying `level` to this workspace and `warn` to dependencies
pub fn filter_for(level: LogLevel) -> EnvFilter {
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|name| format!("{}={}", name, level)));
    EnvFilter::new(directives.join(","))
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--log-level` when set.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
