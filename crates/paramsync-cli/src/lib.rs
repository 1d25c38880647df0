// NOTE: Command surface
//
// Command names keep their historical camelCase spelling
// (`remapKeysInEnv`, `saveParamsFile`, `putToAWSFromFile`) so existing
// scripts keep working. Every flag is optional on the command line; a
// missing value is prompted for on a terminal and falls back to its
// default otherwise. Values are resolved before any AWS client is built,
// so a missing `--service` fails fast without touching the network.

mod args;
mod commands;
pub mod context;
mod handlers;
pub mod logging;
pub mod prompt;
pub mod types;

pub use args::{Cli, Commands};
pub use commands::run;
