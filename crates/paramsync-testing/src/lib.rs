//! Testing infrastructure for paramsync integration tests.
//!
//! - `TestWorld`: isolated directory, config file and environment for CLI runs
//! - `assertions`: checks against env files written by the CLI
//! - `fixtures`: sample entries and files

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use world::{CliResult, TestWorld};
