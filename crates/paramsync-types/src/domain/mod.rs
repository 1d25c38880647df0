pub mod env;
pub mod parameter;
pub mod shared_config;

pub use env::*;
pub use parameter::*;
pub use shared_config::*;
