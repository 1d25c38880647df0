pub mod config;
pub mod error;
pub mod facade;

pub use config::{AwsConfig, Config, SharedConfigSection, StoreConfig, resolve_config_path};
pub use error::{Error, Result};
pub use facade::{ConfigFacade, ExportReport, WriteReport, ensure_batches_complete};
