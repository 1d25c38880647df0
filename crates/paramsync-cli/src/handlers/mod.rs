pub mod export;
pub mod inspect;
pub mod put_params;
pub mod remap;
pub mod save_params;
pub mod shared_config;
