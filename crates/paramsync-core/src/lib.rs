pub mod env_codec;
pub mod environment;
pub mod error;
pub mod path;

pub use env_codec::{
    SPECIAL_CHARS, decode, encode, quote, read_env_file, remap_prefix, unquote, write_env_file,
};
pub use environment::{EnvironmentSnapshot, load_into_environment};
pub use error::{Error, Result};
pub use path::{DEFAULT_ROOT, ParsedPath, PathBuilder};
