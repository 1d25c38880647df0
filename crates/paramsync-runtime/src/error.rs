use paramsync_store::ErrorKind;
use std::fmt;

/// Result type for paramsync-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Parameter store or shared-config table error
    Store(paramsync_store::Error),

    /// Env file codec error
    Core(paramsync_core::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Shared-config file is not valid JSON
    Json(serde_json::Error),

    /// Configuration error
    Config(String),

    /// Missing or malformed command input
    Validation(String),

    /// Some entries or batches were not written
    PartialFailure { failed: Vec<String> },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Store(err) => err.kind(),
            Error::Core(_) | Error::Io(_) => ErrorKind::IoError,
            Error::Json(_) | Error::Config(_) | Error::Validation(_) => ErrorKind::ValidationError,
            Error::PartialFailure { .. } => ErrorKind::PartialFailure,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(err) => write!(f, "{}", err),
            Error::Core(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Validation(msg) => write!(f, "Invalid input: {}", msg),
            Error::PartialFailure { failed } => {
                write!(f, "{} item(s) failed: {}", failed.len(), failed.join(", "))
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(err) => Some(err),
            Error::Core(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Config(_) | Error::Validation(_) | Error::PartialFailure { .. } => None,
        }
    }
}

impl From<paramsync_store::Error> for Error {
    fn from(err: paramsync_store::Error) -> Self {
        Error::Store(err)
    }
}

impl From<paramsync_core::Error> for Error {
    fn from(err: paramsync_core::Error) -> Self {
        Error::Core(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
