use std::fmt;

/// Result type for paramsync-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of failures, shared with the layers above
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    AlreadyExists,
    ValidationError,
    PartialFailure,
    IoError,
    Remote,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::AlreadyExists => "already exists",
            ErrorKind::ValidationError => "validation error",
            ErrorKind::PartialFailure => "partial failure",
            ErrorKind::IoError => "io error",
            ErrorKind::Remote => "remote error",
        };
        write!(f, "{}", name)
    }
}

/// Error types that can occur in the store layer
#[derive(Debug)]
pub enum Error {
    /// No parameter or record at the given path
    NotFound(String),

    /// The store denied access
    Unauthorized(String),

    /// Write refused because the name exists and overwrite was not allowed
    AlreadyExists(String),

    /// Missing or malformed input (environment, service, name)
    Validation(String),

    /// Any other failure reported by the backing service
    Remote(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Unauthorized(_) => ErrorKind::Unauthorized,
            Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Error::Validation(_) => ErrorKind::ValidationError,
            Error::Remote(_) => ErrorKind::Remote,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(what) => write!(f, "Not found: {}", what),
            Error::Unauthorized(msg) => write!(f, "Access denied: {}", msg),
            Error::AlreadyExists(what) => {
                write!(f, "Already exists (use --overwrite to replace): {}", what)
            }
            Error::Validation(msg) => write!(f, "Invalid input: {}", msg),
            Error::Remote(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Reject empty environment/service/name arguments before they reach a path.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Environment and service occupy exactly one path segment each.
pub(crate) fn require_segment(field: &str, value: &str) -> Result<()> {
    require(field, value)?;
    if value.contains('/') {
        return Err(Error::Validation(format!(
            "{} must be a single path segment, got {:?}",
            field, value
        )));
    }
    Ok(())
}
