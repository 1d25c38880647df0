use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage class of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Stored as cleartext (`String` / `StringList` in SSM)
    #[default]
    Plain,
    /// Stored encrypted (`SecureString` in SSM)
    Secret,
}

impl ParameterType {
    pub fn from_encrypted(encrypted: bool) -> Self {
        if encrypted {
            ParameterType::Secret
        } else {
            ParameterType::Plain
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, ParameterType::Secret)
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterType::Plain => write!(f, "plain"),
            ParameterType::Secret => write!(f, "secret"),
        }
    }
}

/// One named configuration value in the hierarchical store.
///
/// `full_name` is the identity (the complete path). `name` is the part of
/// the path below the `<root>/<environment>/<service>` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub full_name: String,
    pub value: String,
    pub version: i64,
    pub last_modified: Option<DateTime<Utc>>,
    pub parameter_type: ParameterType,
}
