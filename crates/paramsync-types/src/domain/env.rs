use serde::{Deserialize, Serialize};

/// One `key=value` line of an env file, or one process environment variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
}

impl EnvEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for EnvEntry {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}
