use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A JSON-typed configuration value in the shared-config table.
///
/// The table is indexed by `service`; `name` is unique within a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedConfigRecord {
    pub name: String,
    pub service: String,
    pub value: Value,
}

impl SharedConfigRecord {
    pub fn new(name: impl Into<String>, service: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            service: service.into(),
            value,
        }
    }
}

/// Location of the shared-config table, resolved from a bootstrap parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableReference(String);

impl TableReference {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self(table_name.into())
    }

    pub fn table_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
