use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use paramsync_types::{ParameterType, SharedConfigRecord, TableReference};
use serde_json::{Map, Value};

/// A parameter as the store reports it, before it is placed in the
/// environment/service hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredParameter {
    pub full_name: String,
    pub value: String,
    pub version: i64,
    pub last_modified: Option<DateTime<Utc>>,
    pub parameter_type: ParameterType,
}

/// One call to the paginated path listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub path: String,
    pub recursive: bool,
    pub decrypt: bool,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ParameterPage {
    pub items: Vec<StoredParameter>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRequest {
    pub path: String,
    pub value: String,
    pub parameter_type: ParameterType,
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutResponse {
    pub version: i64,
    pub tier: Option<String>,
}

/// Client-side contract of the hierarchical parameter store
///
/// Responsibilities:
/// - Single reads, one page of a path listing, single writes
/// - Mapping service errors onto `Error::{NotFound, Unauthorized, AlreadyExists}`
///
/// Pagination loops, caching and fan-out live in `ParamStoreClient`.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    async fn get_parameter(&self, path: &str, decrypt: bool) -> Result<StoredParameter>;

    async fn get_parameters_by_path(&self, request: &ListRequest) -> Result<ParameterPage>;

    /// Fails with `AlreadyExists` when the path exists and `overwrite` is false
    async fn put_parameter(&self, request: &PutRequest) -> Result<PutResponse>;
}

/// Opaque cursor for the shared-config query, in JSON form
pub type ContinuationKey = Map<String, Value>;

#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub items: Vec<SharedConfigRecord>,
    pub last_evaluated_key: Option<ContinuationKey>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchPutResponse {
    /// Records the table accepted the request for but did not write
    pub unprocessed: Vec<SharedConfigRecord>,
}

/// Client-side contract of the shared-config table
#[async_trait]
pub trait ConfigTable: Send + Sync {
    /// One page of the secondary index on `service`
    async fn query_by_service(
        &self,
        table: &TableReference,
        service: &str,
        start_key: Option<&ContinuationKey>,
    ) -> Result<RecordPage>;

    async fn batch_put(
        &self,
        table: &TableReference,
        records: &[SharedConfigRecord],
    ) -> Result<BatchPutResponse>;
}
