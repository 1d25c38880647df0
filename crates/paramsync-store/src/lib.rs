// NOTE: Store layer layout
//
// Clients (ParamStoreClient, SharedConfigClient) hold the invariants:
// path construction, full pagination, cache population only after a
// complete listing, per-entry write outcomes, batched retry with backoff.
// Backends (ParameterStore, ConfigTable) are thin request/response adapters
// over SSM, DynamoDB, or in-memory state and never cache or retry.

pub mod aws;
pub mod backend;
pub mod cache;
pub mod error;
pub mod memory;
pub mod param_store;
pub mod retry;
pub mod shared_config;

pub use backend::{
    BatchPutResponse, ConfigTable, ContinuationKey, ListRequest, ParameterPage, ParameterStore,
    PutRequest, PutResponse, RecordPage, StoredParameter,
};
pub use cache::PathCache;
pub use error::{Error, ErrorKind, Result};
pub use memory::{InMemoryConfigTable, InMemoryParameterStore};
pub use param_store::{EntryOutcome, ParamStoreClient, ParameterWrite};
pub use retry::RetryPolicy;
pub use shared_config::{BatchOutcome, BatchStatus, SharedConfigClient, SharedConfigSettings};
