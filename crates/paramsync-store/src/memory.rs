//! In-process backends for offline runs and tests.
//!
//! Both keep their data behind a mutex, page their listings like the real
//! services do, and record the requests they receive so callers can check
//! how many round trips an operation took.

use crate::backend::{
    BatchPutResponse, ConfigTable, ContinuationKey, ListRequest, ParameterPage, ParameterStore,
    PutRequest, PutResponse, RecordPage, StoredParameter,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use paramsync_types::{ParameterType, SharedConfigRecord, TableReference};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Value returned for secrets read without decryption
pub const ENCRYPTED_PLACEHOLDER: &str = "<encrypted>";

const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Default)]
struct ParameterState {
    params: BTreeMap<String, StoredParameter>,
    denied_prefixes: Vec<String>,
    get_requests: usize,
    list_tokens: Vec<Option<String>>,
    put_requests: usize,
    fail_list_after: Option<usize>,
}

/// Parameter store kept in memory, paged `page_size` items at a time
pub struct InMemoryParameterStore {
    state: Mutex<ParameterState>,
    page_size: usize,
}

impl Default for InMemoryParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryParameterStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            state: Mutex::new(ParameterState::default()),
            page_size: page_size.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ParameterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a parameter directly, bypassing the request counters
    pub fn insert(&self, full_name: &str, value: &str, parameter_type: ParameterType) {
        let mut state = self.lock();
        let version = state.params.get(full_name).map_or(1, |p| p.version + 1);
        state.params.insert(
            full_name.to_string(),
            StoredParameter {
                full_name: full_name.to_string(),
                value: value.to_string(),
                version,
                last_modified: Some(Utc::now()),
                parameter_type,
            },
        );
    }

    pub fn stored(&self, full_name: &str) -> Option<StoredParameter> {
        self.lock().params.get(full_name).cloned()
    }

    /// Refuse every request touching paths under `prefix`
    pub fn deny(&self, prefix: &str) {
        self.lock().denied_prefixes.push(prefix.to_string());
    }

    /// Let `pages` listing requests succeed, then fail every later one
    pub fn fail_listing_after(&self, pages: usize) {
        self.lock().fail_list_after = Some(pages);
    }

    pub fn get_requests(&self) -> usize {
        self.lock().get_requests
    }

    pub fn list_requests(&self) -> usize {
        self.lock().list_tokens.len()
    }

    /// Continuation token sent with each listing request, in order
    pub fn list_tokens(&self) -> Vec<Option<String>> {
        self.lock().list_tokens.clone()
    }

    pub fn put_requests(&self) -> usize {
        self.lock().put_requests
    }

    pub fn total_requests(&self) -> usize {
        let state = self.lock();
        state.get_requests + state.list_tokens.len() + state.put_requests
    }
}

fn check_access(state: &ParameterState, path: &str) -> Result<()> {
    if state
        .denied_prefixes
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
    {
        return Err(Error::Unauthorized(path.to_string()));
    }
    Ok(())
}

fn reveal(param: &StoredParameter, decrypt: bool) -> StoredParameter {
    let mut param = param.clone();
    if param.parameter_type.is_secret() && !decrypt {
        param.value = ENCRYPTED_PLACEHOLDER.to_string();
    }
    param
}

fn in_scope(scope: &str, name: &str, recursive: bool) -> bool {
    let prefix = if scope.ends_with('/') {
        scope.to_string()
    } else {
        format!("{}/", scope)
    };
    match name.strip_prefix(prefix.as_str()) {
        Some(rest) => !rest.is_empty() && (recursive || !rest.contains('/')),
        None => false,
    }
}

#[async_trait]
impl ParameterStore for InMemoryParameterStore {
    async fn get_parameter(&self, path: &str, decrypt: bool) -> Result<StoredParameter> {
        let mut state = self.lock();
        state.get_requests += 1;
        check_access(&state, path)?;
        state
            .params
            .get(path)
            .map(|p| reveal(p, decrypt))
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }

    async fn get_parameters_by_path(&self, request: &ListRequest) -> Result<ParameterPage> {
        let mut state = self.lock();
        state.list_tokens.push(request.next_token.clone());
        check_access(&state, &request.path)?;

        if let Some(limit) = state.fail_list_after
            && state.list_tokens.len() > limit
        {
            return Err(Error::Remote(format!(
                "listing {} failed (injected)",
                request.path
            )));
        }

        let offset = match &request.next_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| Error::Validation(format!("invalid next token: {}", token)))?,
            None => 0,
        };

        let matching: Vec<&StoredParameter> = state
            .params
            .values()
            .filter(|p| in_scope(&request.path, &p.full_name, request.recursive))
            .collect();
        let end = (offset + self.page_size).min(matching.len());
        let items = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|p| reveal(p, request.decrypt))
            .collect();
        let next_token = (end < matching.len()).then(|| end.to_string());

        Ok(ParameterPage { items, next_token })
    }

    async fn put_parameter(&self, request: &PutRequest) -> Result<PutResponse> {
        let mut state = self.lock();
        state.put_requests += 1;
        check_access(&state, &request.path)?;

        let existing = state.params.get(&request.path).map(|p| p.version);
        if existing.is_some() && !request.overwrite {
            return Err(Error::AlreadyExists(request.path.clone()));
        }

        let version = existing.map_or(1, |v| v + 1);
        state.params.insert(
            request.path.clone(),
            StoredParameter {
                full_name: request.path.clone(),
                value: request.value.clone(),
                version,
                last_modified: Some(Utc::now()),
                parameter_type: request.parameter_type,
            },
        );

        Ok(PutResponse {
            version,
            tier: Some("Standard".to_string()),
        })
    }
}

/// Outcome scripted for the next batch write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchScript {
    /// Leave the last `n` records of the request unwritten
    Unprocessed(usize),
    /// Reject the whole request
    Fail,
}

#[derive(Default)]
struct TableState {
    tables: HashMap<String, BTreeMap<(String, String), Value>>,
    query_requests: usize,
    batch_sizes: Vec<usize>,
    script: VecDeque<BatchScript>,
}

/// Shared-config table kept in memory.
///
/// Records are keyed by `(service, name)`; queries page in name order.
pub struct InMemoryConfigTable {
    state: Mutex<TableState>,
    page_size: usize,
}

impl Default for InMemoryConfigTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConfigTable {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            state: Mutex::new(TableState::default()),
            page_size: page_size.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, table: &str, record: SharedConfigRecord) {
        self.lock()
            .tables
            .entry(table.to_string())
            .or_default()
            .insert((record.service, record.name), record.value);
    }

    pub fn records(&self, table: &str, service: &str) -> BTreeMap<String, Value> {
        self.lock()
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|((svc, _), _)| svc == service)
                    .map(|((_, name), value)| (name.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Report the last `count` records of the next batch write as unprocessed
    pub fn push_unprocessed(&self, count: usize) {
        self.lock().script.push_back(BatchScript::Unprocessed(count));
    }

    /// Reject the next batch write
    pub fn push_failure(&self) {
        self.lock().script.push_back(BatchScript::Fail);
    }

    pub fn query_requests(&self) -> usize {
        self.lock().query_requests
    }

    /// Number of records submitted with each batch write, in order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.lock().batch_sizes.clone()
    }
}

#[async_trait]
impl ConfigTable for InMemoryConfigTable {
    async fn query_by_service(
        &self,
        table: &TableReference,
        service: &str,
        start_key: Option<&ContinuationKey>,
    ) -> Result<RecordPage> {
        let mut state = self.lock();
        state.query_requests += 1;

        let after = start_key
            .and_then(|key| key.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let Some(rows) = state.tables.get(table.table_name()) else {
            return Err(Error::NotFound(format!("table {}", table)));
        };

        let matching: Vec<SharedConfigRecord> = rows
            .iter()
            .filter(|((svc, name), _)| {
                svc == service && after.as_ref().is_none_or(|after| name > after)
            })
            .map(|((svc, name), value)| SharedConfigRecord::new(name, svc, value.clone()))
            .collect();

        let has_more = matching.len() > self.page_size;
        let items: Vec<SharedConfigRecord> = matching.into_iter().take(self.page_size).collect();
        let last_evaluated_key = match items.last() {
            Some(last) if has_more => {
                let mut key = ContinuationKey::new();
                key.insert("service".to_string(), Value::String(last.service.clone()));
                key.insert("name".to_string(), Value::String(last.name.clone()));
                Some(key)
            }
            _ => None,
        };

        Ok(RecordPage {
            items,
            last_evaluated_key,
        })
    }

    async fn batch_put(
        &self,
        table: &TableReference,
        records: &[SharedConfigRecord],
    ) -> Result<BatchPutResponse> {
        let mut state = self.lock();
        state.batch_sizes.push(records.len());

        let withheld = match state.script.pop_front() {
            Some(BatchScript::Fail) => {
                return Err(Error::Remote(format!(
                    "batch write to {} failed (injected)",
                    table
                )));
            }
            Some(BatchScript::Unprocessed(count)) => count.min(records.len()),
            None => 0,
        };

        let (written, unprocessed) = records.split_at(records.len() - withheld);
        let rows = state
            .tables
            .entry(table.table_name().to_string())
            .or_default();
        for record in written {
            rows.insert(
                (record.service.clone(), record.name.clone()),
                record.value.clone(),
            );
        }

        Ok(BatchPutResponse {
            unprocessed: unprocessed.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_scope() {
        assert!(in_scope("/torc/dev/api", "/torc/dev/api/KEY", false));
        assert!(!in_scope("/torc/dev/api", "/torc/dev/api/nested/KEY", false));
        assert!(in_scope("/torc/dev/api", "/torc/dev/api/nested/KEY", true));
        assert!(!in_scope("/torc/dev/api", "/torc/dev/apix/KEY", true));
        assert!(in_scope("/", "/torc/dev/api/KEY", true));
    }

    #[tokio::test]
    async fn test_secret_hidden_without_decrypt() {
        let store = InMemoryParameterStore::new();
        store.insert("/torc/dev/api/TOKEN", "s3cret", ParameterType::Secret);

        let raw = store.get_parameter("/torc/dev/api/TOKEN", false).await.unwrap();
        assert_eq!(raw.value, ENCRYPTED_PLACEHOLDER);

        let decrypted = store.get_parameter("/torc/dev/api/TOKEN", true).await.unwrap();
        assert_eq!(decrypted.value, "s3cret");
    }

    #[tokio::test]
    async fn test_query_unknown_table_is_not_found() {
        let table = InMemoryConfigTable::new();
        let err = table
            .query_by_service(&TableReference::new("missing"), "api", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
