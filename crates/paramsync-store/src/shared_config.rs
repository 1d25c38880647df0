use crate::backend::{ConfigTable, ContinuationKey};
use crate::cache::PathCache;
use crate::error::{Error, Result, require_segment};
use crate::param_store::ParamStoreClient;
use crate::retry::RetryPolicy;
use paramsync_types::{SharedConfigRecord, TableReference};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Largest batch the table accepts in one write
pub const DEFAULT_BATCH_SIZE: usize = 25;

/// Where the shared-config table is announced and how it is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedConfigSettings {
    /// Service holding the bootstrap parameter
    pub bootstrap_service: String,
    /// Parameter whose value is the table name
    pub bootstrap_parameter: String,
    pub batch_size: usize,
    pub retry: RetryPolicy,
}

impl Default for SharedConfigSettings {
    fn default() -> Self {
        Self {
            bootstrap_service: "common".to_string(),
            bootstrap_parameter: "DYNAMODB_CONFIG_TABLE".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            retry: RetryPolicy::default(),
        }
    }
}

/// Final state of one batch after the retry loop
#[derive(Debug, Clone, PartialEq)]
pub enum BatchStatus {
    /// Every record was written
    Complete,
    /// The retry budget ran out with these records still unwritten
    Unprocessed(Vec<SharedConfigRecord>),
    /// The table rejected a request; `records` were still unwritten at that point
    Failed {
        message: String,
        records: Vec<SharedConfigRecord>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub index: usize,
    /// Names submitted in this batch
    pub names: Vec<String>,
    /// Resubmissions performed after the initial write
    pub retries: u32,
    pub status: BatchStatus,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self.status, BatchStatus::Complete)
    }

    /// Names that did not make it into the table
    pub fn failed_names(&self) -> Vec<String> {
        match &self.status {
            BatchStatus::Complete => Vec::new(),
            BatchStatus::Unprocessed(records) | BatchStatus::Failed { records, .. } => {
                records.iter().map(|r| r.name.clone()).collect()
            }
        }
    }
}

/// JSON-typed configuration records kept in a table indexed by service.
///
/// The table name is itself a parameter (`<root>/<env>/common/DYNAMODB_CONFIG_TABLE`
/// by default) and is looked up once per environment.
pub struct SharedConfigClient {
    params: Arc<ParamStoreClient>,
    table: Arc<dyn ConfigTable>,
    settings: SharedConfigSettings,
    tables: Mutex<HashMap<String, TableReference>>,
    cache: PathCache<SharedConfigRecord>,
}

impl SharedConfigClient {
    pub fn new(params: Arc<ParamStoreClient>, table: Arc<dyn ConfigTable>) -> Self {
        Self {
            params,
            table,
            settings: SharedConfigSettings::default(),
            tables: Mutex::new(HashMap::new()),
            cache: PathCache::default(),
        }
    }

    pub fn with_settings(mut self, settings: SharedConfigSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache = PathCache::new(ttl);
        self
    }

    pub fn settings(&self) -> &SharedConfigSettings {
        &self.settings
    }

    pub fn cache(&self) -> &PathCache<SharedConfigRecord> {
        &self.cache
    }

    fn cached_table(&self, environment: &str) -> Option<TableReference> {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(environment)
            .cloned()
    }

    pub async fn resolve_config_table_location(&self, environment: &str) -> Result<TableReference> {
        require_segment("environment", environment)?;

        if let Some(table) = self.cached_table(environment) {
            return Ok(table);
        }

        let param = self
            .params
            .get_parameter(
                environment,
                &self.settings.bootstrap_service,
                &self.settings.bootstrap_parameter,
                true,
            )
            .await?;
        let table_name = param.value.trim();
        if table_name.is_empty() {
            return Err(Error::NotFound(format!(
                "shared-config table name in {}",
                param.full_name
            )));
        }

        let table = TableReference::new(table_name);
        debug!(environment, %table, "resolved shared-config table");
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(environment.to_string(), table.clone());
        Ok(table)
    }

    pub async fn get_by_service(
        &self,
        environment: &str,
        service: &str,
    ) -> Result<BTreeMap<String, SharedConfigRecord>> {
        require_segment("environment", environment)?;
        require_segment("service", service)?;

        let path = self.params.paths().build_path(environment, service, None);
        if let Some(cached) = self.cache.get(&path) {
            debug!(%path, "shared config served from cache");
            return Ok(cached);
        }

        let table = self.resolve_config_table_location(environment).await?;
        info!(%table, service, "querying shared config");

        let mut records = BTreeMap::new();
        let mut start_key: Option<ContinuationKey> = None;
        loop {
            let page = self
                .table
                .query_by_service(&table, service, start_key.as_ref())
                .await?;
            for record in page.items {
                records.insert(record.name.clone(), record);
            }

            match page.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        self.cache.insert(path, records.clone());
        Ok(records)
    }

    /// Write `name → value` pairs for one service in batches.
    ///
    /// Null values are skipped. A batch that still has unprocessed records
    /// after the retry budget, or that the table rejects, is reported in its
    /// outcome; it does not fail the call.
    pub async fn set_by_service(
        &self,
        values: &BTreeMap<String, Value>,
        environment: &str,
        service: &str,
    ) -> Result<Vec<BatchOutcome>> {
        require_segment("environment", environment)?;
        require_segment("service", service)?;

        let table = self.resolve_config_table_location(environment).await?;

        let mut records = Vec::with_capacity(values.len());
        for (name, value) in values {
            if value.is_null() {
                warn!(name, "skipping shared config entry without a value");
                continue;
            }
            records.push(SharedConfigRecord::new(name, service, value.clone()));
        }

        info!(%table, service, count = records.len(), "writing shared config");
        let batch_size = self.settings.batch_size.max(1);
        let mut outcomes = Vec::new();
        for (index, batch) in records.chunks(batch_size).enumerate() {
            outcomes.push(self.write_batch(&table, index, batch).await);
        }

        Ok(outcomes)
    }

    async fn write_batch(
        &self,
        table: &TableReference,
        index: usize,
        batch: &[SharedConfigRecord],
    ) -> BatchOutcome {
        let names: Vec<String> = batch.iter().map(|r| r.name.clone()).collect();
        let failed = |retries: u32, err: Error, records: Vec<SharedConfigRecord>| {
            warn!(
                batch = index,
                retries,
                unwritten = records.len(),
                error = %err,
                "shared config batch failed"
            );
            BatchOutcome {
                index,
                names: names.clone(),
                retries,
                status: BatchStatus::Failed {
                    message: err.to_string(),
                    records,
                },
            }
        };

        let mut pending = match self.table.batch_put(table, batch).await {
            Ok(response) => response.unprocessed,
            Err(err) => return failed(0, err, batch.to_vec()),
        };

        let policy = &self.settings.retry;
        let mut retries = 0;
        while !pending.is_empty() && policy.should_retry(retries) {
            let delay = policy.delay(retries);
            debug!(batch = index, unprocessed = pending.len(), ?delay, "retrying unprocessed items");
            tokio::time::sleep(delay).await;
            retries += 1;

            let attempt = self.table.batch_put(table, &pending).await;
            pending = match attempt {
                Ok(response) => response.unprocessed,
                Err(err) => return failed(retries, err, pending),
            };
        }

        let status = if pending.is_empty() {
            BatchStatus::Complete
        } else {
            let leftover: Vec<&str> = pending.iter().map(|r| r.name.as_str()).collect();
            warn!(batch = index, retries, ?leftover, "items still unprocessed after retries");
            BatchStatus::Unprocessed(pending)
        };

        BatchOutcome {
            index,
            names,
            retries,
            status,
        }
    }
}
