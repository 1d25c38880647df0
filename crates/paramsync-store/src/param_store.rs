use crate::backend::{ListRequest, ParameterStore, PutRequest, StoredParameter};
use crate::cache::PathCache;
use crate::error::{Result, require, require_segment};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use paramsync_core::PathBuilder;
use paramsync_types::{EnvEntry, Parameter, ParameterType};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default number of parameter writes in flight at once
pub const DEFAULT_WRITE_CONCURRENCY: usize = 4;

/// All parameters under the root: environment → service → name → parameter
pub type ParameterTree = BTreeMap<String, BTreeMap<String, BTreeMap<String, Parameter>>>;

/// One entry of a multi-parameter write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterWrite {
    pub entry: EnvEntry,
    pub encrypted: bool,
    pub overwrite: bool,
}

impl ParameterWrite {
    pub fn new(entry: EnvEntry, encrypted: bool, overwrite: bool) -> Self {
        Self {
            entry,
            encrypted,
            overwrite,
        }
    }
}

/// Result of writing one entry; failures stay local to their entry
#[derive(Debug)]
pub struct EntryOutcome {
    pub key: String,
    pub result: Result<Parameter>,
}

impl EntryOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Reads and writes parameters under `<root>/<environment>/<service>`.
///
/// Service listings are cached per exact path, separately for decrypted
/// and raw reads, and only after every page was fetched.
pub struct ParamStoreClient {
    store: Arc<dyn ParameterStore>,
    paths: PathBuilder,
    decrypted: PathCache<Parameter>,
    raw: PathCache<Parameter>,
    write_concurrency: usize,
}

impl ParamStoreClient {
    pub fn new(store: Arc<dyn ParameterStore>) -> Self {
        Self {
            store,
            paths: PathBuilder::default(),
            decrypted: PathCache::default(),
            raw: PathCache::default(),
            write_concurrency: DEFAULT_WRITE_CONCURRENCY,
        }
    }

    pub fn with_paths(mut self, paths: PathBuilder) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.decrypted = PathCache::new(ttl);
        self.raw = PathCache::new(ttl);
        self
    }

    pub fn with_write_concurrency(mut self, limit: usize) -> Self {
        self.write_concurrency = limit.max(1);
        self
    }

    pub fn paths(&self) -> &PathBuilder {
        &self.paths
    }

    /// Cache backing `get_parameters_by_service` for the given decrypt mode
    pub fn cache(&self, decrypt: bool) -> &PathCache<Parameter> {
        if decrypt { &self.decrypted } else { &self.raw }
    }

    pub fn clear_cache(&self) {
        self.decrypted.clear();
        self.raw.clear();
    }

    fn to_parameter(&self, stored: StoredParameter) -> Parameter {
        let name = self
            .paths
            .parse(&stored.full_name)
            .and_then(|parsed| parsed.name)
            .unwrap_or_else(|| {
                stored
                    .full_name
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });

        Parameter {
            name,
            full_name: stored.full_name,
            value: stored.value,
            version: stored.version,
            last_modified: stored.last_modified,
            parameter_type: stored.parameter_type,
        }
    }

    pub async fn get_parameter(
        &self,
        environment: &str,
        service: &str,
        name: &str,
        decrypt: bool,
    ) -> Result<Parameter> {
        require_segment("environment", environment)?;
        require_segment("service", service)?;
        require("parameter name", name)?;

        let path = self.paths.build_path(environment, service, Some(name));
        debug!(%path, "reading parameter");
        let stored = self.store.get_parameter(&path, decrypt).await?;
        Ok(self.to_parameter(stored))
    }

    /// Fetch every page under `path`, following the continuation token until
    /// the store stops returning one.
    async fn list_path(&self, path: &str, decrypt: bool) -> Result<Vec<StoredParameter>> {
        let mut items = Vec::new();
        let mut request = ListRequest {
            path: path.to_string(),
            recursive: true,
            decrypt,
            next_token: None,
        };
        let mut pages = 0usize;

        loop {
            let page = self.store.get_parameters_by_path(&request).await?;
            pages += 1;
            items.extend(page.items);

            match page.next_token {
                Some(token) if !token.is_empty() => request.next_token = Some(token),
                _ => break,
            }
        }

        debug!(path, pages, count = items.len(), "listed parameters");
        Ok(items)
    }

    pub async fn get_parameters_by_service(
        &self,
        environment: &str,
        service: &str,
        decrypt: bool,
    ) -> Result<BTreeMap<String, Parameter>> {
        require_segment("environment", environment)?;
        require_segment("service", service)?;

        let path = self.paths.build_path(environment, service, None);
        let cache = self.cache(decrypt);
        if let Some(cached) = cache.get(&path) {
            debug!(%path, "parameter listing served from cache");
            return Ok(cached);
        }

        info!(%path, "getting parameters");
        let listing: BTreeMap<String, Parameter> = self
            .list_path(&path, decrypt)
            .await?
            .into_iter()
            .map(|stored| {
                let param = self.to_parameter(stored);
                (param.name.clone(), param)
            })
            .collect();

        cache.insert(path, listing.clone());
        Ok(listing)
    }

    pub async fn set_parameter(
        &self,
        entry: &EnvEntry,
        environment: &str,
        service: &str,
        encrypted: bool,
        overwrite: bool,
    ) -> Result<Parameter> {
        require_segment("environment", environment)?;
        require_segment("service", service)?;
        require("parameter name", &entry.key)?;

        let path = self.paths.build_path(environment, service, Some(&entry.key));
        let parameter_type = ParameterType::from_encrypted(encrypted);
        info!(%path, %parameter_type, overwrite, "setting parameter");

        let response = self
            .store
            .put_parameter(&PutRequest {
                path: path.clone(),
                value: entry.value.clone(),
                parameter_type,
                overwrite,
            })
            .await?;

        debug!(%path, version = response.version, tier = ?response.tier, "parameter stored");
        Ok(Parameter {
            name: entry.key.clone(),
            full_name: path,
            value: entry.value.clone(),
            version: response.version,
            last_modified: Some(Utc::now()),
            parameter_type,
        })
    }

    /// Write each entry independently.
    ///
    /// Up to `write_concurrency` writes are in flight; every write has
    /// resolved by the time this returns. Outcomes are in input order.
    pub async fn set_parameters_by_service(
        &self,
        writes: &[ParameterWrite],
        environment: &str,
        service: &str,
    ) -> Vec<EntryOutcome> {
        info!(environment, service, count = writes.len(), "setting parameters");

        let outcomes: Vec<EntryOutcome> = stream::iter(writes)
            .map(|write| async move {
                let result = self
                    .set_parameter(
                        &write.entry,
                        environment,
                        service,
                        write.encrypted,
                        write.overwrite,
                    )
                    .await;
                if let Err(err) = &result {
                    warn!(key = %write.entry.key, error = %err, "parameter write failed");
                }
                EntryOutcome {
                    key: write.entry.key.clone(),
                    result,
                }
            })
            .buffered(self.write_concurrency)
            .collect()
            .await;

        outcomes
    }

    /// Every parameter under the root, bucketed by environment and service.
    pub async fn list_all_parameters(&self, decrypt: bool) -> Result<ParameterTree> {
        let scope = self.paths.root_scope();
        info!(%scope, "listing all parameters");

        let mut tree = ParameterTree::new();
        for stored in self.list_path(&scope, decrypt).await? {
            let Some(parsed) = self.paths.parse(&stored.full_name) else {
                debug!(path = %stored.full_name, "skipping parameter outside environment/service layout");
                continue;
            };
            if parsed.name.is_none() {
                debug!(path = %stored.full_name, "skipping parameter stored at a service path");
                continue;
            }
            let param = self.to_parameter(stored);
            tree.entry(parsed.environment)
                .or_default()
                .entry(parsed.service)
                .or_default()
                .insert(param.name.clone(), param);
        }

        Ok(tree)
    }

    /// Parameter count per environment
    pub async fn list_environments(&self) -> Result<BTreeMap<String, usize>> {
        let scope = self.paths.root_scope();
        let mut counts = BTreeMap::new();
        for stored in self.list_path(&scope, false).await? {
            if let Some(parsed) = self.paths.parse(&stored.full_name)
                && parsed.name.is_some()
            {
                *counts.entry(parsed.environment).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    /// Parameter count per service within one environment
    pub async fn list_services(&self, environment: &str) -> Result<BTreeMap<String, usize>> {
        require_segment("environment", environment)?;

        let scope = self.paths.environment_path(environment);
        let mut counts = BTreeMap::new();
        for stored in self.list_path(&scope, false).await? {
            if let Some(parsed) = self.paths.parse(&stored.full_name)
                && parsed.name.is_some()
            {
                *counts.entry(parsed.service).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}
