//! High-level operations behind each CLI command.
//!
//! The facade owns one `ParamStoreClient` and one `SharedConfigClient` built
//! from the loaded `Config`, and moves data between them and local files.

use crate::config::Config;
use crate::{Error, Result};
use paramsync_core::{EnvironmentSnapshot, read_env_file, remap_prefix, write_env_file};
use paramsync_store::aws::{DynamoConfigTable, SsmParameterStore, load_sdk_config};
use paramsync_store::{
    BatchOutcome, ConfigTable, EntryOutcome, ParamStoreClient, ParameterStore, ParameterWrite,
    SharedConfigClient,
};
use paramsync_types::{EnvEntry, Parameter};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Files written by a bulk export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub files: Vec<PathBuf>,
    pub parameters: usize,
}

/// Per-key outcomes of writing an env file to the store
#[derive(Debug)]
pub struct WriteReport {
    pub outcomes: Vec<EntryOutcome>,
}

impl WriteReport {
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed_keys(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_ok())
            .map(|o| o.key.clone())
            .collect()
    }

    /// `PartialFailure` naming every key that was not written
    pub fn ensure_complete(&self) -> Result<()> {
        let failed = self.failed_keys();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(Error::PartialFailure { failed })
        }
    }
}

/// `PartialFailure` naming every record left out of the table
pub fn ensure_batches_complete(outcomes: &[BatchOutcome]) -> Result<()> {
    let failed: Vec<String> = outcomes.iter().flat_map(BatchOutcome::failed_names).collect();
    if failed.is_empty() {
        Ok(())
    } else {
        Err(Error::PartialFailure { failed })
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    if value.contains('/') {
        return Err(Error::Validation(format!(
            "{} must be a single path segment, got {:?}",
            field, value
        )));
    }
    Ok(())
}

/// A path segment that can safely become a directory or file name
fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".." && !segment.contains('\\')
}

pub struct ConfigFacade {
    params: Arc<ParamStoreClient>,
    shared: SharedConfigClient,
}

impl ConfigFacade {
    pub fn new(params: Arc<ParamStoreClient>, shared: SharedConfigClient) -> Self {
        Self { params, shared }
    }

    /// Wire clients over the given backends using the store and
    /// shared-config settings from `config`.
    pub fn with_backends(
        config: &Config,
        store: Arc<dyn ParameterStore>,
        table: Arc<dyn ConfigTable>,
    ) -> Self {
        let params = Arc::new(
            ParamStoreClient::new(store)
                .with_paths(config.paths())
                .with_cache_ttl(config.cache_ttl())
                .with_write_concurrency(config.store.write_concurrency),
        );
        let shared = SharedConfigClient::new(params.clone(), table)
            .with_settings(config.shared_config_settings())
            .with_cache_ttl(config.cache_ttl());
        Self::new(params, shared)
    }

    /// Connect to SSM and DynamoDB with the credentials and region resolved
    /// from `config` and the default AWS provider chain.
    pub async fn connect(config: &Config) -> Self {
        let settings = config.aws_settings();
        let sdk_config = load_sdk_config(&settings).await;
        let endpoint = settings.endpoint_url.as_deref();

        let store = Arc::new(SsmParameterStore::new(&sdk_config, endpoint));
        let table = Arc::new(DynamoConfigTable::new(
            &sdk_config,
            endpoint,
            &config.shared_config.service_index,
        ));
        Self::with_backends(config, store, table)
    }

    pub fn params(&self) -> &ParamStoreClient {
        &self.params
    }

    pub fn service_path(&self, environment: &str, service: &str) -> String {
        self.params.paths().build_path(environment, service, None)
    }

    /// Write every parameter of one service to an env file, decrypted.
    /// Returns the number of entries written.
    pub async fn save_params_file(
        &self,
        environment: &str,
        service: &str,
        outfile: &Path,
    ) -> Result<usize> {
        let params = self
            .params
            .get_parameters_by_service(environment, service, true)
            .await?;
        if params.is_empty() {
            return Err(paramsync_store::Error::NotFound(format!(
                "no parameters under {}",
                self.service_path(environment, service)
            ))
            .into());
        }

        let entries: Vec<EnvEntry> = params
            .values()
            .map(|p| EnvEntry::new(&p.name, &p.value))
            .collect();
        write_env_file(outfile, &entries)?;
        info!(path = %outfile.display(), count = entries.len(), "saved parameters file");
        Ok(entries.len())
    }

    /// Export the whole hierarchy as `<folder>/<environment>/<service>.env`.
    pub async fn export_all_to_files(&self, folder: &Path, decrypt: bool) -> Result<ExportReport> {
        let tree = self.params.list_all_parameters(decrypt).await?;
        let mut report = ExportReport::default();

        for (environment, services) in tree {
            if !is_plain_segment(&environment) {
                warn!(environment, "skipping environment that is not a plain name");
                continue;
            }
            let dir = folder.join(&environment);
            std::fs::create_dir_all(&dir)?;

            for (service, params) in services {
                if !is_plain_segment(&service) {
                    warn!(environment, service, "skipping service that is not a plain name");
                    continue;
                }
                let entries: Vec<EnvEntry> = params
                    .values()
                    .map(|p| EnvEntry::new(&p.name, &p.value))
                    .collect();
                let file = dir.join(format!("{}.env", service));
                write_env_file(&file, &entries)?;

                report.parameters += entries.len();
                report.files.push(file);
            }
        }

        info!(
            folder = %folder.display(),
            files = report.files.len(),
            parameters = report.parameters,
            "exported parameters"
        );
        Ok(report)
    }

    /// Remap key prefixes and write the result to `outfile`.
    ///
    /// `None` reads the current process environment. The remapped entries
    /// are returned for the caller to load back into the environment.
    pub fn remap_prefix_and_save(
        source: Option<Vec<EnvEntry>>,
        old_prefix: &str,
        new_prefix: &str,
        outfile: &Path,
    ) -> Result<Vec<EnvEntry>> {
        let entries = match source {
            Some(entries) => entries,
            None => {
                info!("loading variables from the current environment");
                EnvironmentSnapshot::capture().into_entries()
            }
        };

        let remapped = remap_prefix(&entries, old_prefix, new_prefix);
        write_env_file(outfile, &remapped)?;
        info!(path = %outfile.display(), count = remapped.len(), "saved remapped variables");
        Ok(remapped)
    }

    /// Write every entry of an env file to one service. Each key succeeds
    /// or fails on its own; see [`WriteReport::ensure_complete`].
    pub async fn put_file_to_store(
        &self,
        infile: &Path,
        environment: &str,
        service: &str,
        overwrite: bool,
        encrypt: bool,
    ) -> Result<WriteReport> {
        require("environment", environment)?;
        require("service", service)?;

        let writes: Vec<ParameterWrite> = read_env_file(infile)?
            .into_iter()
            .map(|entry| ParameterWrite::new(entry, encrypt, overwrite))
            .collect();

        let outcomes = self
            .params
            .set_parameters_by_service(&writes, environment, service)
            .await;
        Ok(WriteReport { outcomes })
    }

    /// Write the shared config of one service as a pretty JSON object.
    pub async fn get_shared_config_to_file(
        &self,
        environment: &str,
        service: &str,
        outfile: &Path,
    ) -> Result<usize> {
        let records = self.shared.get_by_service(environment, service).await?;
        let object: serde_json::Map<String, Value> = records
            .into_iter()
            .map(|(name, record)| (name, record.value))
            .collect();

        let count = object.len();
        let text = serde_json::to_string_pretty(&Value::Object(object))?;
        if let Some(parent) = outfile.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(outfile, text)?;
        info!(path = %outfile.display(), count, "saved shared config");
        Ok(count)
    }

    pub async fn put_shared_config_from_file(
        &self,
        infile: &Path,
        environment: &str,
        service: &str,
    ) -> Result<Vec<BatchOutcome>> {
        let text = std::fs::read_to_string(infile)?;
        let values: BTreeMap<String, Value> = match serde_json::from_str(&text)? {
            Value::Object(object) => object.into_iter().collect(),
            _ => {
                return Err(Error::Validation(format!(
                    "{} must contain a JSON object of name/value pairs",
                    infile.display()
                )));
            }
        };

        Ok(self.shared.set_by_service(&values, environment, service).await?)
    }

    pub async fn get_parameter(
        &self,
        environment: &str,
        service: &str,
        name: &str,
        decrypt: bool,
    ) -> Result<Parameter> {
        Ok(self
            .params
            .get_parameter(environment, service, name, decrypt)
            .await?)
    }

    pub async fn list_environments(&self) -> Result<BTreeMap<String, usize>> {
        Ok(self.params.list_environments().await?)
    }

    pub async fn list_services(&self, environment: &str) -> Result<BTreeMap<String, usize>> {
        Ok(self.params.list_services(environment).await?)
    }
}
