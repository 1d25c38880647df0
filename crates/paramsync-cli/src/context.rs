use anyhow::Result;
use once_cell::sync::OnceCell;
use paramsync_runtime::{AwsConfig, Config, ConfigFacade};

/// Per-invocation state: where the config lives and which `[aws]` values
/// the command line overrides. The config file is read on first use.
pub struct ExecutionContext {
    config_path: Option<String>,
    aws_overrides: AwsConfig,
    config: OnceCell<Config>,
}

impl ExecutionContext {
    pub fn new(config_path: Option<String>, aws_overrides: AwsConfig) -> Self {
        Self {
            config_path,
            aws_overrides,
            config: OnceCell::new(),
        }
    }

    pub fn config(&self) -> Result<&Config> {
        self.config.get_or_try_init(|| {
            let mut config = Config::load(self.config_path.as_deref())?;
            apply_overrides(&mut config.aws, &self.aws_overrides);
            Ok(config)
        })
    }

    /// Build the AWS-backed facade from the loaded config
    pub async fn facade(&self) -> Result<ConfigFacade> {
        let config = self.config()?;
        Ok(ConfigFacade::connect(config).await)
    }
}

fn apply_overrides(aws: &mut AwsConfig, overrides: &AwsConfig) {
    if let Some(region) = &overrides.region {
        aws.region = Some(region.clone());
    }
    if let Some(profile) = &overrides.profile {
        aws.profile = Some(profile.clone());
    }
    if let Some(endpoint_url) = &overrides.endpoint_url {
        aws.endpoint_url = Some(endpoint_url.clone());
    }
}
