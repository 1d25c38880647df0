use super::classify;
use crate::backend::{
    ListRequest, ParameterPage, ParameterStore, PutRequest, PutResponse, StoredParameter,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::primitives::DateTime as SmithyDateTime;
use aws_sdk_ssm::types::{Parameter as SsmParameter, ParameterType as SsmParameterType};
use chrono::{DateTime, Utc};
use paramsync_types::ParameterType;

/// Parameter store backed by AWS Systems Manager Parameter Store
#[derive(Clone)]
pub struct SsmParameterStore {
    client: Client,
}

impl std::fmt::Debug for SsmParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmParameterStore").finish_non_exhaustive()
    }
}

impl SsmParameterStore {
    /// Build an SSM client inheriting the shared SDK configuration
    pub fn new(sdk_config: &aws_config::SdkConfig, endpoint_url: Option<&str>) -> Self {
        let mut builder = aws_sdk_ssm::config::Builder::from(sdk_config);
        if let Some(endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }
        Self {
            client: Client::from_conf(builder.build()),
        }
    }

    fn to_stored(param: &SsmParameter) -> Option<StoredParameter> {
        let full_name = param.name()?.to_string();
        let parameter_type = match param.r#type() {
            Some(SsmParameterType::SecureString) => ParameterType::Secret,
            _ => ParameterType::Plain,
        };

        Some(StoredParameter {
            full_name,
            value: param.value().unwrap_or_default().to_string(),
            version: param.version(),
            last_modified: param.last_modified_date().and_then(to_chrono),
            parameter_type,
        })
    }
}

fn to_chrono(timestamp: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get_parameter(&self, path: &str, decrypt: bool) -> Result<StoredParameter> {
        let response = self
            .client
            .get_parameter()
            .name(path)
            .with_decryption(decrypt)
            .send()
            .await
            .map_err(|e| classify(e, path))?;

        response
            .parameter()
            .and_then(Self::to_stored)
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }

    async fn get_parameters_by_path(&self, request: &ListRequest) -> Result<ParameterPage> {
        let response = self
            .client
            .get_parameters_by_path()
            .path(&request.path)
            .recursive(request.recursive)
            .with_decryption(request.decrypt)
            .set_next_token(request.next_token.clone())
            .send()
            .await
            .map_err(|e| classify(e, &request.path))?;

        let items = response
            .parameters()
            .iter()
            .filter_map(Self::to_stored)
            .collect();
        let next_token = response
            .next_token()
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        Ok(ParameterPage { items, next_token })
    }

    async fn put_parameter(&self, request: &PutRequest) -> Result<PutResponse> {
        let parameter_type = match request.parameter_type {
            ParameterType::Secret => SsmParameterType::SecureString,
            ParameterType::Plain => SsmParameterType::String,
        };

        let response = self
            .client
            .put_parameter()
            .name(&request.path)
            .value(&request.value)
            .r#type(parameter_type)
            .overwrite(request.overwrite)
            .send()
            .await
            .map_err(|e| classify(e, &request.path))?;

        Ok(PutResponse {
            version: response.version(),
            tier: response.tier().map(|tier| tier.as_str().to_string()),
        })
    }
}
