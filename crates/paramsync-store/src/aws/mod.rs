//! AWS-backed implementations of the store contracts.

mod attribute;
mod dynamodb;
mod ssm;

pub use attribute::{attribute_to_json, json_to_attribute};
pub use dynamodb::{DEFAULT_SERVICE_INDEX, DynamoConfigTable};
pub use ssm::SsmParameterStore;

use crate::error::Error;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

/// Connection settings shared by every AWS client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
    /// Endpoint override (e.g. LocalStack)
    pub endpoint_url: Option<String>,
}

/// Load the SDK configuration from the default provider chain, applying
/// region and profile overrides.
pub async fn load_sdk_config(settings: &AwsSettings) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = &settings.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }
    if let Some(profile) = &settings.profile {
        loader = loader.profile_name(profile);
    }
    loader.load().await
}

/// Map an SDK failure onto the store error taxonomy by its error code
fn classify<E, R>(err: SdkError<E, R>, subject: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some("ParameterNotFound") | Some("ResourceNotFoundException") => {
            Error::NotFound(subject.to_string())
        }
        Some("ParameterAlreadyExists") => Error::AlreadyExists(subject.to_string()),
        Some("AccessDeniedException")
        | Some("UnrecognizedClientException")
        | Some("ExpiredTokenException") => Error::Unauthorized(format!(
            "{}: {}",
            subject,
            err.message().unwrap_or("access denied")
        )),
        _ => Error::Remote(format!("{}: {}", subject, DisplayErrorContext(&err))),
    }
}
