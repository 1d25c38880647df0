use super::attribute::{attribute_to_json, json_to_attribute};
use super::classify;
use crate::backend::{BatchPutResponse, ConfigTable, ContinuationKey, RecordPage};
use crate::error::{Error, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use paramsync_types::{SharedConfigRecord, TableReference};
use serde_json::Value;
use std::collections::HashMap;

/// Global secondary index on the `service` attribute
pub const DEFAULT_SERVICE_INDEX: &str = "service-index";

const ATTR_NAME: &str = "name";
const ATTR_SERVICE: &str = "service";
const ATTR_VALUE: &str = "value";

type Item = HashMap<String, AttributeValue>;

/// Shared-config table backed by DynamoDB
#[derive(Clone)]
pub struct DynamoConfigTable {
    client: Client,
    service_index: String,
}

impl std::fmt::Debug for DynamoConfigTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoConfigTable")
            .field("service_index", &self.service_index)
            .finish()
    }
}

impl DynamoConfigTable {
    /// Build a DynamoDB client inheriting the shared SDK configuration
    pub fn new(
        sdk_config: &aws_config::SdkConfig,
        endpoint_url: Option<&str>,
        service_index: impl Into<String>,
    ) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
        if let Some(endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }
        Self {
            client: Client::from_conf(builder.build()),
            service_index: service_index.into(),
        }
    }

    fn item_to_record(item: &Item) -> Option<SharedConfigRecord> {
        let name = item.get(ATTR_NAME)?.as_s().ok()?;
        let service = item.get(ATTR_SERVICE)?.as_s().ok()?;
        let value = item
            .get(ATTR_VALUE)
            .map(attribute_to_json)
            .unwrap_or(Value::Null);
        Some(SharedConfigRecord::new(name, service, value))
    }

    fn record_to_item(record: &SharedConfigRecord) -> Item {
        HashMap::from([
            (ATTR_NAME.to_string(), AttributeValue::S(record.name.clone())),
            (
                ATTR_SERVICE.to_string(),
                AttributeValue::S(record.service.clone()),
            ),
            (ATTR_VALUE.to_string(), json_to_attribute(&record.value)),
        ])
    }

    fn key_to_item(key: &ContinuationKey) -> Item {
        key.iter()
            .map(|(k, v)| (k.clone(), json_to_attribute(v)))
            .collect()
    }

    fn item_to_key(item: &Item) -> ContinuationKey {
        item.iter()
            .map(|(k, v)| (k.clone(), attribute_to_json(v)))
            .collect()
    }
}

#[async_trait]
impl ConfigTable for DynamoConfigTable {
    async fn query_by_service(
        &self,
        table: &TableReference,
        service: &str,
        start_key: Option<&ContinuationKey>,
    ) -> Result<RecordPage> {
        let response = self
            .client
            .query()
            .table_name(table.table_name())
            .index_name(&self.service_index)
            .key_condition_expression("#svc = :svc")
            .expression_attribute_names("#svc", ATTR_SERVICE)
            .expression_attribute_values(":svc", AttributeValue::S(service.to_string()))
            .set_exclusive_start_key(start_key.map(Self::key_to_item))
            .send()
            .await
            .map_err(|e| classify(e, table.table_name()))?;

        let items = response
            .items()
            .iter()
            .filter_map(Self::item_to_record)
            .collect();
        let last_evaluated_key = response
            .last_evaluated_key()
            .filter(|key| !key.is_empty())
            .map(Self::item_to_key);

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
        let mut requests = Vec::with_capacity(records.len());
        for record in records {
            let put = PutRequest::builder()
                .set_item(Some(Self::record_to_item(record)))
                .build()
                .map_err(|e| Error::Remote(format!("invalid record {}: {}", record.name, e)))?;
            requests.push(WriteRequest::builder().put_request(put).build());
        }

        let response = self
            .client
            .batch_write_item()
            .request_items(table.table_name(), requests)
            .send()
            .await
            .map_err(|e| classify(e, table.table_name()))?;

        let unprocessed = response
            .unprocessed_items()
            .and_then(|items| items.get(table.table_name()))
            .map(|requests| {
                requests
                    .iter()
                    .filter_map(|request| request.put_request())
                    .filter_map(|put| Self::item_to_record(put.item()))
                    .collect()
            })
            .unwrap_or_default();

        Ok(BatchPutResponse { unprocessed })
    }
}
