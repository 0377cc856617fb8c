//! SQS event models for asynchronous invocations.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body accepted by the adapter in `sqs` mode.
///
/// Only `message` is required; everything else falls back to the
/// dispatcher's [`EventDefaults`](crate::config::EventDefaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SqsLocalRequest {
    #[schemars(description = "Message payload, delivered JSON-encoded as the record body")]
    pub message: Option<Value>,
    #[schemars(description = "AWS region used in the queue ARN")]
    pub region: Option<String>,
    #[schemars(description = "AWS account id used in the queue ARN")]
    pub account: Option<String>,
    #[schemars(description = "Queue name used in the queue ARN")]
    pub name: Option<String>,
    #[serde(rename = "message_Id")]
    #[schemars(description = "Overrides both messageId and receiptHandle")]
    pub message_id: Option<String>,
    #[schemars(description = "Message attributes passed through to the record")]
    pub attributes: Option<IndexMap<String, MessageAttribute>>,
}

/// A single SQS message attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub string_list_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub binary_list_values: Vec<String>,
    pub data_type: String,
}

/// Synthesized SQS event. Always carries exactly one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueueEvent {
    #[serde(rename = "Records")]
    pub records: Vec<SqsRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SqsRecord {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
    pub attributes: SqsAttributes,
    pub message_attributes: IndexMap<String, MessageAttribute>,
    /// Base64 of the JSON body; not an MD5 digest.
    pub md5_of_body: String,
    pub event_source: String,
    #[serde(rename = "eventSourceARN")]
    pub event_source_arn: String,
    pub aws_region: String,
}

/// System attributes, string-encoded as in the real event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct SqsAttributes {
    pub approximate_receive_count: String,
    pub sent_timestamp: String,
    pub sender_id: String,
    pub approximate_first_receive_timestamp: String,
}
