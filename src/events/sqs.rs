use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::EventDefaults;
use crate::models::{EventError, InboundRequest, QueueEvent, SqsAttributes, SqsLocalRequest, SqsRecord};
use crate::utils::random_id;

/// Builds a single-record SQS event from a publish request, stamped with the
/// current time.
///
/// # Errors
///
/// Returns [`EventError::MissingMessage`] when the body has no `message`, and
/// [`EventError::InvalidRequest`] when an optional field has the wrong shape.
pub fn build_queue_event(
    request: &InboundRequest,
    defaults: &EventDefaults,
) -> Result<QueueEvent, EventError> {
    build_queue_event_at(request, defaults, Utc::now())
}

/// Same as [`build_queue_event`] with an explicit clock reading.
///
/// # Errors
///
/// See [`build_queue_event`].
pub fn build_queue_event_at(
    request: &InboundRequest,
    defaults: &EventDefaults,
    now: DateTime<Utc>,
) -> Result<QueueEvent, EventError> {
    let local = parse_local_request(request)?;
    let message = local.message.ok_or(EventError::MissingMessage)?;

    let region = local.region.unwrap_or_else(|| defaults.region.clone());
    let account = local.account.unwrap_or_else(|| defaults.account.clone());
    let name = local.name.unwrap_or_else(|| defaults.queue_name.clone());
    let body = message.to_string();
    let sent = now.timestamp_millis();

    let record = SqsRecord {
        message_id: local.message_id.clone().unwrap_or_else(random_id),
        receipt_handle: local.message_id.unwrap_or_else(random_id),
        md5_of_body: STANDARD.encode(&body),
        body,
        attributes: SqsAttributes {
            approximate_receive_count: "1".to_string(),
            sent_timestamp: sent.to_string(),
            sender_id: random_id(),
            approximate_first_receive_timestamp: (sent + 1).to_string(),
        },
        message_attributes: local.attributes.unwrap_or_default(),
        event_source: defaults.event_source.clone(),
        event_source_arn: format!("arn:aws:sqs:{region}:{account}:{name}"),
        aws_region: region,
    };

    Ok(QueueEvent {
        records: vec![record],
    })
}

// Only a JSON object body can carry `message`; any other body is treated as
// a request without one.
fn parse_local_request(request: &InboundRequest) -> Result<SqsLocalRequest, EventError> {
    match request.body.as_value() {
        Some(value @ Value::Object(_)) => Ok(serde_json::from_value(value)?),
        _ => Err(EventError::MissingMessage),
    }
}
