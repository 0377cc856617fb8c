use lambda_runtime::tracing::{debug, info};
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;

use crate::models::{GatewayEvent, HandlerResponse, QueueEvent};

/// Message carried by the failing handlers.
pub const FAILURE_MESSAGE: &str = "Handler failed";

/// Responds 200 with the received gateway event, JSON-encoded, as body.
///
/// # Errors
///
/// Returns an error if the event cannot be serialized.
pub async fn echo_api(event: LambdaEvent<GatewayEvent>) -> Result<HandlerResponse, Error> {
    let (payload, _context) = event.into_parts();
    info!(
        method = %payload.http_method,
        path = %payload.path,
        "Echoing gateway event"
    );

    let body = serde_json::to_string(&payload)?;
    Ok(HandlerResponse::ok(body))
}

/// Returns the bodies of the received records, decoded as JSON where possible.
///
/// # Errors
///
/// This function does not fail but keeps the handler signature.
pub async fn echo_queue(event: QueueEvent) -> Result<Value, Error> {
    debug!(records = event.records.len(), "Echoing queue event");

    let bodies = event
        .records
        .into_iter()
        .map(|record| serde_json::from_str(&record.body).unwrap_or(Value::String(record.body)))
        .collect();
    Ok(Value::Array(bodies))
}

/// Always fails with [`FAILURE_MESSAGE`].
///
/// # Errors
///
/// Always.
pub async fn fail_api(_event: LambdaEvent<GatewayEvent>) -> Result<HandlerResponse, Error> {
    Err(FAILURE_MESSAGE.into())
}

/// Always fails with [`FAILURE_MESSAGE`].
///
/// # Errors
///
/// Always.
pub async fn fail_queue(_event: QueueEvent) -> Result<Value, Error> {
    Err(FAILURE_MESSAGE.into())
}
