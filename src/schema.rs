//! JSON Schemas of the event envelopes exchanged with handlers.
//!
//! Handler authors in other languages can use these to type the events they
//! receive and the responses they return.

use schemars::{JsonSchema, schema_for};
use serde_json::{Map, Value, json};

use crate::models::{GatewayEvent, HandlerResponse, QueueEvent, SqsLocalRequest};

/// Returns one `{name, description, schema}` entry per envelope type.
///
/// # Errors
///
/// Returns an error if a schema cannot be serialized.
pub fn event_schemas() -> serde_json::Result<Value> {
    let entries = vec![
        entry::<GatewayEvent>(
            "GatewayEvent",
            "API Gateway proxy event passed to handlers in api mode",
            &[],
        )?,
        entry::<HandlerResponse>(
            "HandlerResponse",
            "Response expected from handlers in api mode",
            &[],
        )?,
        entry::<QueueEvent>(
            "QueueEvent",
            "Single-record SQS event passed to handlers in sqs mode",
            &[],
        )?,
        // `message` stays optional in the struct; a missing one is reported
        // as `EventError::MissingMessage`
        entry::<SqsLocalRequest>(
            "SqsLocalRequest",
            "HTTP request body accepted in sqs mode",
            &["message"],
        )?,
    ];
    Ok(Value::Array(entries))
}

fn entry<T: JsonSchema>(
    name: &str,
    description: &str,
    required: &[&str],
) -> serde_json::Result<Value> {
    let mut schema = serde_json::to_value(schema_for!(T))?;

    // The title repeats the name and `$schema` is noise for consumers
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
        mark_required(obj, required);
    }

    Ok(json!({
        "name": name,
        "description": description,
        "schema": schema,
    }))
}

fn mark_required(schema: &mut Map<String, Value>, fields: &[&str]) {
    if fields.is_empty() {
        return;
    }
    let list = schema
        .entry("required")
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(names) = list {
        for field in fields {
            if !names.iter().any(|name| name == field) {
                names.push(Value::String((*field).to_string()));
            }
        }
    }
}
