//! Schema generator for the event envelopes.
//!
//! This binary writes `event_schema.json` describing the gateway event, the
//! handler response, the SQS event and the sqs-mode request body.

use std::fs;

fn main() {
    let schemas = lambda_local::schema::event_schemas().unwrap_or_else(|e| {
        eprintln!("Failed to build schemas: {e}");
        std::process::exit(1);
    });

    let json = serde_json::to_string_pretty(&schemas).unwrap_or_else(|e| {
        eprintln!("Failed to serialize schema: {e}");
        std::process::exit(1);
    });

    fs::write("event_schema.json", json).unwrap_or_else(|e| {
        eprintln!("Failed to write event_schema.json: {e}");
        std::process::exit(1);
    });

    let count = schemas.as_array().map_or(0, Vec::len);
    println!("✅ Generated event_schema.json with {count} schema(s)");
}
