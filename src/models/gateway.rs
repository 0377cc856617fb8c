//! API Gateway proxy event models for synchronous invocations.
//!
//! These types define the event handed to an API handler and the response
//! it returns.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Synthesized API Gateway proxy event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    /// Always a string: JSON-encoded for JSON requests, verbatim for text/xml,
    /// empty for anything else.
    pub body: String,
    pub resource: String,
    pub path: String,
    pub http_method: String,
    pub query_string_parameters: IndexMap<String, String>,
    pub path_parameters: PathParameters,
    pub headers: IndexMap<String, String>,
    pub request_context: RequestContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PathParameters {
    pub proxy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub account_id: String,
    pub api_id: String,
    pub authorizer: Map<String, Value>,
    pub resource_id: String,
    pub identity: Option<Value>,
    pub stage: String,
    pub request_id: String,
    /// ISO-8601 with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`
    pub request_time: String,
    pub request_time_epoch: i64,
    /// Wildcard capture of a catch-all route, `null` for declared routes.
    pub path: Option<String>,
    pub resource_path: String,
    pub http_method: String,
    pub protocol: String,
}

/// Response returned by an API handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    /// A string (decoded as JSON when possible) or any JSON value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl HandlerResponse {
    #[must_use]
    pub const fn new(status_code: u16, body: Option<Value>) -> Self {
        Self { status_code, body }
    }

    /// A 200 response with a string body.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, Some(Value::String(body.into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_handler_response_from_json() {
        let response: HandlerResponse =
            serde_json::from_value(json!({"statusCode": 201, "body": "{\"ok\":true}", "headers": {}}))
                .unwrap();
        assert_eq!(response.status_code, 201);
        assert_eq!(response.body, Some(json!("{\"ok\":true}")));
    }

    #[test]
    fn test_handler_response_without_body() {
        let response: HandlerResponse = serde_json::from_value(json!({"statusCode": 204})).unwrap();
        assert_eq!(response, HandlerResponse::new(204, None));
    }

    #[test]
    fn test_handler_response_ok() {
        assert_eq!(HandlerResponse::ok("pong").body, Some(json!("pong")));
    }
}
