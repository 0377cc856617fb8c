use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::config::EventDefaults;
use crate::models::{GatewayEvent, InboundBody, InboundRequest, PathParameters, RequestContext};
use crate::utils::query::flatten_query;
use crate::utils::random_id_of;

/// Builds an API Gateway proxy event from an inbound request, stamped with
/// the current time.
#[must_use]
pub fn build_gateway_event(request: &InboundRequest, defaults: &EventDefaults) -> GatewayEvent {
    build_gateway_event_at(request, defaults, Utc::now())
}

/// Builds an API Gateway proxy event using `now` for both request timestamps.
///
/// The method is upper-cased without validation, the path drops any query
/// suffix and is also used as the single `proxy` path parameter, and the body
/// is selected by [`event_body`].
#[must_use]
pub fn build_gateway_event_at(
    request: &InboundRequest,
    defaults: &EventDefaults,
    now: DateTime<Utc>,
) -> GatewayEvent {
    let method = request.method.to_uppercase();
    let path = request.path().to_string();

    GatewayEvent {
        body: event_body(request),
        resource: defaults.resource.clone(),
        path: path.clone(),
        http_method: method.clone(),
        query_string_parameters: flatten_query(request.query.as_ref()),
        path_parameters: PathParameters { proxy: path.clone() },
        headers: request.headers.clone(),
        request_context: RequestContext {
            account_id: random_id_of(defaults.account_id_length),
            api_id: random_id_of(defaults.api_id_length),
            authorizer: Map::new(),
            resource_id: random_id_of(defaults.resource_id_length),
            identity: None,
            stage: defaults.stage.clone(),
            request_id: random_id_of(defaults.request_id_length),
            request_time: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            request_time_epoch: now.timestamp_millis(),
            path: request.wildcard.clone(),
            resource_path: path,
            http_method: method,
            protocol: request.protocol.clone(),
        },
    }
}

/// Selects the event body by a case-insensitive match on `content-type`.
///
/// - contains `json`: the parsed body re-encoded as JSON, `{}` when absent
/// - contains `xml` or `plain`: the body verbatim, empty when absent
/// - anything else: empty, the payload is dropped
#[must_use]
pub fn event_body(request: &InboundRequest) -> String {
    let content_type = request
        .header("content-type")
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if content_type.contains("json") {
        request
            .body
            .as_value()
            .unwrap_or_else(|| Value::Object(Map::new()))
            .to_string()
    } else if content_type.contains("xml") || content_type.contains("plain") {
        match &request.body {
            InboundBody::Text(text) => text.clone(),
            InboundBody::Empty => String::new(),
            InboundBody::Json(value) | InboundBody::Form(value) => value.to_string(),
        }
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_body_json_defaults_to_empty_object() {
        let request = InboundRequest::new("POST", "/").with_header("content-type", "application/json");
        assert_eq!(event_body(&request), "{}");
    }

    #[test]
    fn test_event_body_vnd_api_json() {
        let request = InboundRequest::new("POST", "/")
            .with_header("Content-Type", "application/vnd.api+json")
            .with_body(InboundBody::Json(json!({"data": []})));
        assert_eq!(event_body(&request), r#"{"data":[]}"#);
    }

    #[test]
    fn test_event_body_plain_and_xml_verbatim() {
        let plain = InboundRequest::new("POST", "/")
            .with_header("content-type", "text/plain; charset=utf-8")
            .with_body(InboundBody::Text("hello".into()));
        assert_eq!(event_body(&plain), "hello");

        let xml = InboundRequest::new("POST", "/")
            .with_header("content-type", "APPLICATION/XML")
            .with_body(InboundBody::Text("<a>1</a>".into()));
        assert_eq!(event_body(&xml), "<a>1</a>");

        let empty = InboundRequest::new("POST", "/").with_header("content-type", "text/xml");
        assert_eq!(event_body(&empty), "");
    }

    #[test]
    fn test_event_body_unrecognized_content_type_is_dropped() {
        let form = InboundRequest::new("POST", "/")
            .with_header("content-type", "application/x-www-form-urlencoded")
            .with_body(InboundBody::Form(json!({"a": "1"})));
        assert_eq!(event_body(&form), "");

        let missing = InboundRequest::new("POST", "/").with_body(InboundBody::Text("x".into()));
        assert_eq!(event_body(&missing), "");
    }

    #[test]
    fn test_timestamps_share_one_instant() {
        let now = DateTime::parse_from_rfc3339("2024-05-01T12:30:45.123Z")
            .unwrap()
            .with_timezone(&Utc);
        let event = build_gateway_event_at(
            &InboundRequest::new("get", "/ping"),
            &EventDefaults::default(),
            now,
        );
        assert_eq!(event.request_context.request_time, "2024-05-01T12:30:45.123Z");
        assert_eq!(event.request_context.request_time_epoch, 1_714_566_645_123);
    }
}
