//! Conversion of axum requests into [`InboundRequest`] values.
//!
//! This is where the body is read and parsed according to its content type,
//! before any event is built.

use axum::body::Body;
use axum::http::{HeaderMap, Request};
use indexmap::IndexMap;
use lambda_runtime::tracing::debug;

use crate::models::{InboundBody, InboundRequest, RequestError};
use crate::utils::query::parse_query;

/// Largest accepted request body, matching the synchronous Lambda payload limit.
pub const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// Reads an axum request into an [`InboundRequest`].
///
/// # Errors
///
/// Returns [`RequestError::BodyRead`] if the body cannot be read (or exceeds
/// [`MAX_BODY_BYTES`]) and [`RequestError::InvalidJson`] if a JSON content
/// type carries a malformed body.
pub async fn inbound_request(request: Request<Body>) -> Result<InboundRequest, RequestError> {
    let (parts, body) = request.into_parts();

    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| RequestError::BodyRead(e.to_string()))?;

    let headers = collect_headers(&parts.headers);
    let content_type = headers.get("content-type").map(String::as_str).unwrap_or_default();
    let body = parse_body(content_type, &bytes)?;

    let protocol = parts
        .uri
        .scheme_str()
        .or_else(|| headers.get("x-forwarded-proto").map(String::as_str))
        .unwrap_or("http")
        .to_string();

    let url = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string());

    debug!(method = %parts.method, url = %url, bytes = bytes.len(), "Read inbound request");

    Ok(InboundRequest {
        method: parts.method.as_str().to_string(),
        url,
        query: Some(parse_query(parts.uri.query().unwrap_or_default())),
        headers,
        body,
        wildcard: None,
        protocol,
    })
}

/// Parses a raw body by content type.
///
/// # Errors
///
/// Returns [`RequestError::InvalidJson`] for a malformed JSON body.
pub fn parse_body(content_type: &str, bytes: &[u8]) -> Result<InboundBody, RequestError> {
    if bytes.is_empty() {
        return Ok(InboundBody::Empty);
    }

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "application/json" | "application/vnd.api+json" => serde_json::from_slice(bytes)
            .map(InboundBody::Json)
            .map_err(RequestError::InvalidJson),
        "application/x-www-form-urlencoded" => {
            Ok(InboundBody::Form(parse_query(&String::from_utf8_lossy(bytes))))
        }
        text if text.starts_with("text/") || text.contains("xml") => {
            Ok(InboundBody::Text(String::from_utf8_lossy(bytes).into_owned()))
        }
        _ => Ok(InboundBody::Empty),
    }
}

// Names are already lower-case in `HeaderMap`; repeated headers are joined.
fn collect_headers(headers: &HeaderMap) -> IndexMap<String, String> {
    let mut collected: IndexMap<String, String> = IndexMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.to_string());
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body_json_with_charset() {
        let body = parse_body("application/json; charset=utf-8", br#"{"a":1}"#).unwrap();
        assert_eq!(body, InboundBody::Json(json!({"a": 1})));
    }

    #[test]
    fn test_parse_body_invalid_json() {
        assert!(matches!(
            parse_body("application/json", b"{oops"),
            Err(RequestError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_body_form() {
        let body = parse_body("application/x-www-form-urlencoded", b"a[b]=1&c=two+words").unwrap();
        assert_eq!(body, InboundBody::Form(json!({"a": {"b": "1"}, "c": "two words"})));
    }

    #[test]
    fn test_parse_body_text_and_xml() {
        assert_eq!(
            parse_body("text/plain", b"hello").unwrap(),
            InboundBody::Text("hello".into())
        );
        assert_eq!(
            parse_body("application/xml", b"<a/>").unwrap(),
            InboundBody::Text("<a/>".into())
        );
    }

    #[test]
    fn test_parse_body_empty_or_unknown() {
        assert_eq!(parse_body("application/json", b"").unwrap(), InboundBody::Empty);
        assert_eq!(
            parse_body("application/octet-stream", b"\x00\x01").unwrap(),
            InboundBody::Empty
        );
    }

    #[test]
    fn test_repeated_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append("accept", "text/html".parse().unwrap());
        headers.append("accept", "application/json".parse().unwrap());
        headers.insert("x-one", "1".parse().unwrap());

        let collected = collect_headers(&headers);
        assert_eq!(collected["accept"], "text/html, application/json");
        assert_eq!(collected["x-one"], "1");
    }

    #[tokio::test]
    async fn test_inbound_request_from_axum() {
        let request = Request::builder()
            .method("POST")
            .uri("/ping?x=1&a%5Bb%5D=2")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"hello":"world"}"#))
            .unwrap();

        let inbound = inbound_request(request).await.unwrap();
        assert_eq!(inbound.method, "POST");
        assert_eq!(inbound.url, "/ping?x=1&a%5Bb%5D=2");
        assert_eq!(inbound.path(), "/ping");
        assert_eq!(inbound.query, Some(json!({"x": "1", "a": {"b": "2"}})));
        assert_eq!(inbound.body, InboundBody::Json(json!({"hello": "world"})));
        assert_eq!(inbound.protocol, "http");
    }
}
