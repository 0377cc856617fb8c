//! Read-only view of an inbound HTTP request.
//!
//! The HTTP layer produces one of these per call; the event builders only
//! ever borrow it.

use indexmap::IndexMap;
use serde_json::Value;

/// Request body after content-type based parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InboundBody {
    /// `application/json` or `application/vnd.api+json`
    Json(Value),
    /// `application/x-www-form-urlencoded`, parsed into a nested object
    Form(Value),
    /// text and xml payloads, kept verbatim
    Text(String),
    #[default]
    Empty,
}

impl InboundBody {
    /// Returns the structured form of the body, if any.
    ///
    /// Text bodies are exposed as JSON strings so callers can treat every
    /// parsed body uniformly.
    #[must_use]
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Self::Json(value) | Self::Form(value) => Some(value.clone()),
            Self::Text(text) => Some(Value::String(text.clone())),
            Self::Empty => None,
        }
    }
}

/// Inbound HTTP request as seen by the event builders.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundRequest {
    pub method: String,
    /// Request target including any `?query` suffix.
    pub url: String,
    /// Header names are lower-case.
    pub headers: IndexMap<String, String>,
    /// Parsed, possibly nested, query structure.
    pub query: Option<Value>,
    pub body: InboundBody,
    /// Wildcard capture of a catch-all route (path without the leading `/`).
    pub wildcard: Option<String>,
    pub protocol: String,
}

impl InboundRequest {
    /// Creates a request with no headers, query, body or captures.
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: IndexMap::new(),
            query: None,
            body: InboundBody::Empty,
            wildcard: None,
            protocol: "http".to_string(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: InboundBody) -> Self {
        self.body = body;
        self
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The url without its `?query` suffix.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.split_once('?').map_or(self.url.as_str(), |(path, _)| path)
    }
}
