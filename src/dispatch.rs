//! Per-mode request handling.
//!
//! The dispatcher owns the validated [`Config`] and the bound [`Handler`].
//! For each request it matches a route, builds the event, invokes the
//! handler and maps the outcome onto an HTTP response.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use lambda_runtime::tracing::{error, info, warn};
use lambda_runtime::{Context, LambdaEvent};
use serde_json::{Map, Value};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, Mode, RouteSpec};
use crate::events::{build_gateway_event, build_queue_event};
use crate::handler::Handler;
use crate::http::inbound_request;
use crate::models::{ConfigError, EventError, InboundRequest};

/// Body written back to the HTTP caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// Structured value, written as-is
    Json(Value),
    /// Text that did not decode as JSON, written as a JSON string
    Text(String),
}

impl ResponseBody {
    /// Decodes `text` as JSON, keeping it as raw text when that fails.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text.to_string()),
        }
    }

    /// Maps a handler result value. Strings go through [`Self::from_text`],
    /// other values pass through, and an absent or null value becomes `{}`.
    #[must_use]
    pub fn from_value(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Json(Value::Object(Map::new())),
            Some(Value::String(text)) => Self::from_text(&text),
            Some(value) => Self::Json(value),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }
}

/// Status and body produced for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl DispatchResponse {
    fn failure(status: StatusCode, message: String) -> Self {
        Self {
            status,
            body: ResponseBody::Text(message),
        }
    }
}

impl IntoResponse for DispatchResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body.into_value())).into_response()
    }
}

#[derive(Debug, Error)]
enum DispatchError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error("{0}")]
    Handler(lambda_runtime::Error),
    #[error("Handler timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("Invalid status code {0}")]
    InvalidStatus(u16),
}

/// Request dispatcher for one configured mode.
pub struct Dispatcher {
    config: Config,
    handler: Handler,
}

impl Dispatcher {
    /// Binds a handler to a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HandlerMismatch`] when the handler does not
    /// serve the configured mode.
    pub fn new(config: Config, handler: Handler) -> Result<Self, ConfigError> {
        if handler.mode() != config.mode {
            return Err(ConfigError::HandlerMismatch {
                name: config.handler_name,
                mode: config.mode.to_string(),
            });
        }
        Ok(Self { config, handler })
    }

    /// Handles one inbound request end to end.
    pub async fn handle(&self, mut request: InboundRequest) -> DispatchResponse {
        let path = request.path().to_string();

        if self.config.mode == Mode::Api && !self.config.routes.is_empty() {
            let Some((route, params)) = self.match_route(&request.method, &path) else {
                warn!(method = %request.method, path = %path, "No route matched");
                return DispatchResponse::failure(
                    StatusCode::NOT_FOUND,
                    format!("Cannot {} {path}", request.method.to_uppercase()),
                );
            };
            info!(
                route = %route.template,
                method = %request.method,
                path = %path,
                params = ?params,
                "Matched route"
            );
        } else {
            request.wildcard = Some(path.strip_prefix('/').unwrap_or(&path).to_string());
        }

        let outcome = match &self.handler {
            Handler::Api(handler) => {
                let event = build_gateway_event(&request, &self.config.defaults);
                if self.config.debug {
                    info!(event = ?event, "api parsed");
                }
                let invocation = handler.call(LambdaEvent::new(event, Context::default()));
                self.with_timeout(invocation).await.and_then(|response| {
                    StatusCode::from_u16(response.status_code)
                        .map(|status| (status, ResponseBody::from_value(response.body)))
                        .map_err(|_| DispatchError::InvalidStatus(response.status_code))
                })
            }
            Handler::Queue(handler) => {
                if self.config.debug {
                    info!(body = ?request.body, "sqs request");
                }
                match build_queue_event(&request, &self.config.defaults) {
                    Ok(event) => {
                        if self.config.debug {
                            info!(event = ?event, "sqs parsed");
                        }
                        self.with_timeout(handler.call(event))
                            .await
                            .map(|value| (StatusCode::OK, ResponseBody::from_value(Some(value))))
                    }
                    Err(e) => Err(e.into()),
                }
            }
        };

        match outcome {
            Ok((status, body)) => DispatchResponse { status, body },
            Err(e) => {
                error!(error = %e, method = %request.method, path = %path, "Invocation failed");
                DispatchResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }

    /// Builds the axum router serving this dispatcher, with permissive CORS
    /// and request tracing.
    pub fn into_router(self) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(Arc::new(self))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    fn match_route(
        &self,
        method: &str,
        path: &str,
    ) -> Option<(&RouteSpec, indexmap::IndexMap<String, String>)> {
        self.config
            .routes
            .iter()
            .filter(|route| route.method.accepts(method))
            .find_map(|route| route.pattern.matches(path).map(|params| (route, params)))
    }

    async fn with_timeout<T>(
        &self,
        invocation: impl Future<Output = Result<T, lambda_runtime::Error>>,
    ) -> Result<T, DispatchError> {
        let result = match self.config.handler_timeout {
            Some(limit) => tokio::time::timeout(limit, invocation)
                .await
                .map_err(|_| DispatchError::Timeout(limit))?,
            None => invocation.await,
        };
        result.map_err(DispatchError::Handler)
    }
}

async fn dispatch(State(dispatcher): State<Arc<Dispatcher>>, request: Request) -> Response {
    match inbound_request(request).await {
        Ok(inbound) => dispatcher.handle(inbound).await.into_response(),
        Err(e) => {
            warn!(error = %e, "Rejected malformed request");
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_body_decodes_json_text() {
        assert_eq!(
            ResponseBody::from_text(r#"{"ok":true}"#),
            ResponseBody::Json(json!({"ok": true}))
        );
    }

    #[test]
    fn test_response_body_keeps_plain_text() {
        assert_eq!(ResponseBody::from_text("pong"), ResponseBody::Text("pong".into()));
        assert_eq!(ResponseBody::from_text(""), ResponseBody::Text(String::new()));
    }

    #[test]
    fn test_response_body_from_value() {
        assert_eq!(ResponseBody::from_value(None), ResponseBody::Json(json!({})));
        assert_eq!(ResponseBody::from_value(Some(Value::Null)), ResponseBody::Json(json!({})));
        assert_eq!(
            ResponseBody::from_value(Some(json!([1, 2]))),
            ResponseBody::Json(json!([1, 2]))
        );
        assert_eq!(
            ResponseBody::from_value(Some(json!("42"))),
            ResponseBody::Json(json!(42))
        );
    }

    #[test]
    fn test_text_is_written_as_json_string() {
        assert_eq!(ResponseBody::Text("pong".into()).into_value(), json!("pong"));
    }

    #[test]
    fn test_timeout_message() {
        assert_eq!(
            DispatchError::Timeout(Duration::from_secs(3)).to_string(),
            "Handler timed out after 3s"
        );
    }
}
