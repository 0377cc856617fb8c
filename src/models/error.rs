//! Error types for the local adapter.
//!
//! Configuration errors abort startup, event errors fail a single request,
//! and request errors reject a malformed HTTP request before any handler runs.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Invalid startup configuration. Always fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid mode \"{0}\" found")]
    InvalidMode(String),
    #[error("Invalid route {0}")]
    InvalidRoute(String),
    #[error("Invalid http method {0}")]
    InvalidMethod(String),
    #[error("Unknown handler \"{0}\"")]
    UnknownHandler(String),
    #[error("Handler \"{name}\" does not support {mode} mode")]
    HandlerMismatch { name: String, mode: String },
}

/// Failure while building an event from an inbound request.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Invalid sqs message")]
    MissingMessage,
    #[error("Invalid sqs request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
}

/// Malformed inbound HTTP request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("Failed to read request body: {0}")]
    BodyRead(String),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self.to_string())).into_response()
    }
}
