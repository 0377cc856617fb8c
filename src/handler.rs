use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use lambda_runtime::tracing::warn;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;

use crate::config::Mode;
use crate::models::{ConfigError, GatewayEvent, HandlerResponse, QueueEvent};

/// A handler invoked with API Gateway proxy events.
///
/// Implemented for any async function taking a `LambdaEvent<GatewayEvent>`,
/// so plain functions can be registered the same way `service_fn` accepts them.
#[async_trait]
pub trait ApiHandler: Send + Sync {
    /// Handles one gateway event.
    ///
    /// # Errors
    ///
    /// Any error is reported to the HTTP caller as a 500 with its message.
    async fn call(&self, event: LambdaEvent<GatewayEvent>) -> Result<HandlerResponse, Error>;
}

/// A handler invoked with SQS events. Receives the event only, no context.
#[async_trait]
pub trait QueueHandler: Send + Sync {
    /// Handles one queue event.
    ///
    /// # Errors
    ///
    /// Any error is reported to the HTTP caller as a 500 with its message.
    async fn call(&self, event: QueueEvent) -> Result<Value, Error>;
}

#[async_trait]
impl<F, Fut> ApiHandler for F
where
    F: Fn(LambdaEvent<GatewayEvent>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HandlerResponse, Error>> + Send + 'static,
{
    async fn call(&self, event: LambdaEvent<GatewayEvent>) -> Result<HandlerResponse, Error> {
        (self)(event).await
    }
}

#[async_trait]
impl<F, Fut> QueueHandler for F
where
    F: Fn(QueueEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, Error>> + Send + 'static,
{
    async fn call(&self, event: QueueEvent) -> Result<Value, Error> {
        (self)(event).await
    }
}

/// The handler bound to a dispatcher, matching its mode.
#[derive(Clone)]
pub enum Handler {
    Api(Arc<dyn ApiHandler>),
    Queue(Arc<dyn QueueHandler>),
}

impl Handler {
    pub fn api(handler: impl ApiHandler + 'static) -> Self {
        Self::Api(Arc::new(handler))
    }

    pub fn queue(handler: impl QueueHandler + 'static) -> Self {
        Self::Queue(Arc::new(handler))
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self {
            Self::Api(_) => Mode::Api,
            Self::Queue(_) => Mode::Sqs,
        }
    }
}

/// Handlers addressable by export name.
///
/// A name may be registered for either mode or both.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    api: HashMap<String, Arc<dyn ApiHandler>>,
    queue: HashMap<String, Arc<dyn QueueHandler>>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_api(mut self, name: &str, handler: impl ApiHandler + 'static) -> Self {
        self.api.insert(name.to_string(), Arc::new(handler));
        self
    }

    #[must_use]
    pub fn with_queue(mut self, name: &str, handler: impl QueueHandler + 'static) -> Self {
        self.queue.insert(name.to_string(), Arc::new(handler));
        self
    }

    /// Looks up the handler registered under `name` for `mode`. An unknown
    /// name is logged together with the registered ones.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownHandler`] when the name is not registered
    /// at all, and [`ConfigError::HandlerMismatch`] when it is only registered
    /// for the other mode.
    pub fn resolve(&self, name: &str, mode: Mode) -> Result<Handler, ConfigError> {
        let found = match mode {
            Mode::Api => self.api.get(name).cloned().map(Handler::Api),
            Mode::Sqs => self.queue.get(name).cloned().map(Handler::Queue),
        };

        found.ok_or_else(|| {
            if self.api.contains_key(name) || self.queue.contains_key(name) {
                ConfigError::HandlerMismatch {
                    name: name.to_string(),
                    mode: mode.to_string(),
                }
            } else {
                warn!(name, available = ?self.names(), "Unknown handler");
                ConfigError::UnknownHandler(name.to_string())
            }
        })
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .api
            .keys()
            .chain(self.queue.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn pong(_event: LambdaEvent<GatewayEvent>) -> Result<HandlerResponse, Error> {
        Ok(HandlerResponse::ok("pong"))
    }

    async fn ack(_event: QueueEvent) -> Result<Value, Error> {
        Ok(Value::Null)
    }

    #[test]
    fn test_resolve_by_mode() {
        let registry = HandlerRegistry::new()
            .with_api("handler", pong)
            .with_queue("handler", ack);

        assert_eq!(registry.resolve("handler", Mode::Api).map(|h| h.mode()), Ok(Mode::Api));
        assert_eq!(registry.resolve("handler", Mode::Sqs).map(|h| h.mode()), Ok(Mode::Sqs));
    }

    #[test]
    fn test_resolve_unknown_name() {
        let registry = HandlerRegistry::new().with_api("handler", pong);
        assert_eq!(
            registry.resolve("missing", Mode::Api).map(|h| h.mode()),
            Err(ConfigError::UnknownHandler("missing".into()))
        );
    }

    #[test]
    fn test_resolve_wrong_mode() {
        let registry = HandlerRegistry::new().with_api("pong", pong);
        assert_eq!(
            registry.resolve("pong", Mode::Sqs).map(|h| h.mode()),
            Err(ConfigError::HandlerMismatch {
                name: "pong".into(),
                mode: "sqs".into()
            })
        );
    }

    #[test]
    fn test_names_are_sorted_and_unique() {
        let registry = HandlerRegistry::new()
            .with_api("b", pong)
            .with_queue("b", ack)
            .with_api("a", pong);
        assert_eq!(registry.names(), vec!["a", "b"]);
    }
}
