//! Local adapter that serves a Lambda handler over HTTP.
//!
//! Inbound requests are translated into API Gateway proxy events (`api` mode)
//! or single-record SQS events (`sqs` mode), handed to an in-process handler,
//! and the handler's result is written back as the HTTP response.

pub mod config;
pub mod dispatch;
pub mod events;
pub mod functions;
pub mod handler;
pub mod http;
pub mod models;
pub mod schema;
pub mod utils;

pub use config::{Config, EventDefaults, Mode};
pub use dispatch::{DispatchResponse, Dispatcher, ResponseBody};
pub use handler::{ApiHandler, Handler, HandlerRegistry, QueueHandler};
