//! Translation of inbound HTTP requests into Lambda event envelopes.

pub mod gateway;
pub mod sqs;

pub use gateway::{build_gateway_event, build_gateway_event_at};
pub use sqs::{build_queue_event, build_queue_event_at};
