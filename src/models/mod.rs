pub mod error;
pub mod gateway;
pub mod request;
pub mod sqs;

pub use error::{ConfigError, EventError, RequestError};
pub use gateway::{GatewayEvent, HandlerResponse, PathParameters, RequestContext};
pub use request::{InboundBody, InboundRequest};
pub use sqs::{MessageAttribute, QueueEvent, SqsAttributes, SqsLocalRequest, SqsRecord};
