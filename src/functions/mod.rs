//! Built-in handlers served by the `lambda-local` binary.

pub mod echo;

pub use echo::{echo_api, echo_queue, fail_api, fail_queue};

use crate::handler::HandlerRegistry;

/// Registry holding every built-in handler under its export name.
#[must_use]
pub fn builtin_registry() -> HandlerRegistry {
    HandlerRegistry::new()
        .with_api("handler", echo_api)
        .with_queue("handler", echo_queue)
        .with_api("echo", echo_api)
        .with_queue("echo", echo_queue)
        .with_api("fail", fail_api)
        .with_queue("fail", fail_queue)
}
