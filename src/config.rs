//! Startup configuration: CLI arguments, dispatch mode, declared routes and
//! the default values used by the event builders.
//!
//! Everything here is validated once, before the server binds. Any error is
//! fatal.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;

use crate::models::ConfigError;
use crate::utils::route::RoutePattern;

/// Top-level dispatch strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Synchronous API Gateway proxy invocation
    #[default]
    Api,
    /// Asynchronous SQS message invocation
    Sqs,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "sqs" => Ok(Self::Sqs),
            _ => Err(ConfigError::InvalidMode(value.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => f.write_str("api"),
            Self::Sqs => f.write_str("sqs"),
        }
    }
}

/// HTTP methods a route may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Patch,
    Put,
    Delete,
    Post,
}

impl HttpMethod {
    #[must_use]
    pub fn as_http(self) -> axum::http::Method {
        match self {
            Self::Get => axum::http::Method::GET,
            Self::Patch => axum::http::Method::PATCH,
            Self::Put => axum::http::Method::PUT,
            Self::Delete => axum::http::Method::DELETE,
            Self::Post => axum::http::Method::POST,
        }
    }

    /// Whether a request method is served by a route declared with `self`.
    /// `GET` routes also answer `HEAD`.
    #[must_use]
    pub fn accepts(self, method: &str) -> bool {
        self.as_http().as_str().eq_ignore_ascii_case(method)
            || (self == Self::Get && method.eq_ignore_ascii_case("HEAD"))
    }
}

impl FromStr for HttpMethod {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let method = value.to_ascii_lowercase();
        match method.as_str() {
            "get" => Ok(Self::Get),
            "patch" => Ok(Self::Patch),
            "put" => Ok(Self::Put),
            "delete" => Ok(Self::Delete),
            "post" => Ok(Self::Post),
            _ => Err(ConfigError::InvalidMethod(method)),
        }
    }
}

/// A declared route, parsed from `METHOD#/path/{param}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub method: HttpMethod,
    pub template: String,
    pub pattern: RoutePattern,
}

impl FromStr for RouteSpec {
    type Err = ConfigError;

    fn from_str(route: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = route.split('#').collect();
        let [method, template] = parts.as_slice() else {
            return Err(ConfigError::InvalidRoute(route.to_string()));
        };
        if method.is_empty() || template.is_empty() {
            return Err(ConfigError::InvalidRoute(route.to_string()));
        }

        Ok(Self {
            method: method.parse()?,
            template: (*template).to_string(),
            pattern: RoutePattern::from_template(template),
        })
    }
}

/// Default values the event builders fall back to.
///
/// Owned by the dispatcher and passed into every builder call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDefaults {
    pub resource: String,
    pub stage: String,
    pub region: String,
    pub account: String,
    pub queue_name: String,
    pub event_source: String,
    pub account_id_length: usize,
    pub api_id_length: usize,
    pub resource_id_length: usize,
    pub request_id_length: usize,
}

impl Default for EventDefaults {
    fn default() -> Self {
        Self {
            resource: "/api/v1/{proxy+}".to_string(),
            stage: "dev".to_string(),
            region: "us-east-2".to_string(),
            account: "1234567890".to_string(),
            queue_name: "local-queue".to_string(),
            event_source: "aws:sqs".to_string(),
            account_id_length: 5,
            api_id_length: 10,
            resource_id_length: 7,
            request_id_length: 30,
        }
    }
}

/// Validated adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    /// Empty means a single catch-all route.
    pub routes: Vec<RouteSpec>,
    pub port: u16,
    pub handler_name: String,
    pub debug: bool,
    pub handler_timeout: Option<Duration>,
    pub defaults: EventDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Api,
            routes: Vec::new(),
            port: 3000,
            handler_name: "handler".to_string(),
            debug: false,
            handler_timeout: None,
            defaults: EventDefaults::default(),
        }
    }
}

/// Command line arguments of the `lambda-local` binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "lambda-local")]
#[command(about = "Serve a Lambda handler locally behind API Gateway or SQS shaped events")]
pub struct Args {
    /// Handler export name to invoke
    #[arg(short = 'n', long = "handle-name", default_value = "handler")]
    pub handle_name: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// API routes, format METHOD#ROUTE, e.g. GET#/ping/{id}
    #[arg(short, long, num_args = 1..)]
    pub routes: Vec<String>,

    /// Log raw and translated events
    #[arg(short, long)]
    pub debug: bool,

    /// `api` or `sqs`
    #[arg(short, long, default_value = "api")]
    pub mode: String,

    /// Fail a request when the handler runs longer than this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(long, default_value = "us-east-2")]
    pub region: String,

    #[arg(long, default_value = "1234567890")]
    pub account: String,

    #[arg(long, default_value = "local-queue")]
    pub queue_name: String,

    #[arg(long, default_value = "dev")]
    pub stage: String,
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let mode: Mode = args.mode.parse()?;
        let routes = args
            .routes
            .iter()
            .map(|route| route.parse())
            .collect::<Result<Vec<RouteSpec>, _>>()?;

        Ok(Self {
            mode,
            routes,
            port: args.port,
            handler_name: args.handle_name,
            debug: args.debug,
            handler_timeout: args.timeout.map(Duration::from_secs),
            defaults: EventDefaults {
                stage: args.stage,
                region: args.region,
                account: args.account,
                queue_name: args.queue_name,
                ..EventDefaults::default()
            },
        })
    }
}
