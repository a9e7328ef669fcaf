//! Route table of the mock backend
//!
//! Requests resolve to a tagged [`Route`] by ordered matching on
//! (method, path). Dispatch only looks at the URI path, never the query.

use hyper::{Method, StatusCode};
use std::fmt;
use std::time::Duration;

/// How long `GET /slow` holds the connection before answering
pub const SLOW_RESPONSE_DELAY: Duration = Duration::from_secs(1);

/// Status codes served by `GET /status/{code}`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusRoute {
    Created,
    BadRequest,
    InternalServerError,
}

impl StatusRoute {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "201" => Some(StatusRoute::Created),
            "400" => Some(StatusRoute::BadRequest),
            "500" => Some(StatusRoute::InternalServerError),
            _ => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            StatusRoute::Created => StatusCode::CREATED,
            StatusRoute::BadRequest => StatusCode::BAD_REQUEST,
            StatusRoute::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed body returned with the status
    pub fn reason(&self) -> &'static str {
        match self {
            StatusRoute::Created => "Created",
            StatusRoute::BadRequest => "Bad Request",
            StatusRoute::InternalServerError => "Internal Server Error",
        }
    }

    pub fn all() -> [StatusRoute; 3] {
        [
            StatusRoute::Created,
            StatusRoute::BadRequest,
            StatusRoute::InternalServerError,
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Ping,
    JsonInfo,
    Slow,
    Headers,
    Status(StatusRoute),
    Echo,
    JsonEcho,
    Put,
    Delete,
    NotFound,
}

impl Route {
    pub fn resolve(method: &Method, path: &str) -> Route {
        match (method, path) {
            (&Method::GET, "/ping") => Route::Ping,
            (&Method::GET, "/json") => Route::JsonInfo,
            (&Method::GET, "/slow") => Route::Slow,
            (&Method::GET, "/headers") => Route::Headers,
            (&Method::GET, _) => path
                .strip_prefix("/status/")
                .and_then(StatusRoute::from_code)
                .map_or(Route::NotFound, Route::Status),
            (&Method::POST, "/echo") => Route::Echo,
            (&Method::POST, "/json-echo") => Route::JsonEcho,
            (&Method::PUT, _) => Route::Put,
            (&Method::DELETE, _) => Route::Delete,
            _ => Route::NotFound,
        }
    }

    /// Artificial latency applied before the response is produced
    pub fn delay(&self) -> Option<Duration> {
        match self {
            Route::Slow => Some(SLOW_RESPONSE_DELAY),
            _ => None,
        }
    }

    /// Endpoint listing for the startup banner
    pub fn endpoints() -> &'static [(&'static str, &'static str, &'static str)] {
        &[
            ("GET", "/ping", "Simple ping/pong"),
            ("GET", "/json", "JSON response with timestamp"),
            ("GET", "/slow", "Slow response (1 second)"),
            ("GET", "/headers", "Echo headers"),
            ("GET", "/status/{code}", "Return 201, 400 or 500"),
            ("POST", "/echo", "Echo request details"),
            ("POST", "/json-echo", "Echo JSON body"),
            ("PUT", "/*", "Echo PUT request"),
            ("DELETE", "/*", "Echo DELETE request"),
        ]
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Ping => write!(f, "ping"),
            Route::JsonInfo => write!(f, "json"),
            Route::Slow => write!(f, "slow"),
            Route::Headers => write!(f, "headers"),
            Route::Status(s) => write!(f, "status/{}", s.status().as_u16()),
            Route::Echo => write!(f, "echo"),
            Route::JsonEcho => write!(f, "json-echo"),
            Route::Put => write!(f, "put"),
            Route::Delete => write!(f, "delete"),
            Route::NotFound => write!(f, "not-found"),
        }
    }
}
