//! Mock backend
//!
//! The deterministic service a tunnel forwards to. It exposes a fixed route
//! table covering status codes, header and body echo, JSON handling, large
//! payloads and artificial latency.

mod handlers;
mod routes;
mod server;

pub use handlers::{collect_headers, handle, BackendRequest, BackendResponse};
pub use routes::{Route, StatusRoute, SLOW_RESPONSE_DELAY};
pub use server::{BackendError, MockBackend};
