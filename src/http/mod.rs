//! HTTP client module for tunnel testing
//!
//! Provides HTTP client functionality for driving requests through the tunnel.

mod client;

pub use client::{HttpClient, HttpError, HttpRequest, HttpResponse};
