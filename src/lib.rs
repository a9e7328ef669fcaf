//! Trabas E2E - end-to-end verification harness for the Trabas tunnel
//!
//! Two programs share this library:
//!
//! - `mock-backend`: a deterministic HTTP server that sits behind the tunnel
//!   and echoes what it receives.
//! - `trabas-e2e`: sends a fixed catalog of scenarios through the tunnel's
//!   public entry point and checks every response.
//!
//! ## Usage
//!
//! ```bash
//! # Start the backend the tunnel client forwards to
//! mock-backend --port 3000
//!
//! # Run the catalog through the tunnel server
//! trabas-e2e --server-url http://localhost:8001 --client-id e2e-test-client
//!
//! # Show the scenarios without running them
//! trabas-e2e --list
//! ```

pub mod backend;
pub mod cli;
pub mod config;
pub mod executor;
pub mod http;
pub mod models;
pub mod output;
pub mod scenarios;
pub mod utils;
