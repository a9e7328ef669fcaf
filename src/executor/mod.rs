//! Test execution engine
//!
//! Runs the scenario catalog sequentially and evaluates each outcome.

mod evaluate;
mod runner;

pub use evaluate::{evaluate, Failure};
pub use runner::{build_url, TestRunner};
