//! Output module
//!
//! Formats run summaries and maps them to exit codes.

mod formatter;
mod reporter;

pub use formatter::{OutputFormat, ResultFormatter};
pub use reporter::{exit_code, exit_status, ResultReporter};
