//! Run reporting
//!
//! Renders a finished run and maps it to a process exit code.

use std::io::Write;
use std::process::ExitCode;
use tracing::{info, warn};

use super::formatter::ResultFormatter;
use crate::models::RunSummary;

/// Renders summaries and decides the exit status
pub struct ResultReporter {
    formatter: ResultFormatter,
}

impl ResultReporter {
    pub fn new(formatter: ResultFormatter) -> Self {
        Self { formatter }
    }

    pub fn render(&self, summary: &RunSummary) -> String {
        self.formatter.format_summary(summary)
    }

    /// Write the rendered summary and log the trailing result line
    pub fn report<W: Write>(&self, summary: &RunSummary, out: &mut W) -> std::io::Result<()> {
        out.write_all(self.render(summary).as_bytes())?;
        out.flush()?;

        let line = format!(
            "Test Results: {} passed, {} failed",
            summary.passed, summary.failed
        );
        if summary.success {
            info!("{}", line);
            info!("All tests passed!");
        } else {
            warn!("{}", line);
            warn!("Some tests failed!");
        }
        Ok(())
    }
}

/// 0 when every scenario passed, 1 otherwise
pub fn exit_status(summary: &RunSummary) -> u8 {
    if summary.success {
        0
    } else {
        1
    }
}

pub fn exit_code(summary: &RunSummary) -> ExitCode {
    ExitCode::from(exit_status(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FailureKind, ScenarioResult};
    use crate::output::OutputFormat;

    fn run(results: Vec<ScenarioResult>) -> RunSummary {
        RunSummary::new("http://localhost:8001", "e2e-test-client", results)
    }

    #[test]
    fn test_exit_status_all_passed() {
        let summary = run(vec![
            ScenarioResult::pass("a", 1),
            ScenarioResult::pass("b", 2),
        ]);
        assert_eq!(exit_status(&summary), 0);
    }

    #[test]
    fn test_exit_status_with_failure() {
        let summary = run(vec![
            ScenarioResult::pass("a", 1),
            ScenarioResult::fail("b", 2, FailureKind::UnexpectedTransport, "timeout"),
        ]);
        assert_eq!(exit_status(&summary), 1);
    }

    #[test]
    fn test_report_writes_rendered_summary() {
        let reporter = ResultReporter::new(ResultFormatter::new(OutputFormat::Summary));
        let summary = run(vec![ScenarioResult::pass("Ping via prefix path", 4)]);

        let mut out = Vec::new();
        reporter.report(&summary, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text, reporter.render(&summary));
        assert!(text.contains("1/1 passed"));
    }

    #[test]
    fn test_json_report_is_parseable() {
        let summary = run(vec![
            ScenarioResult::pass("Ping via prefix path", 4),
            ScenarioResult::fail(
                "Non-existent client ID",
                9,
                FailureKind::AssertionMismatch,
                "Expected status >= 400, got status 200 with body 'pong'",
            ),
        ]);

        for format in [OutputFormat::Json, OutputFormat::JsonPretty] {
            let reporter = ResultReporter::new(ResultFormatter::new(format).no_color());
            let mut out = Vec::new();
            reporter.report(&summary, &mut out).unwrap();

            let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
            assert_eq!(value["total"], 2);
            assert_eq!(value["failed"], 1);
            assert_eq!(value["results"][1]["status"], "failed");
        }
    }
}
