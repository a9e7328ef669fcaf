//! Output formatters for run results
//!
//! Provides Table, JSON and summary output formats.

use chrono::{DateTime, Utc};

use crate::models::{RunSummary, ScenarioResult};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Summary,
}

impl OutputFormat {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json-pretty",
            OutputFormat::Summary => "summary",
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a single scenario result
    pub fn format_result(&self, index: usize, result: &ScenarioResult) -> String {
        match self.format {
            OutputFormat::Table => self.format_result_table(index, result),
            OutputFormat::Json => serde_json::to_string(result).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::Summary => format!(
                "{} {} ({}ms)",
                result.outcome.symbol(),
                result.name,
                result.duration_ms
            ),
        }
    }

    fn format_result_table(&self, index: usize, result: &ScenarioResult) -> String {
        let status = match (result.passed(), self.colorize) {
            (true, true) => format!("{GREEN}✓ PASS{RESET}"),
            (false, true) => format!("{RED}✗ FAIL{RESET}"),
            (true, false) => "✓ PASS".to_string(),
            (false, false) => "✗ FAIL".to_string(),
        };

        format!(
            "{:2}. {:28} {} [{:>6}ms]",
            index + 1,
            result.name,
            status,
            result.duration_ms
        )
    }

    /// Format the whole run
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        self.format_summary_at(summary, Utc::now())
    }

    pub(crate) fn format_summary_at(&self, summary: &RunSummary, at: DateTime<Utc>) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary, at),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn format_summary_table(&self, summary: &RunSummary, at: DateTime<Utc>) -> String {
        let mut output = String::new();

        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!(" Trabas E2E - {}\n", summary.server_url));
        output.push_str(&format!(
            " Client: {} | {}\n",
            summary.client_id,
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        for (index, result) in summary.results.iter().enumerate() {
            output.push_str(&format!("  {}\n", self.format_result_table(index, result)));
            if let Some(kind) = result.failure_kind() {
                output.push_str(&format!("      {}: {}\n", kind, result.message()));
            }
        }

        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        let pass_str = if self.colorize {
            format!("{GREEN}{}{RESET}", summary.passed)
        } else {
            summary.passed.to_string()
        };
        let fail_str = if self.colorize && summary.failed > 0 {
            format!("{RED}{}{RESET}", summary.failed)
        } else {
            summary.failed.to_string()
        };

        output.push_str(&format!(
            "  Total: {:2} | Pass: {} | Fail: {}\n",
            summary.total, pass_str, fail_str
        ));
        output.push_str(&format!(
            "  Pass Rate: {:5.1}% | Duration: {}ms\n",
            summary.pass_rate(),
            summary.total_duration_ms
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        output
    }

    fn format_summary_brief(&self, summary: &RunSummary) -> String {
        let mut output = String::new();
        for (index, result) in summary.results.iter().enumerate() {
            output.push_str(&self.format_result(index, result));
            output.push('\n');
        }
        output.push_str(&format!(
            "{}: {}/{} passed ({:.1}%) in {}ms\n",
            summary.server_url,
            summary.passed,
            summary.total,
            summary.pass_rate(),
            summary.total_duration_ms
        ));
        output
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}
