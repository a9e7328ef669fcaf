//! Scenario result models
//!
//! Defines per-scenario results and the run summary folded from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a scenario failed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Status, body or timing diverged from the declared expectation
    AssertionMismatch,
    /// Timeout or connection failure where the scenario did not accept one
    UnexpectedTransport,
    /// Anything else: invalid URL, unreadable body, malformed response
    RunnerFault,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::AssertionMismatch => write!(f, "assertion mismatch"),
            FailureKind::UnexpectedTransport => write!(f, "transport failure"),
            FailureKind::RunnerFault => write!(f, "runner fault"),
        }
    }
}

/// Terminal outcome of one scenario
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScenarioOutcome {
    Passed,
    Failed { kind: FailureKind, message: String },
}

impl ScenarioOutcome {
    pub fn symbol(&self) -> &'static str {
        match self {
            ScenarioOutcome::Passed => "✓",
            ScenarioOutcome::Failed { .. } => "✗",
        }
    }
}

/// Result of a single scenario execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    #[serde(flatten)]
    pub outcome: ScenarioOutcome,
    pub duration_ms: u64,
}

impl ScenarioResult {
    pub fn pass(name: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            name: name.into(),
            outcome: ScenarioOutcome::Passed,
            duration_ms,
        }
    }

    pub fn fail(
        name: impl Into<String>,
        duration_ms: u64,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            outcome: ScenarioOutcome::Failed {
                kind,
                message: message.into(),
            },
            duration_ms,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self.outcome, ScenarioOutcome::Passed)
    }

    /// Failure message, empty on pass
    pub fn message(&self) -> &str {
        match &self.outcome {
            ScenarioOutcome::Passed => "",
            ScenarioOutcome::Failed { message, .. } => message,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            ScenarioOutcome::Passed => None,
            ScenarioOutcome::Failed { kind, .. } => Some(*kind),
        }
    }
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.outcome.symbol(),
            self.name,
            self.duration_ms
        )?;
        if let ScenarioOutcome::Failed { kind, message } = &self.outcome {
            write!(f, " - {kind}: {message}")?;
        }
        Ok(())
    }
}

/// Summary of one pass over the scenario catalog
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub server_url: String,
    pub client_id: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub success: bool,
    pub total_duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

impl RunSummary {
    pub fn new(
        server_url: impl Into<String>,
        client_id: impl Into<String>,
        results: Vec<ScenarioResult>,
    ) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed()).count();
        let failed = total - passed;
        let total_duration_ms = results.iter().map(|r| r.duration_ms).sum();

        Self {
            server_url: server_url.into(),
            client_id: client_id.into(),
            total,
            passed,
            failed,
            success: failed == 0,
            total_duration_ms,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.results.iter().filter(|r| !r.passed())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tunnel {} (client {})", self.server_url, self.client_id)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Test Results: {} passed, {} failed",
            self.passed, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_creation() {
        let result = ScenarioResult::pass("Ping", 100);
        assert!(result.passed());
        assert_eq!(result.message(), "");
        assert_eq!(result.failure_kind(), None);
    }

    #[test]
    fn test_failed_result_carries_message() {
        let result = ScenarioResult::fail(
            "Ping",
            12,
            FailureKind::AssertionMismatch,
            "expected status 200, got 502",
        );
        assert!(!result.passed());
        assert_eq!(result.message(), "expected status 200, got 502");
        assert_eq!(result.failure_kind(), Some(FailureKind::AssertionMismatch));
        assert!(result.to_string().contains("assertion mismatch"));
    }

    #[test]
    fn test_run_summary_counts() {
        let results = vec![
            ScenarioResult::pass("Ping", 100),
            ScenarioResult::fail("Slow", 50, FailureKind::UnexpectedTransport, "timeout"),
            ScenarioResult::pass("Headers", 20),
        ];

        let summary = RunSummary::new("http://localhost:8001", "client", results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.passed + summary.failed, summary.results.len());
        assert!(!summary.success);
        assert_eq!(summary.total_duration_ms, 170);
        assert_eq!(summary.failures().count(), 1);
    }

    #[test]
    fn test_empty_summary_is_success() {
        let summary = RunSummary::new("http://localhost:8001", "client", Vec::new());
        assert!(summary.success);
        assert_eq!(summary.pass_rate(), 0.0);
    }

    #[test]
    fn test_result_serializes_flat() {
        let result = ScenarioResult::fail("Ping", 5, FailureKind::RunnerFault, "bad body");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["kind"], "runner_fault");
        assert_eq!(value["message"], "bad body");
        assert_eq!(value["name"], "Ping");
    }
}
