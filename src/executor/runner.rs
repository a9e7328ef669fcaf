//! Test execution runner
//!
//! Manages the sequential execution of the scenario catalog through the
//! tunnel.

use anyhow::Result;
use reqwest::Url;
use std::time::Duration;
use tracing::{info, warn};

use super::evaluate::{evaluate, Failure};
use crate::config::RunnerConfig;
use crate::http::{HttpClient, HttpError, HttpRequest};
use crate::models::{
    AddressingMode, RequestSpec, RunSummary, ScenarioDefinition, ScenarioResult,
    CLIENT_ID_QUERY_PARAM,
};
use crate::scenarios::ScenarioCatalog;
use crate::utils::timer::Timer;

/// Test runner for tunnel scenarios
pub struct TestRunner {
    base_url: Url,
    server_url: String,
    client_id: String,
    grace_period: Duration,
    client: HttpClient,
}

impl TestRunner {
    /// Create a new test runner from validated configuration
    pub fn new(config: &RunnerConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::with_timeout(config.timeout())?;

        Ok(Self {
            base_url: config.base_url()?,
            server_url: config.normalized_server_url().to_string(),
            client_id: config.client_id.clone(),
            grace_period: config.grace_period(),
            client,
        })
    }

    /// Override the startup grace period
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Run every scenario in catalog order
    pub async fn run(&self, catalog: &ScenarioCatalog) -> RunSummary {
        info!("Starting Trabas End-to-End Tests");
        info!("Server URL: {}", self.server_url);
        info!("Client ID: {}", self.client_id);
        info!("Timeout: {}s", self.client.default_timeout().as_secs());
        info!("{}", "-".repeat(50));

        if !self.grace_period.is_zero() {
            info!(
                "Waiting {}s for services to stabilize",
                self.grace_period.as_secs()
            );
            tokio::time::sleep(self.grace_period).await;
        }

        let mut results = Vec::with_capacity(catalog.len());
        for scenario in catalog {
            results.push(self.run_scenario(scenario).await);
        }

        info!("{}", "-".repeat(50));
        RunSummary::new(&self.server_url, &self.client_id, results)
    }

    /// Run a single scenario; never fails, faults become failure records
    pub async fn run_scenario(&self, scenario: &ScenarioDefinition) -> ScenarioResult {
        info!("Running {}...", scenario.name);
        let timer = Timer::start(&scenario.name);

        let observed = match self.build_request(&scenario.request) {
            Ok(request) => self.client.send(request, scenario.timeout).await,
            Err(e) => Err(e),
        };
        let elapsed = timer.stop();
        let duration_ms = elapsed.as_millis() as u64;

        let result = match evaluate(&scenario.expected, &observed, elapsed) {
            Ok(()) => ScenarioResult::pass(&scenario.name, duration_ms),
            Err(Failure { kind, message }) => {
                ScenarioResult::fail(&scenario.name, duration_ms, kind, message)
            }
        };

        if result.passed() {
            info!("✓ {} PASSED", result.name);
        } else {
            warn!("✗ {} FAILED: {}", result.name, result.message());
        }

        result
    }

    /// Compose the full request for a scenario
    pub fn build_request(&self, spec: &RequestSpec) -> Result<HttpRequest, HttpError> {
        let url = build_url(&self.base_url, spec, &self.client_id)?;
        let mut request = HttpRequest::new(&spec.method, url).headers(spec.headers.clone());
        if let Some(body) = &spec.body {
            request = request.body(body.clone());
        }
        Ok(request)
    }
}

/// Place the client identifier according to the addressing mode
pub fn build_url(
    base: &Url,
    spec: &RequestSpec,
    configured_client: &str,
) -> Result<Url, HttpError> {
    let base = base.as_str().trim_end_matches('/');
    let client_id = spec.client.resolve(configured_client);
    let path = if spec.path.starts_with('/') {
        spec.path.clone()
    } else {
        format!("/{}", spec.path)
    };

    let parse = |raw: String| {
        Url::parse(&raw).map_err(|e| HttpError::InvalidUrl(format!("{raw}: {e}")))
    };

    match spec.addressing {
        AddressingMode::PathPrefix => parse(format!("{base}/{client_id}{path}")),
        AddressingMode::QueryParam => {
            let mut url = parse(format!("{base}{path}"))?;
            url.query_pairs_mut()
                .append_pair(CLIENT_ID_QUERY_PARAM, client_id);
            Ok(url)
        }
    }
}
