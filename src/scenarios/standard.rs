//! The standard tunnel scenarios
//!
//! Grouped the way the tunnel is exercised: client addressing, HTTP methods,
//! protocol preservation (headers, status codes, latency, payload size) and
//! negative addressing.

use serde_json::{json, Value};
use std::time::Duration;

use crate::models::{
    AddressingMode, ClientTarget, Expectation, ExpectedOutcome, JsonAssertion, RequestSpec,
    ScenarioDefinition, JSON_INFO_MESSAGE,
};

/// Client identifier that no tunnel registry is expected to contain
pub const NONEXISTENT_CLIENT_ID: &str = "nonexistent-client";

/// Timeout for the slow scenario; its expected duration nears the default
pub const SLOW_SCENARIO_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for the negative addressing scenario
pub const NONEXISTENT_CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

pub const LARGE_PAYLOAD_CHARS: usize = 10_000;
pub const LARGE_PAYLOAD_NUMBERS: usize = 1_000;

/// Custom header sent by the header forwarding scenario
pub const CUSTOM_HEADER: (&str, &str) = ("X-Custom-Header", "test-value");
pub const TEST_USER_AGENT: &str = "TrabasE2ETest/1.0";

pub fn all() -> Vec<ScenarioDefinition> {
    let mut scenarios = Vec::new();
    scenarios.extend(addressing());
    scenarios.extend(methods());
    scenarios.extend(protocol());
    scenarios.push(nonexistent_client());
    scenarios
}

fn addressing() -> Vec<ScenarioDefinition> {
    vec![
        ScenarioDefinition::expect(
            "Ping via prefix path",
            RequestSpec::get("/ping"),
            Expectation::status(200).text("pong"),
        ),
        ScenarioDefinition::expect(
            "Ping via query parameter",
            RequestSpec::get("/ping").addressing(AddressingMode::QueryParam),
            Expectation::status(200).text("pong"),
        ),
        ScenarioDefinition::expect(
            "JSON response handling",
            RequestSpec::get("/json"),
            Expectation::status(200).assertions(vec![
                JsonAssertion::equals("/message", json!(JSON_INFO_MESSAGE)),
                JsonAssertion::present("/timestamp"),
                JsonAssertion::equals("/method", json!("GET")),
                JsonAssertion::equals("/path", json!("/json")),
            ]),
        ),
    ]
}

fn methods() -> Vec<ScenarioDefinition> {
    let post_payload = json!({"test": "data", "number": 42, "nested": {"key": "value"}});
    let put_payload = json!({"action": "update", "id": 123});

    vec![
        ScenarioDefinition::expect(
            "POST request tunneling",
            RequestSpec::post("/echo").json(&post_payload),
            Expectation::status(200).assertions(vec![
                JsonAssertion::equals("/method", json!("POST")),
                JsonAssertion::equals("/path", json!("/echo")),
                JsonAssertion::encoded_equals("/body", post_payload),
            ]),
        ),
        ScenarioDefinition::expect(
            "PUT request tunneling",
            RequestSpec::put("/resource/123").json(&put_payload),
            Expectation::status(200).assertions(vec![
                JsonAssertion::equals("/method", json!("PUT")),
                JsonAssertion::equals("/path", json!("/resource/123")),
                JsonAssertion::encoded_equals("/body", put_payload),
            ]),
        ),
        ScenarioDefinition::expect(
            "DELETE request tunneling",
            RequestSpec::delete("/resource/123"),
            Expectation::status(200).assertions(vec![
                JsonAssertion::equals("/method", json!("DELETE")),
                JsonAssertion::equals("/path", json!("/resource/123")),
            ]),
        ),
    ]
}

fn protocol() -> Vec<ScenarioDefinition> {
    let (header_name, header_value) = CUSTOM_HEADER;

    let mut scenarios = vec![ScenarioDefinition::expect(
        "Headers forwarding",
        RequestSpec::get("/headers")
            .header(header_name, header_value)
            .header("User-Agent", TEST_USER_AGENT),
        Expectation::status(200).assertions(vec![
            JsonAssertion::header(header_name, header_value),
            JsonAssertion::header("User-Agent", TEST_USER_AGENT),
            JsonAssertion::equals("/path", json!("/headers")),
        ]),
    )];

    for (status, reason) in [
        (201, "Created"),
        (400, "Bad Request"),
        (500, "Internal Server Error"),
    ] {
        scenarios.push(ScenarioDefinition::expect(
            format!("Status code {status}"),
            RequestSpec::get(format!("/status/{status}")),
            Expectation::status(status).text(reason),
        ));
    }

    scenarios.push(
        ScenarioDefinition::expect(
            "Slow request handling",
            RequestSpec::get("/slow"),
            Expectation::status(200)
                .text("slow response")
                .within(Duration::from_secs(1), Duration::from_secs(5)),
        )
        .with_timeout(SLOW_SCENARIO_TIMEOUT),
    );

    let large = large_payload();
    scenarios.push(ScenarioDefinition::expect(
        "Large payload handling",
        RequestSpec::post("/json-echo").json(&large),
        Expectation::status(200).assertions(vec![
            JsonAssertion::equals("/received", large),
            JsonAssertion::length("/received/numbers", LARGE_PAYLOAD_NUMBERS),
        ]),
    ));

    scenarios
}

fn nonexistent_client() -> ScenarioDefinition {
    ScenarioDefinition::new(
        "Non-existent client ID",
        RequestSpec::get("/ping").client(ClientTarget::Fixed(NONEXISTENT_CLIENT_ID.to_string())),
        ExpectedOutcome::rejected(),
    )
    .with_timeout(NONEXISTENT_CLIENT_TIMEOUT)
}

/// 10 000 characters, 1000 ordered numbers and a nested object
pub fn large_payload() -> Value {
    json!({
        "data": "x".repeat(LARGE_PAYLOAD_CHARS),
        "numbers": (0..LARGE_PAYLOAD_NUMBERS).collect::<Vec<_>>(),
        "metadata": {
            "size": "large",
            "test": true
        }
    })
}
