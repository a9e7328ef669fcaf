//! Scenario definition models
//!
//! A scenario pairs one request shape with the outcome the tunnel must
//! produce for it.

use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Query parameter the tunnel reads the client identifier from
pub const CLIENT_ID_QUERY_PARAM: &str = "trabas_client_id";

/// How the client identifier reaches the tunnel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    /// `{base}/{client_id}{path}`
    PathPrefix,
    /// `{base}{path}?trabas_client_id={client_id}`
    QueryParam,
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressingMode::PathPrefix => write!(f, "path-prefix"),
            AddressingMode::QueryParam => write!(f, "query-param"),
        }
    }
}

/// Which client identifier a scenario addresses
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientTarget {
    /// The identifier the runner was configured with
    Configured,
    /// A fixed identifier, e.g. one the tunnel does not know
    Fixed(String),
}

impl ClientTarget {
    pub fn resolve<'a>(&'a self, configured: &'a str) -> &'a str {
        match self {
            ClientTarget::Configured => configured,
            ClientTarget::Fixed(id) => id,
        }
    }
}

/// Request descriptor
#[derive(Clone, Debug)]
pub struct RequestSpec {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub addressing: AddressingMode,
    pub client: ClientTarget,
}

impl RequestSpec {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: Vec::new(),
            body: None,
            addressing: AddressingMode::PathPrefix,
            client: ClientTarget::Configured,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new("PUT", path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new("DELETE", path)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body and the matching content type
    pub fn json(self, payload: &Value) -> Self {
        let mut spec = self.header("Content-Type", "application/json");
        spec.body = Some(payload.to_string());
        spec
    }

    pub fn addressing(mut self, mode: AddressingMode) -> Self {
        self.addressing = mode;
        self
    }

    pub fn client(mut self, client: ClientTarget) -> Self {
        self.client = client;
        self
    }
}

/// Assertion on a JSON response field addressed by JSON pointer
#[derive(Clone, Debug, PartialEq)]
pub enum JsonAssertion {
    /// Field equals the value structurally
    Equals { pointer: String, value: Value },
    /// Field exists
    Present { pointer: String },
    /// Field is a string holding JSON that structurally equals the value
    EncodedEquals { pointer: String, value: Value },
    /// Field is an array of the given length
    Length { pointer: String, len: usize },
    /// The `headers` object carries the header with exactly this value.
    /// Header names compare case-insensitively.
    HeaderEquals { name: String, value: String },
}

impl JsonAssertion {
    pub fn equals(pointer: impl Into<String>, value: Value) -> Self {
        JsonAssertion::Equals {
            pointer: pointer.into(),
            value,
        }
    }

    pub fn present(pointer: impl Into<String>) -> Self {
        JsonAssertion::Present {
            pointer: pointer.into(),
        }
    }

    pub fn encoded_equals(pointer: impl Into<String>, value: Value) -> Self {
        JsonAssertion::EncodedEquals {
            pointer: pointer.into(),
            value,
        }
    }

    pub fn length(pointer: impl Into<String>, len: usize) -> Self {
        JsonAssertion::Length {
            pointer: pointer.into(),
            len,
        }
    }

    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        JsonAssertion::HeaderEquals {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// How the response body is checked
#[derive(Clone, Debug, PartialEq)]
pub enum BodyMatcher {
    Any,
    /// Exact string equality
    Text(String),
    /// Structural equality, key order ignored
    Json(Value),
    /// Every assertion must hold
    JsonAssertions(Vec<JsonAssertion>),
}

/// Elapsed time window `[lower, upper)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingBounds {
    pub lower: Duration,
    pub upper: Duration,
}

impl TimingBounds {
    pub fn new(lower: Duration, upper: Duration) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, elapsed: Duration) -> bool {
        elapsed >= self.lower && elapsed < self.upper
    }
}

/// A single expected response
#[derive(Clone, Debug, PartialEq)]
pub struct Expectation {
    pub status: u16,
    pub body: BodyMatcher,
    pub timing: Option<TimingBounds>,
}

impl Expectation {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: BodyMatcher::Any,
            timing: None,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body = BodyMatcher::Text(text.into());
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.body = BodyMatcher::Json(value);
        self
    }

    pub fn assertions(mut self, assertions: Vec<JsonAssertion>) -> Self {
        self.body = BodyMatcher::JsonAssertions(assertions);
        self
    }

    pub fn within(mut self, lower: Duration, upper: Duration) -> Self {
        self.timing = Some(TimingBounds::new(lower, upper));
        self
    }
}

/// One member of a disjunctive outcome set
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcceptableOutcome {
    /// Any response whose status is at least this
    StatusAtLeast(u16),
    TimedOut,
    ConnectionFailed,
}

impl fmt::Display for AcceptableOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceptableOutcome::StatusAtLeast(min) => write!(f, "status >= {min}"),
            AcceptableOutcome::TimedOut => write!(f, "timeout"),
            AcceptableOutcome::ConnectionFailed => write!(f, "connection failure"),
        }
    }
}

/// What a scenario expects from the tunnel
#[derive(Clone, Debug, PartialEq)]
pub enum ExpectedOutcome {
    Single(Expectation),
    AnyOf(Vec<AcceptableOutcome>),
}

impl ExpectedOutcome {
    /// The tunnel must reject the request one way or another
    pub fn rejected() -> Self {
        ExpectedOutcome::AnyOf(vec![
            AcceptableOutcome::StatusAtLeast(400),
            AcceptableOutcome::TimedOut,
            AcceptableOutcome::ConnectionFailed,
        ])
    }

    pub fn accepts(&self, outcome: AcceptableOutcome) -> bool {
        matches!(self, ExpectedOutcome::AnyOf(set) if set.contains(&outcome))
    }
}

/// Immutable scenario record
#[derive(Clone, Debug)]
pub struct ScenarioDefinition {
    pub name: String,
    pub request: RequestSpec,
    pub expected: ExpectedOutcome,
    /// Overrides the runner's per-request timeout
    pub timeout: Option<Duration>,
}

impl ScenarioDefinition {
    pub fn new(name: impl Into<String>, request: RequestSpec, expected: ExpectedOutcome) -> Self {
        Self {
            name: name.into(),
            request,
            expected,
            timeout: None,
        }
    }

    pub fn expect(name: impl Into<String>, request: RequestSpec, expected: Expectation) -> Self {
        Self::new(name, request, ExpectedOutcome::Single(expected))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Display for ScenarioDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {} via {})",
            self.name, self.request.method, self.request.path, self.request.addressing
        )
    }
}
