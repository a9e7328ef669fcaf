//! Outcome evaluation
//!
//! Turns what the tunnel did (a response or a transport error) into a
//! verdict against the scenario's expected outcome. Pure; no I/O.

use serde_json::Value;
use std::fmt;
use std::time::Duration;

use crate::http::{HttpError, HttpResponse};
use crate::models::{
    AcceptableOutcome, BodyMatcher, Expectation, ExpectedOutcome, FailureKind, JsonAssertion,
};

/// Longest excerpt of an observed value quoted in a failure message
const EXCERPT_LEN: usize = 120;

/// Why a scenario did not pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    fn mismatch(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::AssertionMismatch,
            message: message.into(),
        }
    }

    fn fault(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::RunnerFault,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Evaluate one observation against the expected outcome
pub fn evaluate(
    expected: &ExpectedOutcome,
    observed: &Result<HttpResponse, HttpError>,
    elapsed: Duration,
) -> Result<(), Failure> {
    match expected {
        ExpectedOutcome::Single(expectation) => match observed {
            Ok(response) => check_expectation(expectation, response, elapsed),
            Err(error) => Err(transport_failure(error)),
        },
        ExpectedOutcome::AnyOf(acceptable) => check_any_of(acceptable, observed),
    }
}

fn transport_failure(error: &HttpError) -> Failure {
    let kind = if error.is_timeout() || error.is_connect() {
        FailureKind::UnexpectedTransport
    } else {
        FailureKind::RunnerFault
    };
    Failure {
        kind,
        message: error.to_string(),
    }
}

fn check_any_of(
    acceptable: &[AcceptableOutcome],
    observed: &Result<HttpResponse, HttpError>,
) -> Result<(), Failure> {
    let matched = match observed {
        Ok(response) => acceptable.iter().any(|outcome| {
            matches!(outcome, AcceptableOutcome::StatusAtLeast(min) if response.status_code >= *min)
        }),
        Err(error) if error.is_timeout() => acceptable.contains(&AcceptableOutcome::TimedOut),
        Err(error) if error.is_connect() => {
            acceptable.contains(&AcceptableOutcome::ConnectionFailed)
        }
        Err(error) => return Err(Failure::fault(error.to_string())),
    };

    if matched {
        return Ok(());
    }

    let wanted = acceptable
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ");

    match observed {
        Ok(response) => Err(Failure::mismatch(format!(
            "Expected {wanted}, got status {} with body '{}'",
            response.status_code,
            excerpt(&response.body)
        ))),
        Err(error) => Err(Failure {
            kind: FailureKind::UnexpectedTransport,
            message: format!("Expected {wanted}, got {error}"),
        }),
    }
}

fn check_expectation(
    expectation: &Expectation,
    response: &HttpResponse,
    elapsed: Duration,
) -> Result<(), Failure> {
    if response.status_code != expectation.status {
        return Err(Failure::mismatch(format!(
            "Expected status {}, got {}",
            expectation.status, response.status_code
        )));
    }

    check_body(&expectation.body, response)?;

    if let Some(bounds) = &expectation.timing {
        if !bounds.contains(elapsed) {
            return Err(Failure::mismatch(format!(
                "Expected duration in [{:.2}s, {:.2}s), took {:.2}s",
                bounds.lower.as_secs_f64(),
                bounds.upper.as_secs_f64(),
                elapsed.as_secs_f64()
            )));
        }
    }

    Ok(())
}

fn check_body(matcher: &BodyMatcher, response: &HttpResponse) -> Result<(), Failure> {
    let body = response.body.as_str();
    match matcher {
        BodyMatcher::Any => Ok(()),
        BodyMatcher::Text(expected) => {
            if body == expected {
                Ok(())
            } else {
                Err(Failure::mismatch(format!(
                    "Expected '{}', got '{}'",
                    excerpt(expected),
                    excerpt(body)
                )))
            }
        }
        BodyMatcher::Json(expected) => {
            let actual = parse_json(response)?;
            if &actual == expected {
                Ok(())
            } else {
                Err(Failure::mismatch(format!(
                    "Expected JSON {}, got {}",
                    excerpt(&expected.to_string()),
                    excerpt(&actual.to_string())
                )))
            }
        }
        BodyMatcher::JsonAssertions(assertions) => {
            let actual = parse_json(response)?;
            assertions
                .iter()
                .try_for_each(|assertion| check_assertion(assertion, &actual))
        }
    }
}

fn parse_json(response: &HttpResponse) -> Result<Value, Failure> {
    response.json().map_err(|e| {
        Failure::fault(format!(
            "Response body is not valid JSON ({e}): '{}'",
            excerpt(&response.body)
        ))
    })
}

fn field<'a>(document: &'a Value, pointer: &str) -> Result<&'a Value, Failure> {
    document
        .pointer(pointer)
        .ok_or_else(|| Failure::mismatch(format!("Response is missing field '{pointer}'")))
}

fn check_assertion(assertion: &JsonAssertion, document: &Value) -> Result<(), Failure> {
    match assertion {
        JsonAssertion::Equals { pointer, value } => {
            let actual = field(document, pointer)?;
            if actual == value {
                Ok(())
            } else {
                Err(Failure::mismatch(format!(
                    "Field '{pointer}': expected {}, got {}",
                    excerpt(&value.to_string()),
                    excerpt(&actual.to_string())
                )))
            }
        }
        JsonAssertion::Present { pointer } => field(document, pointer).map(|_| ()),
        JsonAssertion::EncodedEquals { pointer, value } => {
            let raw = field(document, pointer)?
                .as_str()
                .ok_or_else(|| Failure::mismatch(format!("Field '{pointer}' is not a string")))?;
            let decoded: Value = serde_json::from_str(raw).map_err(|e| {
                Failure::mismatch(format!("Field '{pointer}' does not hold JSON: {e}"))
            })?;
            if &decoded == value {
                Ok(())
            } else {
                Err(Failure::mismatch(format!(
                    "Field '{pointer}' was not transmitted correctly: expected {}, got {}",
                    excerpt(&value.to_string()),
                    excerpt(raw)
                )))
            }
        }
        JsonAssertion::Length { pointer, len } => {
            let actual = field(document, pointer)?
                .as_array()
                .ok_or_else(|| Failure::mismatch(format!("Field '{pointer}' is not an array")))?
                .len();
            if actual == *len {
                Ok(())
            } else {
                Err(Failure::mismatch(format!(
                    "Field '{pointer}': expected {len} elements, got {actual}"
                )))
            }
        }
        JsonAssertion::HeaderEquals { name, value } => {
            let headers = field(document, "/headers")?
                .as_object()
                .ok_or_else(|| Failure::mismatch("Field '/headers' is not an object"))?;
            let actual = headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
                .ok_or_else(|| Failure::mismatch(format!("Header '{name}' not forwarded")))?;
            if actual.as_str() == Some(value.as_str()) {
                Ok(())
            } else {
                Err(Failure::mismatch(format!(
                    "Header '{name}': expected '{value}', got {actual}"
                )))
            }
        }
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_LEN {
        text.to_string()
    } else {
        let head: String = text.chars().take(EXCERPT_LEN).collect();
        format!("{head}...")
    }
}
