//! Data models for tunnel verification
//!
//! This module contains all data structures used throughout the application.

mod backend;
mod scenario;
mod test_result;

pub use backend::{
    DeleteEcho, EchoResponse, ErrorBody, HeaderEcho, HeadersEcho, JsonEchoResponse, JsonInfo,
    PutEcho, JSON_INFO_MESSAGE,
};
pub use scenario::{
    AcceptableOutcome, AddressingMode, BodyMatcher, ClientTarget, Expectation, ExpectedOutcome,
    JsonAssertion, RequestSpec, ScenarioDefinition, TimingBounds, CLIENT_ID_QUERY_PARAM,
};
pub use test_result::{FailureKind, RunSummary, ScenarioOutcome, ScenarioResult};
