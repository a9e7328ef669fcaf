//! Response schemas of the mock backend
//!
//! Each JSON endpoint has its own record so both the backend and the
//! assertions in tests agree on the shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Header name to value; repeated headers are joined with `", "`
pub type HeaderEcho = BTreeMap<String, String>;

/// Message returned by `GET /json`
pub const JSON_INFO_MESSAGE: &str = "Hello from mock server";

/// `GET /json`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonInfo {
    pub message: String,
    pub timestamp: i64,
    pub method: String,
    pub path: String,
}

/// `GET /headers`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadersEcho {
    pub headers: HeaderEcho,
    pub path: String,
}

/// `POST /echo`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoResponse {
    pub method: String,
    pub path: String,
    /// Raw request body
    pub body: String,
    pub headers: HeaderEcho,
    pub content_length: usize,
}

/// `POST /json-echo` on success
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JsonEchoResponse {
    pub received: Value,
    pub headers: HeaderEcho,
}

/// `POST /json-echo` on a malformed body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `PUT` on any path
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutEcho {
    pub method: String,
    pub path: String,
    pub body: String,
    pub headers: HeaderEcho,
}

/// `DELETE` on any path
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEcho {
    pub method: String,
    pub path: String,
    pub headers: HeaderEcho,
}

impl HeadersEcho {
    /// Case-insensitive header lookup
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
