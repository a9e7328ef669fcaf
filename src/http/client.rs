//! HTTP client for tunnel testing
//!
//! Wraps reqwest and classifies transport failures so callers can tell a
//! timeout from a refused connection.

use anyhow::{Context, Result};
use reqwest::{Client, Method, Url};
use std::io::ErrorKind;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Timeout after {:.1} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Connection failed to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

impl HttpError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Timeout(_))
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, HttpError::Connect { .. })
    }

    fn classify(error: reqwest::Error, url: &Url, timeout: Duration) -> Self {
        if error.is_timeout() {
            HttpError::Timeout(timeout)
        } else if error.is_connect() || is_connection_dropped(&error) {
            HttpError::Connect {
                url: url.to_string(),
                reason: root_cause(&error),
            }
        } else {
            HttpError::RequestFailed(root_cause(&error))
        }
    }
}

/// The peer reset or closed the connection before a response arrived
fn is_connection_dropped(error: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(error);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
                    | ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        if let Some(hyper_err) = err.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() || hyper_err.is_closed() {
                return true;
            }
        }
        source = err.source();
    }
    false
}

/// Innermost source message; reqwest's top-level text hides the useful part
fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut current = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

/// HTTP client for testing
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create client with a default per-request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Send HTTP request, bounded by `timeout` or the client default
    pub async fn send(
        &self,
        request: HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, HttpError> {
        let timeout = timeout.unwrap_or(self.default_timeout);
        debug!("Sending {} request to {}", request.method, request.url);

        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| HttpError::InvalidMethod(request.method.clone()))?;

        let mut req_builder = self
            .client
            .request(method, request.url.clone())
            .timeout(timeout);

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let start = Instant::now();

        let response = req_builder
            .send()
            .await
            .map_err(|e| HttpError::classify(e, &request.url, timeout))?;

        let status = response.status();

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(timeout)
            } else {
                HttpError::Body(root_cause(&e))
            }
        })?;

        let elapsed = start.elapsed();

        debug!(
            "Response: {} {} in {}ms",
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            elapsed.as_millis()
        );

        Ok(HttpResponse {
            status_code: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

/// HTTP request builder
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: String,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, url: Url) -> Self {
        Self {
            method: method.into(),
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// HTTP response
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
}

impl HttpResponse {
    /// Decode the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_http_request_builder() {
        let url = Url::parse("http://example.com/echo").unwrap();
        let req = HttpRequest::new("POST", url)
            .header("X-Custom", "value")
            .headers(vec![("User-Agent".to_string(), "test".to_string())])
            .body("{}");

        assert_eq!(req.method, "POST");
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_http_response_json() {
        let resp = HttpResponse {
            status_code: 200,
            body: r#"{"a": [1, 2]}"#.to_string(),
        };
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["a"][1], 2);
    }

    #[tokio::test]
    async fn test_refused_connection_is_classified() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = HttpClient::with_timeout(Duration::from_secs(2)).unwrap();
        let url = Url::parse(&format!("http://127.0.0.1:{port}/ping")).unwrap();

        let err = client.send(HttpRequest::new("GET", url), None).await.unwrap_err();
        assert!(err.is_connect(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_unknown_method_is_rejected() {
        let client = HttpClient::with_timeout(Duration::from_secs(1)).unwrap();
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = client
            .send(HttpRequest::new("BAD METHOD", url), None)
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::InvalidMethod(_)));
    }
}
