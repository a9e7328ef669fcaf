//! Route handlers
//!
//! Every handler is a total function of the buffered request. Malformed
//! input is answered with a 400, never with a panic.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use hyper::{Method, Response, StatusCode, Uri};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::routes::Route;
use crate::models::{
    DeleteEcho, EchoResponse, ErrorBody, HeaderEcho, HeadersEcho, JsonEchoResponse, JsonInfo,
    PutEcho, JSON_INFO_MESSAGE,
};

const TEXT_PLAIN: &str = "text/plain";
const APPLICATION_JSON: &str = "application/json";

/// Fully buffered request as seen by the handlers
#[derive(Clone, Debug)]
pub struct BackendRequest {
    pub method: String,
    /// Path and query exactly as received
    pub path: String,
    pub headers: HeaderEcho,
    pub body: Bytes,
    /// Unix seconds at which the request was received
    pub received_at: i64,
}

impl BackendRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HeaderEcho::new(),
            body: Bytes::new(),
            received_at: 0,
        }
    }

    pub fn from_head(
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Bytes,
        received_at: i64,
    ) -> Self {
        let path = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());

        Self {
            method: method.to_string(),
            path,
            headers: collect_headers(headers),
            body,
            received_at,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Flatten a header map, joining repeated values with `", "`
pub fn collect_headers(headers: &HeaderMap) -> HeaderEcho {
    let mut echo = HeaderEcho::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        echo.entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    echo
}

/// Response produced by a handler
#[derive(Clone, Debug, PartialEq)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Bytes,
}

impl BackendResponse {
    pub fn text(status: StatusCode, text: &str) -> Self {
        Self {
            status,
            content_type: TEXT_PLAIN,
            body: Bytes::copy_from_slice(text.as_bytes()),
        }
    }

    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Self {
        match serde_json::to_vec_pretty(payload) {
            Ok(body) => Self {
                status,
                content_type: APPLICATION_JSON,
                body: Bytes::from(body),
            },
            Err(e) => {
                warn!("Failed to serialize response body: {}", e);
                Self::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or("")
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        response
    }
}

/// Produce the response for a resolved route
pub fn handle(route: Route, request: &BackendRequest) -> BackendResponse {
    match route {
        Route::Ping => BackendResponse::text(StatusCode::OK, "pong"),
        Route::JsonInfo => BackendResponse::json(
            StatusCode::OK,
            &JsonInfo {
                message: JSON_INFO_MESSAGE.to_string(),
                timestamp: request.received_at,
                method: request.method.clone(),
                path: request.path.clone(),
            },
        ),
        Route::Slow => BackendResponse::text(StatusCode::OK, "slow response"),
        Route::Headers => BackendResponse::json(
            StatusCode::OK,
            &HeadersEcho {
                headers: request.headers.clone(),
                path: request.path.clone(),
            },
        ),
        Route::Status(status) => BackendResponse::text(status.status(), status.reason()),
        Route::Echo => BackendResponse::json(
            StatusCode::OK,
            &EchoResponse {
                method: request.method.clone(),
                path: request.path.clone(),
                body: request.body_text(),
                headers: request.headers.clone(),
                content_length: request.body.len(),
            },
        ),
        Route::JsonEcho => json_echo(request),
        Route::Put => BackendResponse::json(
            StatusCode::OK,
            &PutEcho {
                method: "PUT".to_string(),
                path: request.path.clone(),
                body: request.body_text(),
                headers: request.headers.clone(),
            },
        ),
        Route::Delete => BackendResponse::json(
            StatusCode::OK,
            &DeleteEcho {
                method: "DELETE".to_string(),
                path: request.path.clone(),
                headers: request.headers.clone(),
            },
        ),
        Route::NotFound => BackendResponse::text(StatusCode::NOT_FOUND, "Not found"),
    }
}

fn json_echo(request: &BackendRequest) -> BackendResponse {
    let received = if request.body.is_empty() {
        Ok(Value::Object(serde_json::Map::new()))
    } else {
        serde_json::from_slice::<Value>(&request.body)
    };

    match received {
        Ok(received) => BackendResponse::json(
            StatusCode::OK,
            &JsonEchoResponse {
                received,
                headers: request.headers.clone(),
            },
        ),
        Err(_) => BackendResponse::json(
            StatusCode::BAD_REQUEST,
            &ErrorBody {
                error: "Invalid JSON".to_string(),
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::routes::StatusRoute;
    use serde_json::json;

    fn decode<T: serde::de::DeserializeOwned>(response: &BackendResponse) -> T {
        serde_json::from_slice(&response.body).unwrap()
    }

    #[test]
    fn test_ping() {
        let response = handle(Route::Ping, &BackendRequest::new("GET", "/ping"));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.content_type, "text/plain");
        assert_eq!(response.body_str(), "pong");
    }

    #[test]
    fn test_json_info_uses_request_time() {
        let mut request = BackendRequest::new("GET", "/json");
        request.received_at = 1_700_000_000;
        let response = handle(Route::JsonInfo, &request);

        assert_eq!(response.content_type, "application/json");
        let info: JsonInfo = decode(&response);
        assert_eq!(info.message, "Hello from mock server");
        assert_eq!(info.timestamp, 1_700_000_000);
        assert_eq!(info.method, "GET");
        assert_eq!(info.path, "/json");
    }

    #[test]
    fn test_status_bodies() {
        for status in StatusRoute::all() {
            let response = handle(Route::Status(status), &BackendRequest::new("GET", "/"));
            assert_eq!(response.status, status.status());
            assert_eq!(response.body_str(), status.reason());
        }
    }

    #[test]
    fn test_echo_reports_raw_body() {
        let payload = r#"{"test":"data","number":42,"nested":{"key":"value"}}"#;
        let request = BackendRequest::new("POST", "/echo")
            .header("content-type", "application/json")
            .body(payload);
        let response = handle(Route::Echo, &request);

        let echo: EchoResponse = decode(&response);
        assert_eq!(echo.method, "POST");
        assert_eq!(echo.path, "/echo");
        assert_eq!(echo.body, payload);
        assert_eq!(echo.content_length, payload.len());
        assert_eq!(echo.headers["content-type"], "application/json");
    }

    #[test]
    fn test_json_echo_round_trip() {
        let payload = json!({"data": "x".repeat(10_000), "numbers": (0..1000).collect::<Vec<_>>()});
        let request = BackendRequest::new("POST", "/json-echo").body(payload.to_string());
        let response = handle(Route::JsonEcho, &request);

        assert_eq!(response.status, StatusCode::OK);
        let echo: JsonEchoResponse = decode(&response);
        assert_eq!(echo.received, payload);
    }

    #[test]
    fn test_json_echo_empty_body_is_empty_object() {
        let response = handle(Route::JsonEcho, &BackendRequest::new("POST", "/json-echo"));
        let echo: JsonEchoResponse = decode(&response);
        assert_eq!(echo.received, json!({}));
    }

    #[test]
    fn test_json_echo_rejects_malformed_body() {
        let request = BackendRequest::new("POST", "/json-echo").body("{not json");
        let response = handle(Route::JsonEcho, &request);

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.content_type, "application/json");
        let error: ErrorBody = decode(&response);
        assert_eq!(error.error, "Invalid JSON");
    }

    #[test]
    fn test_put_and_delete_echo() {
        let request = BackendRequest::new("PUT", "/resource/123").body(r#"{"id":123}"#);
        let put: PutEcho = decode(&handle(Route::Put, &request));
        assert_eq!(put.method, "PUT");
        assert_eq!(put.path, "/resource/123");
        assert_eq!(put.body, r#"{"id":123}"#);

        let delete: DeleteEcho = decode(&handle(
            Route::Delete,
            &BackendRequest::new("DELETE", "/resource/123"),
        ));
        assert_eq!(delete.method, "DELETE");
        assert_eq!(delete.path, "/resource/123");
    }

    #[test]
    fn test_not_found() {
        let response = handle(Route::NotFound, &BackendRequest::new("GET", "/missing"));
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body_str(), "Not found");
    }

    #[test]
    fn test_non_utf8_body_is_lossy() {
        let request = BackendRequest::new("POST", "/echo").body(vec![0xff, b'a']);
        let echo: EchoResponse = decode(&handle(Route::Echo, &request));
        assert_eq!(echo.content_length, 2);
        assert!(echo.body.ends_with('a'));
    }

    #[test]
    fn test_collect_headers_joins_repeats() {
        let mut headers = HeaderMap::new();
        headers.append("x-multi", HeaderValue::from_static("a"));
        headers.append("x-multi", HeaderValue::from_static("b"));
        headers.insert("x-single", HeaderValue::from_static("c"));

        let echo = collect_headers(&headers);
        assert_eq!(echo["x-multi"], "a, b");
        assert_eq!(echo["x-single"], "c");
    }
}
