//! Shared fixtures: a real mock backend on an ephemeral port and a
//! loopback tunnel that routes by client id the way a Trabas server does.

#![allow(dead_code)]

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{CONNECTION, CONTENT_LENGTH, HOST, TRANSFER_ENCODING};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use reqwest::Url;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use trabas_e2e::backend::MockBackend;
use trabas_e2e::models::CLIENT_ID_QUERY_PARAM;

/// A spawned server that stops when dropped
pub struct Running {
    pub url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for Running {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn spawn_backend() -> Running {
    let backend = MockBackend::bind("127.0.0.1", 0).await.unwrap();
    let url = backend.url();
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(backend.serve_with_shutdown(async {
        let _ = rx.await;
    }));

    Running {
        url,
        shutdown: Some(tx),
    }
}

struct Route {
    client_id: String,
    backend_url: String,
    client: reqwest::Client,
}

/// Loopback tunnel forwarding `client_id` traffic to `backend_url`
pub async fn spawn_tunnel(client_id: &str, backend_url: &str) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let route = Arc::new(Route {
        client_id: client_id.to_string(),
        backend_url: backend_url.trim_end_matches('/').to_string(),
        client: reqwest::Client::new(),
    });
    let (tx, mut rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        loop {
            let stream = tokio::select! {
                _ = &mut rx => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, _)) => stream,
                    Err(_) => continue,
                },
            };
            let route = route.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req| forward(route.clone(), req));
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    Running {
        url,
        shutdown: Some(tx),
    }
}

/// Address of a port nothing listens on
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Split `(client id, backend path and query)` out of a public request target
pub fn split_target(path_and_query: &str) -> Option<(String, String)> {
    let url = Url::parse(&format!("http://tunnel{path_and_query}")).ok()?;

    let mut client_id = None;
    let mut rest = Vec::new();
    for (key, value) in url.query_pairs() {
        if key == CLIENT_ID_QUERY_PARAM && client_id.is_none() {
            client_id = Some(value.into_owned());
        } else {
            rest.push((key.into_owned(), value.into_owned()));
        }
    }

    let path = match client_id {
        Some(_) => url.path().to_string(),
        None => {
            let trimmed = url.path().trim_start_matches('/');
            let (id, tail) = trimmed.split_once('/').unwrap_or((trimmed, ""));
            client_id = Some(id.to_string());
            format!("/{tail}")
        }
    };

    let mut target = path;
    if !rest.is_empty() {
        let query: Vec<String> = rest.iter().map(|(k, v)| format!("{k}={v}")).collect();
        target.push('?');
        target.push_str(&query.join("&"));
    }
    Some((client_id?, target))
}

fn plain(status: StatusCode, text: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(text.as_bytes())));
    *response.status_mut() = status;
    response
}

async fn forward(
    route: Arc<Route>,
    request: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (mut parts, body) = request.into_parts();
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let Some((client_id, backend_target)) = split_target(&target) else {
        return Ok(plain(StatusCode::BAD_REQUEST, "Bad Request"));
    };
    if client_id != route.client_id {
        return Ok(plain(StatusCode::NOT_FOUND, "Client not found"));
    }

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => return Ok(plain(StatusCode::BAD_REQUEST, "Bad Request")),
    };
    for name in [HOST, CONTENT_LENGTH, TRANSFER_ENCODING, CONNECTION] {
        parts.headers.remove(name);
    }

    let upstream = route
        .client
        .request(parts.method, format!("{}{}", route.backend_url, backend_target))
        .headers(parts.headers)
        .body(body)
        .send()
        .await;
    let upstream = match upstream {
        Ok(upstream) => upstream,
        Err(_) => return Ok(plain(StatusCode::BAD_GATEWAY, "Bad Gateway")),
    };

    let status = upstream.status();
    let headers = upstream.headers().clone();
    let bytes = upstream.bytes().await.unwrap_or_default();

    let mut response = Response::new(Full::new(bytes));
    *response.status_mut() = status;
    for (name, value) in headers.iter() {
        if name != CONTENT_LENGTH && name != TRANSFER_ENCODING && name != CONNECTION {
            response.headers_mut().append(name.clone(), value.clone());
        }
    }
    Ok(response)
}
