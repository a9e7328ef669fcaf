//! HTTP server for the mock backend
//!
//! Accepts connections on a Tokio listener and serves each one with hyper's
//! HTTP/1.1 connection driver. Handlers share no state.

use bytes::Bytes;
use chrono::Utc;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::{lookup_host, TcpListener};
use tracing::{debug, info, warn};

use super::handlers::{self, BackendRequest, BackendResponse};
use super::routes::Route;

/// Mock backend errors
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Host {0} did not resolve to any address")]
    NoAddress(String),

    #[error("Failed to read local address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// Mock backend bound to a socket, ready to serve
pub struct MockBackend {
    listener: TcpListener,
    addr: SocketAddr,
}

impl MockBackend {
    /// Bind the listener; nothing is served until
    /// [`MockBackend::serve_with_shutdown`].
    ///
    /// A host name is bound on its first IPv4 address when it has one, so
    /// `localhost` listens on 127.0.0.1 even where it also resolves to `::1`.
    pub async fn bind(host: &str, port: u16) -> Result<Self, BackendError> {
        let bind_error = |source: std::io::Error| BackendError::Bind {
            addr: format!("{host}:{port}"),
            source,
        };

        let candidates: Vec<SocketAddr> = lookup_host((host, port))
            .await
            .map_err(bind_error)?
            .collect();
        let target = candidates
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| candidates.first())
            .copied()
            .ok_or_else(|| BackendError::NoAddress(host.to_string()))?;

        let listener = TcpListener::bind(target).await.map_err(bind_error)?;
        let addr = listener.local_addr().map_err(BackendError::LocalAddr)?;

        Ok(Self { listener, addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL clients can reach the backend at
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Serve until `shutdown` resolves. In-flight connections are left to
    /// finish on their own tasks.
    pub async fn serve_with_shutdown<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down mock backend");
                    break;
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                },
            };

            tokio::spawn(async move {
                let service = service_fn(respond);
                if let Err(e) = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await
                {
                    debug!("Connection from {} closed with error: {}", peer, e);
                }
            });
        }
    }

    /// Log the listening address and endpoint table
    pub fn log_banner(&self) {
        info!("Mock server listening on {}", self.url());
        info!("Available endpoints:");
        for (method, path, description) in Route::endpoints() {
            info!("  {:6} {:15} - {}", method, path, description);
        }
    }
}

async fn respond(request: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = request.into_parts();

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("Failed to read request body: {}", e);
            return Ok(
                BackendResponse::text(StatusCode::BAD_REQUEST, "Bad Request").into_response(),
            );
        }
    };

    let route = Route::resolve(&parts.method, parts.uri.path());
    if let Some(delay) = route.delay() {
        tokio::time::sleep(delay).await;
    }

    let request = BackendRequest::from_head(
        &parts.method,
        &parts.uri,
        &parts.headers,
        body,
        Utc::now().timestamp(),
    );
    let response = handlers::handle(route, &request);

    debug!(
        "{} {} -> {} ({})",
        request.method,
        request.path,
        response.status.as_u16(),
        route
    );

    Ok(response.into_response())
}
