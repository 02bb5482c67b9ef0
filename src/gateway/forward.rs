//! Forwarding to the resize backend.
//!
//! # Responsibilities
//! - Build the outbound request from the inbound parts and a rewritten target
//! - Rewrite `Host` to the backend's authority
//! - Enforce connect and forward timeouts, response body included
//! - Classify the result as delivered, refused or failed
//!
//! # Design Decisions
//! - One attempt per request, no retries
//! - Connection refusal is detected on the error source chain, not by message
//! - Backend 4xx/5xx responses are failures, not deliveries

use axum::body::Body;
use axum::http::{header, request::Parts, HeaderValue, Request, Response, StatusCode, Uri};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use thiserror::Error;
use tower_http::timeout::TimeoutBody;

use crate::gateway::rewrite::RewrittenTarget;

/// Why a forward attempt failed.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid rewritten target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("upstream request failed: {0}")]
    Transport(#[source] hyper_util::client::legacy::Error),

    #[error("upstream responded with {0}")]
    UpstreamStatus(StatusCode),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

/// Result of one forward attempt.
pub enum ForwardOutcome {
    /// The backend answered; hand this response to the caller unchanged.
    /// The body errors out if a frame stalls past the remaining budget.
    Delivered(Response<TimeoutBody<Incoming>>),
    /// Nothing is listening at the backend address.
    Refused,
    /// Any other failure.
    Failed(ForwardError),
}

// `TimeoutBody` is not `Debug`, so the response body is elided.
impl std::fmt::Debug for ForwardOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delivered(response) => f
                .debug_tuple("Delivered")
                .field(&response.status())
                .field(response.headers())
                .finish(),
            Self::Refused => f.write_str("Refused"),
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

/// Long-lived HTTP client for the resize backend.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl Forwarder {
    /// Create a forwarder with the given connect and total timeouts.
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self { client, timeout }
    }

    /// Forward a request to `target`, keeping method, headers and body.
    ///
    /// Dropping the returned future aborts the outbound call.
    pub async fn forward(&self, parts: &Parts, body: Body, target: &RewrittenTarget) -> ForwardOutcome {
        let request = match build_request(parts, body, target) {
            Ok(request) => request,
            Err(e) => return ForwardOutcome::Failed(e),
        };

        let start = Instant::now();
        match tokio::time::timeout(self.timeout, self.client.request(request)).await {
            Err(_) => ForwardOutcome::Failed(ForwardError::Timeout(self.timeout)),
            Ok(Err(e)) if is_connection_refused(&e) => ForwardOutcome::Refused,
            Ok(Err(e)) => ForwardOutcome::Failed(ForwardError::Transport(e)),
            Ok(Ok(response)) => {
                let status = response.status();
                if status.is_client_error() || status.is_server_error() {
                    ForwardOutcome::Failed(ForwardError::UpstreamStatus(status))
                } else {
                    let remaining = self.timeout.saturating_sub(start.elapsed());
                    ForwardOutcome::Delivered(response.map(|body| TimeoutBody::new(remaining, body)))
                }
            }
        }
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Build the outbound request. Version is left at the client default so an
/// HTTP/2 caller does not force HTTP/2 towards the backend.
fn build_request(parts: &Parts, body: Body, target: &RewrittenTarget) -> Result<Request<Body>, ForwardError> {
    let invalid = |reason: String| ForwardError::InvalidTarget {
        target: target.to_string(),
        reason,
    };

    let uri: Uri = target.as_str().parse().map_err(|e| invalid(format!("{e}")))?;
    let authority = uri
        .authority()
        .ok_or_else(|| invalid("missing authority".to_string()))?;
    let host = HeaderValue::from_str(authority.as_str()).map_err(|e| invalid(e.to_string()))?;

    let mut req = Request::builder().method(parts.method.clone()).uri(uri);
    if let Some(headers) = req.headers_mut() {
        for (k, v) in parts.headers.iter() {
            if k != header::HOST && k != header::CONNECTION {
                headers.append(k.clone(), v.clone());
            }
        }
        headers.insert(header::HOST, host);
    }

    req.body(body).map_err(|e| invalid(e.to_string()))
}

/// Walk the error source chain looking for a refused TCP connect.
pub fn is_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        current = e.source();
    }
    false
}
