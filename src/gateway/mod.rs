//! Image rewrite gateway.
//!
//! # Data Flow
//! ```text
//! Image request (matched by RoutePattern)
//!     → rewrite.rs (loop guard, build resize target)
//!     → forward.rs (one attempt against the resize backend)
//!     → Delivered:  backend response to the caller unchanged
//!     → Refused:    original request to the static server
//!     → Failed:     log + 502 with an empty body
//! ```
//!
//! The gateway sits as middleware in front of the static asset server, so
//! "next handler" is whatever `Next` runs, normally `ServeDir`.

pub mod forward;
pub mod rewrite;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

use crate::config::GatewayConfig;
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::routing::RoutePattern;

pub use forward::{ForwardError, ForwardOutcome, Forwarder};
pub use rewrite::{Rewrite, RewriteError, RewriteRules, RewrittenTarget};

/// Startup errors when building the gateway from configuration.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{field}: invalid URL '{value}': {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Terminal state of one image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Loop-prevention marker present; served by the next handler untouched.
    PassThrough,
    /// Backend response handed to the caller.
    Delivered,
    /// Backend refused the connection; original served by the next handler.
    Fallback,
    /// Any other failure; caller got a 502.
    Error,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::PassThrough => "pass_through",
            Disposition::Delivered => "delivered",
            Disposition::Fallback => "fallback",
            Disposition::Error => "error",
        }
    }
}

/// The gateway: immutable after startup and shared across requests.
#[derive(Debug)]
pub struct ImageGateway {
    routes: RoutePattern,
    rules: RewriteRules,
    forwarder: Forwarder,
}

impl ImageGateway {
    pub fn new(routes: RoutePattern, rules: RewriteRules, forwarder: Forwarder) -> Self {
        Self {
            routes,
            rules,
            forwarder,
        }
    }

    /// Build the gateway from a validated configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let routes = RoutePattern::from_config(&config.resize, &config.static_files);
        let platform_base = parse_url("hosts.platform_base", &config.hosts.platform_base)?;
        let resize_base = parse_url("hosts.resize_base", &config.hosts.resize_base)?;
        let rules = RewriteRules::new(platform_base, resize_base, config.resize.security_key.clone());
        let forwarder = Forwarder::new(
            Duration::from_secs(config.timeouts.connect_secs),
            Duration::from_secs(config.timeouts.forward_secs),
        );

        tracing::info!(
            globs = ?routes.globs(),
            resize_base = %config.hosts.resize_base,
            "Image gateway configured"
        );

        Ok(Self::new(routes, rules, forwarder))
    }

    pub fn routes(&self) -> &RoutePattern {
        &self.routes
    }

    /// Handle one request, delegating to `next` for anything not rewritten.
    pub async fn handle(&self, request: Request, next: Next) -> Response {
        if !self.routes.matches(&request) {
            return next.run(request).await;
        }

        let request_id = request_id(&request).to_string();
        let path = request.uri().path().to_string();

        let target = match self.rules.rewrite(request.uri()) {
            Ok(Rewrite::PassThrough) => {
                tracing::debug!(request_id = %request_id, path = %path, "Original requested, serving directly");
                metrics::record_request(Disposition::PassThrough.as_str());
                return next.run(request).await;
            }
            Ok(Rewrite::Target(target)) => target,
            Err(e) => {
                tracing::error!(request_id = %request_id, path = %path, error = %e, "Failed to rewrite image request");
                metrics::record_request(Disposition::Error.as_str());
                return StatusCode::BAD_GATEWAY.into_response();
            }
        };

        tracing::debug!(request_id = %request_id, path = %path, target = %target, "Forwarding to resize backend");

        // The inbound URI is never modified, so falling back needs no restore.
        let (parts, body) = request.into_parts();
        let start = Instant::now();
        let outcome = self.forwarder.forward(&parts, body, &target).await;

        let disposition = match &outcome {
            ForwardOutcome::Delivered(_) => Disposition::Delivered,
            ForwardOutcome::Refused => Disposition::Fallback,
            ForwardOutcome::Failed(_) => Disposition::Error,
        };
        metrics::record_forward(disposition.as_str(), start);
        metrics::record_request(disposition.as_str());

        match outcome {
            ForwardOutcome::Delivered(response) => {
                let (parts, body) = response.into_parts();
                Response::from_parts(parts, Body::new(body))
            }
            ForwardOutcome::Refused => {
                tracing::debug!(request_id = %request_id, path = %path, "Resize backend unreachable, serving original");
                next.run(Request::from_parts(parts, Body::empty())).await
            }
            ForwardOutcome::Failed(e) => {
                tracing::error!(
                    request_id = %request_id,
                    path = %path,
                    target = %target,
                    error = %e,
                    "Resize backend request failed"
                );
                StatusCode::BAD_GATEWAY.into_response()
            }
        }
    }
}

/// Middleware entry point bound to the router.
pub async fn image_gateway(
    State(gateway): State<Arc<ImageGateway>>,
    request: Request,
    next: Next,
) -> Response {
    gateway.handle(request, next).await
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, GatewayError> {
    Url::parse(value).map_err(|source| GatewayError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })
}
