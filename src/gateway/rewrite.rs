//! Request URL rewriting for the resize backend.
//!
//! An image request `/static/img/logo.png?width=100` becomes
//! `<resize_base>/<security_key>/100x0/static/img/logo.png?original=true`.
//! The resize backend fetches the source image back through this gateway with
//! `original=true` set, which is what stops the rewrite from looping.

use axum::http::Uri;
use thiserror::Error;
use url::Url;

/// Query parameter carrying the loop-prevention marker.
pub const ORIGINAL_PARAM: &str = "original";

/// Query parameter carrying the requested width.
pub const WIDTH_PARAM: &str = "width";

/// Errors raised while rewriting a request.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("cannot resolve request URL '{uri}': {source}")]
    Resolve {
        uri: String,
        #[source]
        source: url::ParseError,
    },
}

/// Where an image request should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// The request carries the loop-prevention marker; serve it unmodified.
    PassThrough,
    /// Forward the request to this target.
    Target(RewrittenTarget),
}

/// Absolute URL on the resize backend for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenTarget {
    url: Url,
}

impl RewrittenTarget {
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Path and query as sent on the wire.
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }
}

impl std::fmt::Display for RewrittenTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Immutable rewrite configuration shared by all requests.
#[derive(Debug, Clone)]
pub struct RewriteRules {
    platform_base: Url,
    resize_base: Url,
    security_key: String,
}

impl RewriteRules {
    pub fn new(platform_base: Url, resize_base: Url, security_key: impl Into<String>) -> Self {
        Self {
            platform_base,
            resize_base,
            security_key: security_key.into(),
        }
    }

    /// Decide what to do with an image request.
    ///
    /// Pure function of the request URI and the rules, so the same request
    /// always yields the same target.
    pub fn rewrite(&self, uri: &Uri) -> Result<Rewrite, RewriteError> {
        let request_url = self.resolve(uri)?;

        if query_value(&request_url, ORIGINAL_PARAM).is_some() {
            return Ok(Rewrite::PassThrough);
        }

        let size = match query_value(&request_url, WIDTH_PARAM) {
            Some(width) => format!("/{width}x0/"),
            None => "/".to_string(),
        };

        let base_path = self.resize_base.path().trim_end_matches('/');
        let asset_path = request_url.path().trim_start_matches('/');

        let mut url = self.resize_base.clone();
        // `set_path` percent-encodes anything not allowed in a path, so an
        // arbitrary width value still yields a well-formed URL.
        url.set_path(&format!(
            "{base_path}/{key}{size}{asset_path}",
            key = self.security_key
        ));
        url.set_query(Some(&format!("{ORIGINAL_PARAM}=true")));
        url.set_fragment(None);

        Ok(Rewrite::Target(RewrittenTarget { url }))
    }

    /// Resolve the request target against the site's own origin.
    pub fn resolve(&self, uri: &Uri) -> Result<Url, RewriteError> {
        let raw = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        self.platform_base
            .join(raw)
            .map_err(|source| RewriteError::Resolve {
                uri: uri.to_string(),
                source,
            })
    }
}

/// First value of a query parameter, if present and non-empty.
fn query_value(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
