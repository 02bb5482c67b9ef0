//! Route matching logic.
//!
//! # Responsibilities
//! - Match request method (GET and HEAD for image routes)
//! - Match path globs of the form `/static/**/*.<ext>`
//! - Combine conditions with AND / ANY semantics
//!
//! # Design Decisions
//! - Extension matching is case-insensitive, the namespace prefix is not
//! - `**` matches zero or more directories, `*` any file stem
//! - No regex to guarantee O(n) matching

use axum::body::Body;
use axum::http::{Method, Request};

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Matches a fixed set of request methods.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    methods: Vec<Method>,
}

impl MethodMatcher {
    pub fn new(methods: impl IntoIterator<Item = Method>) -> Self {
        Self {
            methods: methods.into_iter().collect(),
        }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.methods.contains(req.method())
    }
}

/// Matches `<prefix>/**/*.<extension>`.
#[derive(Debug, Clone)]
pub struct ExtensionGlobMatcher {
    /// Namespace prefix including its trailing slash, e.g. `/static/`.
    prefix: String,
    /// Lowercased suffix including the dot, e.g. `.png`.
    suffix: String,
}

impl ExtensionGlobMatcher {
    /// Create a matcher for files with `extension` anywhere below `prefix`.
    pub fn new(prefix: &str, extension: &str) -> Self {
        Self {
            prefix: format!("{}/", prefix.trim_end_matches('/')),
            suffix: format!(".{}", extension.to_lowercase()),
        }
    }

    /// The glob this matcher implements, for logging.
    pub fn glob(&self) -> String {
        format!("{}**/*{}", self.prefix, self.suffix)
    }

    /// Match a bare path.
    pub fn matches_path(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix(&self.prefix) else {
            return false;
        };
        let file_name = rest.rsplit('/').next().unwrap_or(rest);
        file_name.len() >= self.suffix.len()
            && file_name
                .get(file_name.len() - self.suffix.len()..)
                .is_some_and(|tail| tail.eq_ignore_ascii_case(&self.suffix))
    }
}

impl Matcher for ExtensionGlobMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matches_path(req.uri().path())
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matchers.iter().all(|m| m.matches(req))
    }
}

/// Combines multiple matchers with ANY semantics. Empty never matches.
#[derive(Debug)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matchers.iter().any(|m| m.matches(req))
    }
}
