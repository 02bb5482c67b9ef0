//! Route pattern compiled from configuration.
//!
//! # Responsibilities
//! - Build one glob per configured extension under the static namespace
//! - Decide whether a request is an image request the gateway handles
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan over extensions (acceptable for typical extension counts)

use axum::body::Body;
use axum::http::{Method, Request};

use crate::config::{ResizeConfig, StaticFilesConfig};
use crate::routing::matcher::{AndMatcher, AnyMatcher, ExtensionGlobMatcher, Matcher, MethodMatcher};

/// The set of image routes the gateway is bound to.
#[derive(Debug)]
pub struct RoutePattern {
    matcher: AndMatcher,
    globs: Vec<String>,
}

impl RoutePattern {
    /// Compile the pattern from the resize and static file sections.
    pub fn from_config(resize: &ResizeConfig, static_files: &StaticFilesConfig) -> Self {
        let prefix = static_files.normalized_mount_path();
        let extension_matchers: Vec<ExtensionGlobMatcher> = resize
            .file_extensions
            .iter()
            .map(|ext| ExtensionGlobMatcher::new(prefix, ext))
            .collect();

        let globs = extension_matchers.iter().map(ExtensionGlobMatcher::glob).collect();
        let paths = extension_matchers
            .into_iter()
            .map(|m| Box::new(m) as Box<dyn Matcher>)
            .collect();

        let matcher = AndMatcher::new(vec![
            Box::new(MethodMatcher::new([Method::GET, Method::HEAD])),
            Box::new(AnyMatcher::new(paths)),
        ]);

        Self { matcher, globs }
    }

    /// Returns true if the gateway should handle this request.
    pub fn matches(&self, req: &Request<Body>) -> bool {
        self.matcher.matches(req)
    }

    /// The compiled globs, one per extension.
    pub fn globs(&self) -> &[String] {
        &self.globs
    }
}
