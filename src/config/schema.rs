//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the image gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Origins of the site itself and of the resize backend.
    pub hosts: HostsConfig,

    /// Which requests get rewritten and how.
    pub resize: ResizeConfig,

    /// Static asset server that serves originals.
    pub static_files: StaticFilesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Base origins used when rewriting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostsConfig {
    /// The site's own base origin, used to resolve incoming request URLs.
    pub platform_base: String,

    /// Base origin of the resize backend. A path component is kept as a
    /// prefix of every rewritten target.
    pub resize_base: String,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            platform_base: "http://localhost:8080".to_string(),
            resize_base: "http://localhost:8888".to_string(),
        }
    }
}

/// Rewrite rules for image requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Literal first path segment the resize backend expects.
    pub security_key: String,

    /// File extensions (without the dot) eligible for rewriting.
    pub file_extensions: Vec<String>,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            security_key: "unsafe".to_string(),
            file_extensions: ["png", "jpg", "jpeg", "gif", "webp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// Static asset server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// URL path the asset directory is mounted under.
    pub mount_path: String,

    /// Directory on disk holding the original assets.
    pub root: PathBuf,
}

impl StaticFilesConfig {
    /// Mount path without a trailing slash, as the router expects it.
    pub fn normalized_mount_path(&self) -> &str {
        self.mount_path.trim_end_matches('/')
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            mount_path: "/static".to_string(),
            root: PathBuf::from("static"),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout towards the resize backend, in seconds.
    pub connect_secs: u64,

    /// Total time allowed for one forward to the resize backend, in seconds.
    pub forward_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            forward_secs: 10,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for log aggregation.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
