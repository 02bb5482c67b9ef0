//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check base origins are usable URLs
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject extensions and keys that would break path rewriting
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}' ({reason})")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field}: unsupported scheme '{scheme}', expected http")]
    UnsupportedScheme { field: &'static str, scheme: String },

    #[error("resize.file_extensions: at least one extension is required")]
    NoExtensions,

    #[error("resize.file_extensions: invalid extension '{0}'")]
    InvalidExtension(String),

    #[error("resize.security_key: must be a non-empty path segment")]
    InvalidSecurityKey,

    #[error("static_files.mount_path: '{0}' must start with '/' and not be the root")]
    InvalidMountPath(String),

    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.{0}: must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(
        &mut errors,
        "listener.bind_address",
        &config.listener.bind_address,
    );
    check_origin(&mut errors, "hosts.platform_base", &config.hosts.platform_base, false);
    // The forwarder speaks plain HTTP only.
    check_origin(&mut errors, "hosts.resize_base", &config.hosts.resize_base, true);

    if config.resize.file_extensions.is_empty() {
        errors.push(ValidationError::NoExtensions);
    }
    for ext in &config.resize.file_extensions {
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '*', '?']) {
            errors.push(ValidationError::InvalidExtension(ext.clone()));
        }
    }

    let key = &config.resize.security_key;
    if key.is_empty() || key.contains(['/', '?', '#']) {
        errors.push(ValidationError::InvalidSecurityKey);
    }

    let mount = config.static_files.normalized_mount_path();
    if !mount.starts_with('/') || mount.is_empty() {
        errors.push(ValidationError::InvalidMountPath(
            config.static_files.mount_path.clone(),
        ));
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("connect_secs", timeouts.connect_secs),
        ("forward_secs", timeouts.forward_secs),
        ("request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Render a list of errors on one line.
pub fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_origin(
    errors: &mut Vec<ValidationError>,
    field: &'static str,
    value: &str,
    http_only: bool,
) {
    match Url::parse(value) {
        Ok(url) => {
            let scheme = url.scheme();
            let allowed = scheme == "http" || (!http_only && scheme == "https");
            if !allowed {
                errors.push(ValidationError::UnsupportedScheme {
                    field,
                    scheme: scheme.to_string(),
                });
            } else if url.host_str().is_none() {
                errors.push(ValidationError::InvalidUrl {
                    field,
                    value: value.to_string(),
                    reason: "missing host".to_string(),
                });
            }
        }
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn https_resize_backend_rejected() {
        let mut config = GatewayConfig::default();
        config.hosts.resize_base = "https://resize.example.com".into();
        config.hosts.platform_base = "https://www.example.com".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnsupportedScheme {
                field: "hosts.resize_base",
                scheme: "https".into(),
            }]
        );
    }

    #[test]
    fn malformed_origin_reported() {
        let mut config = GatewayConfig::default();
        config.hosts.platform_base = "not a url".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::InvalidUrl { field: "hosts.platform_base", .. }]
        ));
    }

    #[test]
    fn bad_extensions_reported_individually() {
        let mut config = GatewayConfig::default();
        config.resize.file_extensions = vec![".png".into(), "jp*g".into(), "gif".into()];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidExtension(".png".into()),
                ValidationError::InvalidExtension("jp*g".into()),
            ]
        );
    }

    #[test]
    fn root_mount_and_zero_timeout_rejected() {
        let mut config = GatewayConfig::default();
        config.static_files.mount_path = "/".into();
        config.timeouts.forward_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::InvalidMountPath("/".into())));
        assert!(errors.contains(&ValidationError::ZeroTimeout("forward_secs")));
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
