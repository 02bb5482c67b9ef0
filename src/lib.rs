//! Image rewrite gateway.
//!
//! Intercepts requests for image assets, rewrites them into the resize
//! backend's URL scheme and forwards them. When the backend is not running
//! the original asset is served unmodified; every other failure is a 502.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use gateway::ImageGateway;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
