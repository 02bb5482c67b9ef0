//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (RoutePattern lookup)
//!     → matcher.rs (evaluate method + extension globs)
//!     → image request for the gateway, or straight to the static server
//!
//! Route Compilation (at startup):
//!     ResizeConfig.file_extensions + StaticFilesConfig.mount_path
//!     → one `/static/**/*.<ext>` glob per extension
//!     → Freeze as immutable RoutePattern
//! ```

pub mod matcher;
pub mod router;

pub use router::RoutePattern;
