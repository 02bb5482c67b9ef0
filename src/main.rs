//! Image Rewrite Gateway
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                IMAGE GATEWAY                 │
//!                         │                                              │
//!   GET /static/a.png     │  ┌──────────┐   ┌─────────┐   ┌───────────┐  │
//!   ?width=240            │  │ request  │──▶│ routing │──▶│  gateway  │──┼──▶ Resize Backend
//!   ──────────────────────┼─▶│ id/trace │   │ globs   │   │ rewrite + │  │    /unsafe/240x0/
//!                         │  └──────────┘   └────┬────┘   │ forward   │  │    static/a.png
//!                         │                      │        └─────┬─────┘  │    ?original=true
//!                         │          not an image│  refused /     │        │
//!                         │          or original │  pass-through  │        │
//!                         │                      ▼                ▼        │
//!                         │                ┌────────────────────────┐      │
//!                         │                │  static asset server   │      │
//!                         │                │       (ServeDir)       │      │
//!                         │                └────────────────────────┘      │
//!                         └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use image_gateway::config::{load_config, GatewayConfig};
use image_gateway::lifecycle::startup;

#[derive(Parser)]
#[command(name = "image-gateway")]
#[command(about = "Rewrites image requests to a resize backend, falling back to the original", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "IMAGE_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    startup::run(config).await?;
    Ok(())
}
