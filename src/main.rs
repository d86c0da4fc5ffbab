//! authgate
//!
//! Fronts an auth backend: forwards the auth route with structured
//! request/response logging, and serves the session-aware navigation bar.
//!
//! ```text
//!     Browser ──▶ /api/auth/*  ──▶ instrument ──▶ forwarder ──▶ Auth backend
//!             ──▶ /nav         ──▶ session + role lookups ──┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use authgate::config::load_config;
use authgate::observability::{logging, metrics};
use authgate::{GatewayServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "authgate", version, about = "Instrumented auth gateway")]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "AUTHGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Load and validate the config, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    if args.check {
        println!("config ok");
        return Ok(());
    }

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "authgate starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to bind listener"))?;
    let shutdown = Shutdown::new();

    let server = GatewayServer::new(config)
        .inspect_err(|e| tracing::error!(error = %e, "Failed to build server"))?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
