//! News API proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                   NEWS PROXY                      │
//!                      │                                                   │
//!   Client Request     │  ┌──────────┐   ┌────────────┐   ┌────────────┐  │
//!   ───────────────────┼─▶│ security │──▶│   router   │──▶│   proxy    │  │
//!                      │  │cors/rate │   │ /api/{p}   │   │  handler   │  │
//!                      │  └──────────┘   └────────────┘   └─────┬──────┘  │
//!                      │                                        │         │
//!                      │                      params → provider table      │
//!                      │                                        │         │
//!   Client Response    │  ┌──────────┐                    ┌─────▼──────┐  │
//!   ◀──────────────────┼──│ headers  │◀───────────────────│  upstream  │◀─┼── NewsAPI / NewsData
//!                      │  │ + JSON   │                    │   client   │  │   GNews / Currents
//!                      │  └──────────┘                    └────────────┘  │
//!                      │                                                   │
//!                      │  config · observability · lifecycle               │
//!                      └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use news_proxy::config::loader::{load_config, CONFIG_PATH_ENV};
use news_proxy::observability::{logging, metrics};
use news_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "news-proxy", version, about = "HTTP proxy for news aggregation APIs")]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("news-proxy: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.observability);

    tracing::info!("news-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        allowed_origins = ?config.cors.allowed_origins,
        rate_limit_enabled = config.rate_limit.enabled,
        upstream_timeout_ms = config.timeouts.upstream_ms,
        providers = ?config.providers.enabled().map(|p| p.to_string()).collect::<Vec<_>>(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let signals = shutdown.on_os_signal();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;
    signals.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
