//! Edge router (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ routing::RouteResolver ──▶ RouteDecision
//!                                                                    │
//!          ┌──────────────┬──────────────┬──────────────┬────────────┤
//!          ▼              ▼              ▼              ▼            ▼
//!       Redirect     ProxyBucket    ProxyOrigin    ServeObject  ProxyFallback
//!        (301)        (verbatim)         │          (storage)   (marketing)
//!                                        ▼
//!                          resilience::RedirectLoopGuard
//!                                        ▼
//!                            http::link_rewriter (HTML)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

use edge_router::config::load_config;
use edge_router::http::RequestTarget;
use edge_router::lifecycle;
use edge_router::observability::logging;
use edge_router::routing::RouteResolver;

#[derive(Parser)]
#[command(name = "edge-router")]
#[command(about = "Edge reverse-proxy router for a multi-origin site", long_about = None)]
struct Cli {
    /// TOML configuration file. Environment overrides apply either way.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the router (default)
    Serve,
    /// Print the routing decision for a GET of an absolute URL
    Explain { url: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            logging::init(&config.observability);

            tracing::info!("edge-router v{} starting", env!("CARGO_PKG_VERSION"));
            tracing::info!(
                bind_address = %config.listener.bind_address,
                domain = %config.site.domain,
                request_timeout_secs = config.timeouts.request_secs,
                "Configuration loaded"
            );

            lifecycle::run(config).await?;
        }
        Commands::Explain { url } => {
            let url = Url::parse(&url)?;
            let resolver = RouteResolver::new(config.site);
            let target = RequestTarget::from_url(&url);
            println!("{}", resolver.resolve(&target.route_request()));
        }
    }

    Ok(())
}
