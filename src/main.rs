//! Sitemap router
//!
//! Resolves request URLs against per-language sitemaps and either redirects
//! to the canonical URL, describes the view to render, or reports a 404.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                  SITEMAP ROUTER                  │
//!                    │                                                  │
//!   Request URL      │  ┌──────────┐   ┌────────────┐   ┌───────────┐   │
//!   ─────────────────┼─▶│   http   │──▶│ canonical  │──▶│  matcher  │   │
//!                    │  │ adapter  │   │ lang/slash │   │ first-win │   │
//!                    │  └──────────┘   └────────────┘   └─────┬─────┘   │
//!                    │        ▲                               │         │
//!   301/302/404/200  │        │          ┌────────────┐       │         │
//!   ◀────────────────┼────────┴──────────│   router   │◀──────┘         │
//!                    │                   │  outcome   │                 │
//!                    │                   └─────┬──────┘                 │
//!                    │                         │ snapshot               │
//!                    │  ┌────────┐  ┌──────────▼─────┐  ┌────────────┐  │
//!                    │  │ config │  │ sitemap store  │◀─│  watcher   │  │
//!                    │  └────────┘  └────────────────┘  └────────────┘  │
//!                    └──────────────────────────────────────────────────┘
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use sitemap_router::config::{load_config, RouterConfig};
use sitemap_router::http::HttpServer;
use sitemap_router::observability::{logging, metrics};
use sitemap_router::routing::Router;
use sitemap_router::sitemap::{load_sitemaps, SitemapStore, SitemapWatcher};

#[derive(Parser)]
#[command(name = "sitemap-router")]
#[command(about = "Resolve request URLs against per-language sitemaps", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve resolutions over HTTP
    Serve,
    /// Resolve a single request and print the outcome as JSON
    Resolve {
        /// Request path relative to the web root, with optional query string
        request: String,
    },
    /// Load and compile every sitemap, reporting rule counts
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init_logging(&config.observability);

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Resolve { request } => {
            let store = SitemapStore::load(&config.sitemap, &config.site.languages)?;
            let router = Router::new(config.site, store);
            let outcome = router.resolve(&request);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Check => {
            let set = load_sitemaps(&config.sitemap, &config.site.languages)?;
            for language in &config.site.languages {
                match set.get(language) {
                    Some(sitemap) => println!("{language}: {} rule(s)", sitemap.len()),
                    None => println!("{language}: no sitemap"),
                }
            }
        }
    }

    Ok(())
}

async fn serve(config: RouterConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("sitemap-router v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?);
    }

    let store = Arc::new(SitemapStore::load(&config.sitemap, &config.site.languages)?);

    // Held for the lifetime of the server; dropping it stops reloads.
    let _watcher = if config.sitemap.watch {
        let watcher = SitemapWatcher::new(
            config.sitemap.clone(),
            config.site.languages.clone(),
            store.clone(),
        );
        Some(watcher.run()?)
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        web_root = %config.site.web_root,
        languages = ?config.site.languages,
        "Listening for connections"
    );

    let router = Arc::new(Router::new(config.site, store));
    HttpServer::new(router).run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
