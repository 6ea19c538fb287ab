//! DocStore Gateway - Document HTTP API
//!
//! This binary exposes the document CRUD + search API over HTTP and
//! talks to the backing search store through the adapter layer.

mod api;

use anyhow::Result;
use clap::Parser;
use docstore_common::StoreConfig;
use docstore_index::{DocumentIndex, EsIndex, MemoryIndex};
use docstore_service::{DocumentService, VisibilityPolicy};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "docstore-gateway")]
#[command(about = "DocStore document API gateway")]
#[command(version)]
struct Args {
    /// Listen address for the document API
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Search store endpoint
    #[arg(long, env = "DOCSTORE_STORE_ENDPOINT", default_value = "http://localhost:9200")]
    store_endpoint: String,

    /// Index (collection) name documents live in
    #[arg(long, env = "DOCSTORE_INDEX", default_value = "documents")]
    index: String,

    /// Store backend: es (Elasticsearch-compatible) or memory (development)
    #[arg(long, default_value = "es")]
    backend: String,

    /// Per-request store timeout in milliseconds
    #[arg(long, default_value = "5000")]
    store_timeout_ms: u64,

    /// Post-update re-read attempts before reporting 504
    #[arg(long, default_value = "3")]
    visibility_attempts: u32,

    /// Backoff between re-read attempts in milliseconds
    #[arg(long, default_value = "200")]
    visibility_backoff_ms: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DocStore Gateway");

    let config = StoreConfig::new(args.store_endpoint.clone(), args.index.clone())
        .with_timeout_ms(args.store_timeout_ms)
        .with_visibility_attempts(args.visibility_attempts)
        .with_visibility_backoff_ms(args.visibility_backoff_ms);
    let policy = VisibilityPolicy::from(&config);

    let addr: SocketAddr = args
        .listen
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address {}: {}", args.listen, e))?;

    match args.backend.as_str() {
        "memory" => {
            info!("Store backend: in-memory (development mode)");
            let service = DocumentService::new(MemoryIndex::new(), policy);
            serve(service, addr).await
        }
        _ => {
            info!(
                "Store backend: {} (index: {})",
                args.store_endpoint, args.index
            );
            let service = DocumentService::new(EsIndex::new(config)?, policy);
            serve(service, addr).await
        }
    }
}

async fn serve<I>(service: DocumentService<I>, addr: SocketAddr) -> Result<()>
where
    I: DocumentIndex + 'static,
{
    let app = api::router(service);

    info!("Starting document API server on {}", addr);
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down...");
        })
        .await?;

    info!("Gateway shut down gracefully");

    Ok(())
}
