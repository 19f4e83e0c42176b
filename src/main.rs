/// Event Chain - HTTP read service over a back-linked event log
///
/// Serves single events and full event histories from a content-keyed
/// blob store (S3 or a local directory).

mod api;
mod blob_store;
mod config;
mod context;
mod error;
mod events;
mod metrics;
mod server;

use config::ServerConfig;
use context::AppContext;
use error::ServiceResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ServiceResult<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize logging
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_new(&config.logging.level)
            .unwrap_or_else(|_| "event_chain=info,tower_http=info".into()),
    );
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        "Event chain service v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}
