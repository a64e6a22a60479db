use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use medqueue_backend::config::{self, AppConfig};
use medqueue_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = AppConfig::load()?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(loaded.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = config::init(loaded);
    let app_state = initialize_backend(config).await?;
    let app = create_router(app_state, config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Starting server on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
