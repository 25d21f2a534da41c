//! qdispatch server binary entry point.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qdispatch_dispatch::DispatchConfig;
use qdispatch_server::{AppState, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qdispatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr: std::net::SocketAddr = match std::env::var("QDISPATCH_BIND") {
        Ok(bind) => bind
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid QDISPATCH_BIND address '{bind}': {e}"))?,
        Err(_) => ([127, 0, 0, 1], 5000).into(),
    };

    let config = DispatchConfig::from_env();
    let state = Arc::new(AppState::from_config(config)?);

    let app = create_router(state);

    tracing::info!("Starting qdispatch server at http://{}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
