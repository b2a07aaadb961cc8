use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use shared::Config;
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod routes;
mod templates;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("Starting fluxob3 web server...");

    let config = Arc::new(Config::from_env()?);
    let bind_addr = config.bind_addr.clone();

    let app = Router::new()
        .route("/", get(routes::entry).post(routes::login))
        .route("/grafico", post(routes::generate_chart))
        .layer(TraceLayer::new_for_http())
        .with_state(config);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
