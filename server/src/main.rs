//! Dealership API server.
//!
//! Configure with `DATABASE_URL` (or `DB_HOST` / `DB_PORT` / `DB_USER` / `DB_PASSWORD` / `DB_NAME`),
//! `SERVER_HOST` and `SERVER_PORT`; a `.env` file in the working directory is honored.
//! Run from repo root: `cargo run -p dealership-server`

use dealership_api::{app, connect, sync_schema, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dealership_api=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let pool = connect(&settings).await?;
    sync_schema(&pool).await?;

    let app = app(AppState { pool }, settings.body_limit);
    let listener = TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!("Dealership API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
