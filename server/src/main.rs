//! Server: reads settings, connects, discovers tables and procedures, then serves the generated routes.
//!
//! Run from repo root: `cargo run -p sproc-gateway-server`

use sproc_gateway::{app, build_route_table, logging, AppState, PgExecutor, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init("sproc_gateway=info,sproc_gateway_server=info");

    let settings = Settings::from_env()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect_with(settings.database.connect_options()?)
        .await?;
    tracing::info!("connected to database");

    let executor = Arc::new(PgExecutor::new(pool.clone()));
    let routes = build_route_table(executor.as_ref(), &settings).await?;
    let listener = TcpListener::bind(settings.listen_addr()).await?;
    let state = AppState::new(executor, routes, settings);

    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for shutdown signal");
    }
}
