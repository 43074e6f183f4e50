use std::sync::Arc;

use anyhow::Context;
use blog_app::{telemetry, AppConfig, AppState};
use blog_core::{BlogApi, BlogClient, BlogQueries, UreqTransport};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = AppConfig::load().context("loading configuration")?;
    info!(backend = %config.backend_url, stale_time_secs = config.stale_time_secs, "starting blog app");

    let api = BlogApi::new(
        BlogClient::new(&config.backend_url),
        Arc::new(UreqTransport::default()),
    );
    let queries = BlogQueries::new(api, config.query_config());
    let app = blog_app::router(AppState::new(queries));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
