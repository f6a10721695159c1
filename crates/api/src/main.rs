use anyhow::Context;

use stocksense_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = AppConfig::from_env().context("invalid configuration")?;

    stocksense_observability::init(config.log_format);

    let services = stocksense_api::app::services::build_services(&config)
        .await
        .context("failed to initialise storage")?;
    let app = stocksense_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.socket_addr()))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
