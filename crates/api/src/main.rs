use anyhow::Context;

use finapi_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    finapi_observability::init();

    let config = ApiConfig::from_env()?;
    let app = finapi_api::app::build_app();

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("FinAPI listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
