use anyhow::Context;
use breeder_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config)?;

    let state = AppState::builder()
        .config(config.clone())
        .build()
        .await
        .context("failed to initialize application state")?;

    let served = Server::new(config).serve(router(state.clone())).await;

    // Drain scheduled creations even when the listener failed
    state.shutdown().await;
    served?;

    tracing::info!("Shutdown complete");
    Ok(())
}
