use anyhow::Context;
use backend_api::{run_server, AppState};
use std::{env, path::PathBuf};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();
    logger::init(logger::DEFAULT_FILTER);

    let settings_path = env::var("PLUTUS_SETTINGS").ok().map(PathBuf::from);
    let settings = settings_loader::load_settings_or_default(settings_path.as_ref())
        .context("Loading settings")?;
    let settings = settings_loader::apply_env_overrides(settings);

    tracing::info!("Plutus API Server");
    tracing::info!(
        "Store: {}",
        settings.store.path.as_deref().unwrap_or("in-memory")
    );
    tracing::info!("Chain RPC: {}", settings.chain.rpc_url);
    tracing::info!("Connect delay: {} ms", settings.connect_delay_ms);

    let state = Arc::new(AppState::from_settings(&settings)?);

    // Start the server
    run_server(state, &settings.server.host, settings.server.port).await?;

    Ok(())
}
