//! Echoverse Player - headless composition root binary.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use echoverse_player::infrastructure::{
    load_dotenv_from_repo_root, ClientConfig, HttpNarrationClient, InMemoryDocumentStore,
    InMemoryIdentityProvider, SystemClock,
};
use echoverse_player::{runner, ControllerDeps, GameController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echoverse_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Echoverse Player");

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    tracing::info!(
        app_id = %config.app_id,
        narrator = %config.narrator_url,
        timeout_ms = config.request_timeout_ms,
        "Configuration loaded"
    );

    // Adapters
    let identity = Arc::new(InMemoryIdentityProvider::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    let narration = Arc::new(HttpNarrationClient::new(
        &config.narrator_url,
        config.request_timeout_ms,
    ));

    let controller = GameController::new(ControllerDeps {
        identity,
        store,
        narration,
        clock: Arc::new(SystemClock::new()),
        app_id: config.app_id,
        initial_auth_token: config.initial_auth_token,
    });

    runner::run(controller).await
}
