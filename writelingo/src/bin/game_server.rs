//! Writing-game HTTP server.
//!
//! Set `GAME_STATE_PATH` to keep user progress across restarts.

use std::path::Path;
use std::sync::Arc;
use writelingo_core::game::{GameService, GroqJudge, MemoryUserStore};
use writelingo_core::GameConfig;

async fn load_store(path: Option<&Path>) -> MemoryUserStore {
    let Some(path) = path.filter(|p| p.exists()) else {
        return MemoryUserStore::new();
    };
    match MemoryUserStore::load_json(path).await {
        Ok(store) => {
            tracing::info!(path = %path.display(), users = store.len(), "Loaded game state");
            store
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not load game state; starting fresh");
            MemoryUserStore::new()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();
    writelingo::init_tracing();

    let config = GameConfig::from_env()?;
    let store = Arc::new(load_store(config.state_path.as_deref()).await);
    let judge = Arc::new(GroqJudge::from_config(&config));
    let service = Arc::new(GameService::new(store.clone(), judge));
    let app = writelingo::game::router(service);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    tracing::info!("Game server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(writelingo::shutdown_signal())
        .await?;

    if let Some(path) = &config.state_path {
        store.save_json(path).await?;
        tracing::info!(path = %path.display(), users = store.len(), "Saved game state");
    }
    Ok(())
}
