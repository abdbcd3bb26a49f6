//! Text analysis HTTP server.
//!
//! ```bash
//! NLI_ENDPOINT=http://localhost:8080/nli cargo run -p writelingo --bin analysis-server
//! ```

use std::sync::Arc;
use writelingo_core::{AnalysisConfig, Analyzer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();
    writelingo::init_tracing();

    let config = AnalysisConfig::from_env()?;
    let analyzer = Arc::new(Analyzer::from_config(&config));
    let app = writelingo::analysis::router(analyzer);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    tracing::info!("Analysis server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(writelingo::shutdown_signal())
        .await?;
    Ok(())
}
