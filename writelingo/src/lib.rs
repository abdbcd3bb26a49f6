//! HTTP servers for WriteLingo.
//!
//! - [`analysis::router`] serves `/analyze`, `/live-check`, and `/health`
//! - [`game::router`] serves the writing-game endpoints
//!
//! Both routers allow any origin, log requests through `TraceLayer`, and
//! turn handler panics into 500 responses.

pub mod analysis;
pub mod error;
pub mod game;

pub use error::AppError;

use axum::response::{IntoResponse, Response};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tracing_subscriber::EnvFilter;

/// CORS policy shared by both services.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin)
}

pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = message, "Handler panicked");
    AppError::Internal("Internal server error".to_string()).into_response()
}

/// Converts handler panics into `{"detail": …}` 500 responses.
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

/// Install the global subscriber. `RUST_LOG` overrides the default `info`.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

/// Resolves when the process receives Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
