//! Routes for the analysis service.

use crate::error::AppError;
use crate::{catch_panic_layer, cors_layer};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use writelingo_core::analysis::{
    AnalysisError, AnalyzeRequest, AnalyzeResponse, Analyzer, LiveCheckRequest,
};
use writelingo_core::RelevanceResult;

pub fn router(analyzer: Arc<Analyzer>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/live-check", post(live_check))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(analyzer)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "analysis",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn analyze(
    State(analyzer): State<Arc<Analyzer>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = payload?;
    match analyzer.analyze(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(AnalysisError::EmptyText) => {
            Err(AppError::Validation(AnalysisError::EmptyText.to_string()))
        }
        Err(e) => Err(AppError::Internal(format!("Analysis pipeline failed: {e}"))),
    }
}

async fn live_check(
    State(analyzer): State<Arc<Analyzer>>,
    payload: Result<Json<LiveCheckRequest>, JsonRejection>,
) -> Result<Json<RelevanceResult>, AppError> {
    let Json(request) = payload?;
    analyzer
        .live_check(&request)
        .await
        .map(Json)
        .map_err(|e| AppError::Internal(format!("Live check failed: {e}")))
}
