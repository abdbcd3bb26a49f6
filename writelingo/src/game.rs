//! Routes for the game backend.
//!
//! The acting user comes from the `X-User-Id` header.

use crate::error::AppError;
use crate::{catch_panic_layer, cors_layer};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use writelingo_core::game::{
    GameService, HeartsResponse, LeaderboardResponse, PromptRequest, PromptResponse,
    RedeemRequest, RedeemResponse, StatsResponse, VerifyRequest, VerifyResponse,
};

pub const USER_HEADER: &str = "x-user-id";
pub const GUEST_USER: &str = "guest_user";

type GameState = Arc<GameService>;

pub fn router(service: GameState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/game/prompt", post(prompt))
        .route("/game/verify", post(verify))
        .route("/user/refill-hearts", post(refill_hearts))
        .route("/user/redeem-xp", post(redeem_xp))
        .route("/user/stats", get(stats))
        .route("/leaderboard", get(leaderboard))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(service)
}

fn user_id(headers: &HeaderMap) -> String {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(GUEST_USER)
        .to_string()
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "game",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn prompt(
    State(service): State<GameState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<PromptResponse>, AppError> {
    let Json(request) = payload?;
    Ok(Json(service.prompt(&request.game_type).await))
}

async fn verify(
    State(service): State<GameState>,
    headers: HeaderMap,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, AppError> {
    let Json(request) = payload?;
    Ok(Json(service.verify(&user_id(&headers), &request).await))
}

async fn refill_hearts(State(service): State<GameState>, headers: HeaderMap) -> Json<HeartsResponse> {
    Json(service.refill_hearts(&user_id(&headers)))
}

async fn redeem_xp(
    State(service): State<GameState>,
    headers: HeaderMap,
    payload: Result<Json<RedeemRequest>, JsonRejection>,
) -> Result<Json<RedeemResponse>, AppError> {
    let Json(request) = payload?;
    Ok(Json(service.redeem_xp(&user_id(&headers), request.amount)))
}

async fn stats(State(service): State<GameState>, headers: HeaderMap) -> Json<StatsResponse> {
    Json(service.stats(&user_id(&headers)))
}

async fn leaderboard(State(service): State<GameState>) -> Json<LeaderboardResponse> {
    Json(service.leaderboard())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_user_id_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(user_id(&headers), GUEST_USER);

        headers.insert(USER_HEADER, HeaderValue::from_static("  "));
        assert_eq!(user_id(&headers), GUEST_USER);

        headers.insert(USER_HEADER, HeaderValue::from_static("ana"));
        assert_eq!(user_id(&headers), "ana");
    }
}
