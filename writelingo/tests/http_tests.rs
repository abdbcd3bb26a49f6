//! Router round trips through `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use writelingo_core::engines::{CorrectionEngine, NarrativeEngine, StructureEngine, ToneEngine};
use writelingo_core::game::{GameService, MemoryUserStore};
use writelingo_core::models::{EntailmentModel, LexiconTagger, NliLogits, Tagger};
use writelingo_core::testing::{ScriptedEntailment, ScriptedGenerator, ScriptedJudge};
use writelingo_core::{Analyzer, SpellChecker};

fn analysis_app(rewrite: &str, nli: Option<Arc<ScriptedEntailment>>) -> Router {
    let tagger: Arc<dyn Tagger> = Arc::new(LexiconTagger::builtin());
    let speller = SpellChecker::builtin();
    let analyzer = Analyzer::new(
        NarrativeEngine::new(tagger.clone(), nli.map(|n| n as Arc<dyn EntailmentModel>)),
        StructureEngine::new(speller.clone()),
        ToneEngine::new(Arc::new(ScriptedGenerator::new(vec![rewrite])), "google/flan-t5-small"),
        CorrectionEngine::new(tagger, speller),
    );
    writelingo::analysis::router(Arc::new(analyzer))
}

fn game_app(judge: ScriptedJudge) -> Router {
    let service = GameService::new(Arc::new(MemoryUserStore::new()), Arc::new(judge));
    writelingo::game::router(Arc::new(service))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// =============================================================================
// Analysis service
// =============================================================================

#[tokio::test]
async fn test_analyze_round_trip() {
    let text = "I didn't completed the task.";
    let app = analysis_app(text, None);
    let (status, body) = send(&app, post_json("/analyze", json!({ "text": text }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modified_text"], "I didn't complete the task.");
    assert_eq!(body["detected_tone"], "neutral");
    assert_eq!(body["consistency_score"], 1.0);
    assert_eq!(body["changes"][0]["type"], "modification");
    assert_eq!(body["changes"][0]["before"], "completed");
    assert_eq!(body["changes"][0]["after"], "complete");
    assert!(body["changes"][0]["reason"].is_string());
    assert!(body["explanation"].as_array().unwrap().len() >= 3);
    assert!(body["readability_score"].is_number());
}

#[tokio::test]
async fn test_analyze_rejects_empty_text() {
    let app = analysis_app("x", None);
    let (status, body) = send(&app, post_json("/analyze", json!({ "text": "" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_analyze_rejects_unknown_tone() {
    let app = analysis_app("x", None);
    let (status, body) = send(
        &app,
        post_json("/analyze", json!({ "text": "Hi.", "target_tone": "angry" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("target_tone"));
}

#[tokio::test]
async fn test_analyze_model_failure_is_500() {
    let app = analysis_app("x", Some(Arc::new(ScriptedEntailment::failing("nli down"))));
    let (status, body) = send(
        &app,
        post_json("/analyze", json!({ "text": "One thing. Another thing." })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Analysis pipeline failed:"));
    assert!(detail.contains("nli down"));
}

#[tokio::test]
async fn test_live_check() {
    let nli = Arc::new(ScriptedEntailment::constant(NliLogits::new(0.0, 9.0, 0.0)));
    let app = analysis_app("x", Some(nli));
    let (status, body) = send(
        &app,
        post_json("/live-check", json!({ "text": "Rockets need fuel.", "topic": "rockets" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_on_topic"], true);
    assert!(body["relevance_score"].as_f64().unwrap() > 0.9);
    assert_eq!(body["suggestion"], Value::Null);
}

#[tokio::test]
async fn test_health_and_cors() {
    let app = analysis_app("x", None);
    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

// =============================================================================
// Game service
// =============================================================================

#[tokio::test]
async fn test_game_prompt() {
    let app = game_app(ScriptedJudge::new().with_exercise(json!({
        "text": "Rewrite formally: gimme the report",
        "hint": "Start with 'Could you'."
    })));
    let (status, body) = send(&app, post_json("/game/prompt", json!({ "game_type": "Tone Switcher" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prompt_data"]["text"], "Rewrite formally: gimme the report");
    assert_eq!(body["hint"], "Start with 'Could you'.");
}

#[tokio::test]
async fn test_verify_uses_user_header() {
    let app = game_app(ScriptedJudge::new().with_verdict(json!({
        "success": true,
        "reason": "Well phrased.",
        "mastery_level": 1.0,
        "correct_answer": "Could you send me the report?"
    })));

    let mut request = post_json(
        "/game/verify",
        json!({ "game_type": "Word Master", "user_input": "Could you send the report?" }),
    );
    request.headers_mut().insert("x-user-id", "ana".parse().unwrap());
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["xp_reward"], 50);
    assert_eq!(body["win_streak"], 1);
    assert_eq!(body["current_hearts"], 5);

    let stats = Request::builder()
        .uri("/user/stats")
        .header("x-user-id", "ana")
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(&app, stats).await;
    assert_eq!(body["user_id"], "ana");
    assert_eq!(body["xp"], 50);
    assert_eq!(body["spider_chart_data"]["Grammar"], 15);

    let guest = Request::builder().uri("/user/stats").body(Body::empty()).unwrap();
    let (_, body) = send(&app, guest).await;
    assert_eq!(body["user_id"], "guest_user");
    assert_eq!(body["xp"], 0);
}

#[tokio::test]
async fn test_hearts_and_redeem() {
    let app = game_app(ScriptedJudge::new());

    let (status, body) = send(&app, post_json("/user/refill-hearts", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "hearts": 5 }));

    let mut request = post_json("/user/redeem-xp", json!({}));
    request.headers_mut().insert("x-user-id", "default_user".parse().unwrap());
    let (_, body) = send(&app, request).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["new_xp"], 1000);
    assert_eq!(body["new_level"], 3);

    let (_, body) = send(&app, post_json("/user/redeem-xp", json!({ "amount": 10 }))).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Insufficient XP balance.");
    assert_eq!(body["new_xp"], Value::Null);
}

#[tokio::test]
async fn test_leaderboard() {
    let app = game_app(ScriptedJudge::new());
    let request = Request::builder().uri("/leaderboard").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let users = body["top_users"].as_array().unwrap();
    assert_eq!(users.len(), 11);
    assert_eq!(users[0], json!({ "user_id": "Sarthak_AI", "level": 15, "xp": 7500 }));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = game_app(ScriptedJudge::new());
    let (status, body) = send(&app, post_json("/game/verify", json!({ "game_type": "Word Master" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("user_input"));
}
