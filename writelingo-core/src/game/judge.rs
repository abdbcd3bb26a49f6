//! LLM-backed exercise generation and answer grading.

use crate::config::GameConfig;
use async_trait::async_trait;
use groq::{Groq, Message, Request};
use serde_json::Value;

pub type JsonObject = serde_json::Map<String, Value>;

const EXERCISE_SYSTEM_PROMPT: &str = "You are a gamified writing assistant. Given a sub-game name, generate a creative \
exercise for the user to solve. Return JSON with 'text' (the exercise description/problem), \
and optionally 'hint' (a clue). \
For example, if game_type is 'Tone Switcher', describe a text they need to rewrite.";

const VERIFY_SYSTEM_PROMPT: &str = "You are an AI judge for a language game. Analyze the user's answer for the game_type \
and given context. \
Verify if it solves the problem correctly. Return a JSON object with: \
'success' (boolean), \
'reason' (string explaining why), \
'mastery_level' (float 0.0 to 1.0 reflecting quality), \
'correct_answer' (string with an ideal answer).";

/// Creates exercises and grades answers.
///
/// Implementations never fail: any problem yields an empty object.
#[async_trait]
pub trait GameJudge: Send + Sync {
    async fn generate_exercise(&self, game_type: &str) -> JsonObject;

    async fn verify_answer(&self, game_type: &str, user_input: &str, context: &Value) -> JsonObject;
}

/// Judge that asks a chat-completions model in JSON-object mode.
pub struct GroqJudge {
    client: Option<Groq>,
}

impl GroqJudge {
    pub fn new(client: Groq) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// A judge without credentials; every call returns `{}`.
    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        let Some(api_key) = &config.groq_api_key else {
            tracing::warn!("GROQ_API_KEY not found in environment; game judge disabled");
            return Self::unconfigured();
        };

        let mut client = Groq::new(api_key.clone()).with_model(config.groq_model.clone());
        if let Some(base_url) = &config.groq_base_url {
            client = client.with_base_url(base_url.clone());
        }
        Self::new(client)
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn call_json(&self, system: &str, user: String) -> JsonObject {
        let Some(client) = &self.client else {
            return JsonObject::new();
        };

        let request = Request::new(vec![Message::system(system), Message::user(user)]);
        match client.complete_json(request).await {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                tracing::warn!(reply = %other, "Judge reply was not a JSON object");
                JsonObject::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Judge request failed");
                JsonObject::new()
            }
        }
    }
}

#[async_trait]
impl GameJudge for GroqJudge {
    async fn generate_exercise(&self, game_type: &str) -> JsonObject {
        self.call_json(
            EXERCISE_SYSTEM_PROMPT,
            format!("Generate an exercise for game type: {game_type}"),
        )
        .await
    }

    async fn verify_answer(&self, game_type: &str, user_input: &str, context: &Value) -> JsonObject {
        self.call_json(VERIFY_SYSTEM_PROMPT, verify_message(game_type, user_input, context))
            .await
    }
}

fn verify_message(game_type: &str, user_input: &str, context: &Value) -> String {
    format!("Game Type: {game_type}\nContext: {context}\nUser Input: {user_input}")
}
