//! Test doubles for the model capabilities and the game judge.
//!
//! - `ScriptedEntailment` returns fixed logits and records every pair
//! - `ScriptedGenerator` replays canned rewrites and records prompts
//! - `FailingGenerator` always errors
//! - `ScriptedJudge` replays canned exercise and verdict objects

use crate::game::{GameJudge, JsonObject};
use crate::models::{EntailmentModel, GenerationParams, Generator, ModelError, NliLogits};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// Entailment
// ============================================================================

/// Entailment model with a fixed answer for every pair.
pub struct ScriptedEntailment {
    outcome: Result<NliLogits, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedEntailment {
    /// Score every pair with `logits`.
    pub fn constant(logits: NliLogits) -> Self {
        Self {
            outcome: Ok(logits),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every prediction with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every `(premise, hypothesis)` pair seen so far, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl EntailmentModel for ScriptedEntailment {
    async fn predict(&self, pairs: &[(String, String)]) -> Result<Vec<NliLogits>, ModelError> {
        lock(&self.calls).extend(pairs.iter().cloned());
        match &self.outcome {
            Ok(logits) => Ok(vec![*logits; pairs.len()]),
            Err(message) => Err(ModelError::Output(message.clone())),
        }
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Generator that replays responses in order, repeating the last one.
pub struct ScriptedGenerator {
    responses: Vec<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new<S: Into<String>>(responses: Vec<S>) -> Self {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> Result<String, ModelError> {
        let index = {
            let mut prompts = lock(&self.prompts);
            prompts.push(prompt.to_string());
            prompts.len() - 1
        };
        self.responses
            .get(index)
            .or_else(|| self.responses.last())
            .cloned()
            .ok_or_else(|| ModelError::Output("no scripted responses".to_string()))
    }
}

/// Generator whose every call fails.
pub struct FailingGenerator {
    message: String,
}

impl FailingGenerator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String, ModelError> {
        Err(ModelError::Output(self.message.clone()))
    }
}

// ============================================================================
// Game judge
// ============================================================================

/// A recorded call to [`ScriptedJudge`].
#[derive(Debug, Clone, PartialEq)]
pub enum JudgeCall {
    Prompt { game_type: String },
    Verify {
        game_type: String,
        user_input: String,
        context: Value,
    },
}

/// Judge with canned exercise and verdict objects.
pub struct ScriptedJudge {
    exercise: JsonObject,
    verdict: JsonObject,
    calls: Mutex<Vec<JudgeCall>>,
}

impl ScriptedJudge {
    /// A judge that answers every request with an empty object.
    pub fn new() -> Self {
        Self {
            exercise: JsonObject::new(),
            verdict: JsonObject::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the exercise object; non-object values are ignored.
    pub fn with_exercise(mut self, exercise: Value) -> Self {
        if let Value::Object(map) = exercise {
            self.exercise = map;
        }
        self
    }

    /// Set the verdict object; non-object values are ignored.
    pub fn with_verdict(mut self, verdict: Value) -> Self {
        if let Value::Object(map) = verdict {
            self.verdict = map;
        }
        self
    }

    pub fn calls(&self) -> Vec<JudgeCall> {
        lock(&self.calls).clone()
    }
}

impl Default for ScriptedJudge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameJudge for ScriptedJudge {
    async fn generate_exercise(&self, game_type: &str) -> JsonObject {
        lock(&self.calls).push(JudgeCall::Prompt {
            game_type: game_type.to_string(),
        });
        self.exercise.clone()
    }

    async fn verify_answer(&self, game_type: &str, user_input: &str, context: &Value) -> JsonObject {
        lock(&self.calls).push(JudgeCall::Verify {
            game_type: game_type.to_string(),
            user_input: user_input.to_string(),
            context: context.clone(),
        });
        self.verdict.clone()
    }
}
