//! Tone detection and model-backed tone rewriting.

use crate::models::{GenerationParams, Generator};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_BASE_MODEL: &str = "google/flan-t5-small";

const FORMAL_MARKERS: &[&str] = &["therefore", "however", "moreover", "thus", "regarding"];
const INFORMAL_MARKERS: &[&str] = &["gonna", "wanna", "kinda", "lol", "hey", "cool", "awesome"];

static WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\w']+").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Formal,
    Informal,
    #[default]
    Neutral,
}

impl Tone {
    /// Parse a tone name, treating anything unrecognized as neutral.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "formal" => Tone::Formal,
            "informal" => Tone::Informal,
            _ => Tone::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Informal => "informal",
            Tone::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneResult {
    pub detected_tone: Tone,
    pub modified_text: String,
    pub applied_replacements: Vec<String>,
}

/// Count distinct formal and informal marker words and pick the larger side.
pub fn detect_tone(text: &str) -> Tone {
    let lowered = text.to_lowercase();
    let words: HashSet<&str> = WORDS.find_iter(&lowered).map(|m| m.as_str()).collect();

    let formal = FORMAL_MARKERS.iter().filter(|m| words.contains(*m)).count();
    let informal = INFORMAL_MARKERS.iter().filter(|m| words.contains(*m)).count();

    match formal.cmp(&informal) {
        std::cmp::Ordering::Greater => Tone::Formal,
        std::cmp::Ordering::Less => Tone::Informal,
        std::cmp::Ordering::Equal => Tone::Neutral,
    }
}

/// Read `base_model_name_or_path` from an adapter's `adapter_config.json`.
pub fn read_adapter_base_model(adapter_path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(adapter_path.join("adapter_config.json")).ok()?;
    let config: serde_json::Value = serde_json::from_str(&content).ok()?;
    config["base_model_name_or_path"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Rewrites text toward a target tone through a [`Generator`].
pub struct ToneEngine {
    generator: Result<Arc<dyn Generator>, String>,
    base_model: String,
    params: GenerationParams,
}

impl ToneEngine {
    /// An engine with a ready generator.
    pub fn new(generator: Arc<dyn Generator>, base_model: impl Into<String>) -> Self {
        Self {
            generator: Ok(generator),
            base_model: base_model.into(),
            params: GenerationParams::default(),
        }
    }

    /// An engine whose model failed to load; every rewrite reports `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            generator: Err(reason.into()),
            base_model: DEFAULT_BASE_MODEL.to_string(),
            params: GenerationParams::default(),
        }
    }

    /// Resolve the adapter directory and base model, then attach the generator.
    ///
    /// An explicit `base_model` wins, then the adapter config, then
    /// [`DEFAULT_BASE_MODEL`].
    pub fn from_adapter(
        adapter_path: &Path,
        base_model: Option<String>,
        generator: Option<Arc<dyn Generator>>,
    ) -> Self {
        let base_model = base_model
            .or_else(|| read_adapter_base_model(adapter_path))
            .unwrap_or_else(|| DEFAULT_BASE_MODEL.to_string());

        let generator = if !adapter_path.exists() {
            Err(format!("Adapter path not found: {}", adapter_path.display()))
        } else {
            generator.ok_or_else(|| "No tone generation endpoint configured".to_string())
        };

        if let Err(reason) = &generator {
            tracing::warn!(%reason, "Tone model unavailable; rewrites will return the input text");
        }

        Self {
            generator,
            base_model,
            params: GenerationParams::default(),
        }
    }

    pub fn base_model(&self) -> &str {
        &self.base_model
    }

    pub fn load_error(&self) -> Option<&str> {
        self.generator.as_ref().err().map(String::as_str)
    }

    /// Detect the current tone and rewrite toward `target`.
    ///
    /// Never fails: load or inference errors return the input text with a
    /// `model_error:` marker.
    pub async fn analyze(&self, text: &str, target: Tone) -> ToneResult {
        let detected_tone = detect_tone(text);

        match self.rewrite(text, target).await {
            Ok(rewritten) => ToneResult {
                detected_tone,
                modified_text: if rewritten.is_empty() {
                    text.to_string()
                } else {
                    rewritten
                },
                applied_replacements: vec![format!("model_inference:{}+LoRA", self.base_model)],
            },
            Err(message) => {
                tracing::warn!(error = %message, "Tone rewrite failed");
                ToneResult {
                    detected_tone,
                    modified_text: text.to_string(),
                    applied_replacements: vec![format!("model_error:{message}")],
                }
            }
        }
    }

    async fn rewrite(&self, text: &str, target: Tone) -> Result<String, String> {
        let generator = self
            .generator
            .as_ref()
            .map_err(|reason| format!("Tone model not loaded: {reason}"))?;

        let prompt = format!(
            "Rewrite the following text in a {target} tone. Keep the meaning same and return only rewritten text:\n\n{text}"
        );
        let output = generator
            .generate(&prompt, &self.params)
            .await
            .map_err(|e| e.to_string())?;
        Ok(output.trim().to_string())
    }
}
