//! The analysis pipeline behind `/analyze` and `/live-check`.
//!
//! Order of work for a full analysis:
//! 1. narrative consistency and structure on the original text
//! 2. tone detection and rewrite
//! 3. rule-based correction of the rewritten text
//! 4. word diff between the original and the corrected text
//! 5. reasons attached to each diff change, then the explanation lines

use crate::change::ChangeRecord;
use crate::config::AnalysisConfig;
use crate::engines::{
    diff_words, explain, CorrectionEngine, NarrativeEngine, RelevanceResult, StructureEngine,
    Tone, ToneEngine,
};
use crate::lexicon::Lexicon;
use crate::models::{
    remote::http_client, BlankTagger, EntailmentModel, Generator, HttpEntailment, HttpGenerator,
    LexiconTagger, ModelError, Tagger,
};
use crate::spelling::SpellChecker;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("text must not be empty")]
    EmptyText,

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub target_tone: Tone,
    /// Accepted for compatibility; relevance runs through `/live-check`.
    #[serde(default)]
    pub focus_topic: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_tone: Tone::default(),
            focus_topic: None,
        }
    }

    pub fn with_target_tone(mut self, tone: Tone) -> Self {
        self.target_tone = tone;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub consistency_score: f64,
    pub readability_score: f64,
    pub detected_tone: Tone,
    pub modified_text: String,
    pub changes: Vec<ChangeRecord>,
    pub explanation: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveCheckRequest {
    pub text: String,
    #[serde(default)]
    pub topic: Option<String>,
}

/// Owns every engine; shared across requests behind an `Arc`.
pub struct Analyzer {
    narrative: NarrativeEngine,
    structure: StructureEngine,
    tone: ToneEngine,
    correction: CorrectionEngine,
}

impl Analyzer {
    pub fn new(
        narrative: NarrativeEngine,
        structure: StructureEngine,
        tone: ToneEngine,
        correction: CorrectionEngine,
    ) -> Self {
        Self {
            narrative,
            structure,
            tone,
            correction,
        }
    }

    /// Build every engine from configuration. Missing backends degrade
    /// to their fallbacks with a warning; this never fails.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let (tagger, lexicon): (Arc<dyn Tagger>, Arc<Lexicon>) = match &config.lexicon_path {
            None => {
                let lexicon = Lexicon::builtin();
                (Arc::new(LexiconTagger::new(lexicon.clone())), lexicon)
            }
            Some(path) => match Lexicon::from_path(path) {
                Ok(lexicon) => {
                    let lexicon = Arc::new(lexicon);
                    (Arc::new(LexiconTagger::new(lexicon.clone())), lexicon)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Lexicon unavailable; falling back to a blank tokenizer");
                    (Arc::new(BlankTagger), Lexicon::builtin())
                }
            },
        };
        let speller = SpellChecker::new(lexicon);

        let client = http_client(config.model_timeout);
        let token = config.hf_api_token.clone();

        let nli: Option<Arc<dyn EntailmentModel>> = match &config.nli_endpoint {
            Some(url) => Some(Arc::new(
                HttpEntailment::new(client.clone(), url.clone()).with_token(token.clone()),
            )),
            None => {
                tracing::warn!("NLI_ENDPOINT not set; consistency scores default to 0.5");
                None
            }
        };

        let generator: Option<Arc<dyn Generator>> = config.tone_endpoint.as_ref().map(|url| {
            Arc::new(HttpGenerator::new(client.clone(), url.clone()).with_token(token.clone()))
                as Arc<dyn Generator>
        });
        let tone = ToneEngine::from_adapter(
            &config.tone_adapter_path,
            config.tone_base_model.clone(),
            generator,
        );

        tracing::info!(
            dedup = %config.dedup,
            nli = nli.is_some(),
            tone_model = tone.load_error().is_none(),
            base_model = tone.base_model(),
            "Analysis engines ready"
        );

        Self::new(
            NarrativeEngine::new(tagger.clone(), nli),
            StructureEngine::new(speller.clone()),
            tone,
            CorrectionEngine::new(tagger, speller).with_dedup(config.dedup),
        )
    }

    /// Run the full pipeline.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AnalysisError> {
        if request.text.is_empty() {
            return Err(AnalysisError::EmptyText);
        }
        if let Some(topic) = &request.focus_topic {
            tracing::debug!(%topic, "focus_topic is not used by /analyze");
        }

        let narrative = self.narrative.analyze(&request.text).await?;
        let structure = self.structure.analyze(&request.text);
        let tone = self.tone.analyze(&request.text, request.target_tone).await;
        let corrected = self.correction.correct(&tone.modified_text);
        let diff = diff_words(&request.text, &corrected.corrected_text);

        let changes = diff
            .changes
            .iter()
            .map(|change| {
                let reason = corrected
                    .changes
                    .iter()
                    .find(|c| c.before == change.before)
                    .and_then(|c| c.reason.clone())
                    .unwrap_or_else(|| change.change_type.default_reason().to_string());
                change.clone().with_reason(reason)
            })
            .collect();

        let explanation = explain(&narrative, &structure, &tone, &diff);

        Ok(AnalyzeResponse {
            consistency_score: narrative.consistency_score,
            readability_score: structure.readability_score,
            detected_tone: tone.detected_tone,
            modified_text: corrected.corrected_text,
            changes,
            explanation: explanation.explanation,
        })
    }

    /// Check whether the latest sentences still follow the topic.
    pub async fn live_check(&self, request: &LiveCheckRequest) -> Result<RelevanceResult, AnalysisError> {
        Ok(self
            .narrative
            .check_relevance(&request.text, request.topic.as_deref())
            .await?)
    }
}
