//! Narrative consistency: entity grouping, rolling-window entailment
//! scoring, and the live on-topic check.

use crate::models::{EntailmentModel, ModelError, Tagger};
use crate::text::{normalize_text, split_sentences};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// How many preceding sentences form the context for each sentence.
pub const DEFAULT_WINDOW: usize = 10;

/// Score used for every pair when no classifier is configured.
const UNLOADED_SCORE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeResult {
    pub entities: BTreeMap<String, Vec<String>>,
    pub consistency_score: f64,
    pub pairwise_similarities: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceResult {
    pub is_on_topic: bool,
    pub relevance_score: f64,
    pub suggestion: Option<String>,
}

impl RelevanceResult {
    fn on_topic(score: f64, suggestion: Option<String>) -> Self {
        Self {
            is_on_topic: true,
            relevance_score: score,
            suggestion,
        }
    }
}

pub struct NarrativeEngine {
    tagger: Arc<dyn Tagger>,
    nli: Option<Arc<dyn EntailmentModel>>,
    window: usize,
}

impl NarrativeEngine {
    pub fn new(tagger: Arc<dyn Tagger>, nli: Option<Arc<dyn EntailmentModel>>) -> Self {
        Self {
            tagger,
            nli,
            window: DEFAULT_WINDOW,
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn has_model(&self) -> bool {
        self.nli.is_some()
    }

    /// Group entities and score how consistent each sentence is with what came before.
    pub async fn analyze(&self, text: &str) -> Result<NarrativeResult, ModelError> {
        let normalized = normalize_text(text);
        let sentences = split_sentences(&normalized);
        let entities = self.group_entities(&normalized);

        let similarities = self.rolling_consistency(&sentences).await?;
        let consistency_score = if similarities.is_empty() {
            1.0
        } else {
            similarities.iter().sum::<f64>() / similarities.len() as f64
        };

        Ok(NarrativeResult {
            entities,
            consistency_score: consistency_score.clamp(0.0, 1.0),
            pairwise_similarities: similarities,
        })
    }

    fn group_entities(&self, text: &str) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (label, entity) in self.tagger.tag(text).entities() {
            let texts = grouped.entry(label).or_default();
            if !texts.contains(&entity) {
                texts.push(entity);
            }
        }
        grouped
    }

    async fn rolling_consistency(&self, sentences: &[String]) -> Result<Vec<f64>, ModelError> {
        if sentences.len() < 2 {
            return Ok(Vec::new());
        }

        let Some(nli) = &self.nli else {
            return Ok(vec![UNLOADED_SCORE; sentences.len() - 1]);
        };

        let pairs: Vec<(String, String)> = (1..sentences.len())
            .map(|i| {
                let start = i.saturating_sub(self.window);
                (sentences[start..i].join(" "), sentences[i].clone())
            })
            .collect();

        let scores = nli.predict(&pairs).await?;
        Ok(scores
            .iter()
            .map(|logits| {
                let probs = logits.probabilities();
                (1.0 - f64::from(probs.contradiction)).clamp(0.0, 1.0)
            })
            .collect())
    }

    /// Whether the most recent sentences still follow `topic`.
    pub async fn check_relevance(
        &self,
        text: &str,
        topic: Option<&str>,
    ) -> Result<RelevanceResult, ModelError> {
        let topic = match topic {
            Some(topic) if !topic.is_empty() && !text.trim().is_empty() => topic,
            _ => return Ok(RelevanceResult::on_topic(1.0, None)),
        };

        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Ok(RelevanceResult::on_topic(1.0, None));
        }
        let recent = sentences[sentences.len().saturating_sub(3)..].join(" ");

        let Some(nli) = &self.nli else {
            return Ok(RelevanceResult::on_topic(
                UNLOADED_SCORE,
                Some("NLI Model not loaded.".to_string()),
            ));
        };

        let scores = nli.predict(&[(topic.to_string(), recent)]).await?;
        let logits = scores
            .first()
            .ok_or_else(|| ModelError::Output("empty NLI result".to_string()))?;
        let probs = logits.probabilities();

        let relevance_score = f64::from(probs.entailment) + 0.5 * f64::from(probs.neutral);
        let is_on_topic = relevance_score > 0.4;

        let suggestion = if !is_on_topic {
            Some(format!(
                "You might be drifting away from your topic: '{topic}'. Try to bring it back to the main point."
            ))
        } else if relevance_score < 0.6 {
            Some("You're getting a bit off-track. Stay focused on the script's goal.".to_string())
        } else {
            None
        };

        Ok(RelevanceResult {
            is_on_topic,
            relevance_score,
            suggestion,
        })
    }
}
