//! Model capabilities used by the text engines.
//!
//! Each capability is a narrow trait so that engines can run against the
//! built-in heuristic tagger, HTTP inference backends, or scripted doubles
//! from [`crate::testing`].

pub mod english;
pub mod remote;
pub mod tagger;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use remote::{HttpEntailment, HttpGenerator};
pub use tagger::{BlankTagger, LexiconTagger};

/// Errors from model backends.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model not loaded: {0}")]
    NotLoaded(String),

    #[error("Inference request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Inference endpoint returned {status}: {message}")]
    Endpoint { status: u16, message: String },

    #[error("Unexpected inference output: {0}")]
    Output(String),
}

// ============================================================================
// Tagging
// ============================================================================

/// Penn Treebank fine-grained tags.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    NN,
    NNS,
    NNP,
    VB,
    VBD,
    VBG,
    VBN,
    VBP,
    VBZ,
    MD,
    JJ,
    RB,
    DT,
    PRP,
    #[serde(rename = "PRP$")]
    PRPS,
    IN,
    CC,
    CD,
    TO,
    UH,
    EX,
    POS,
    WH,
    PUNCT,
}

impl Tag {
    /// Parse the verb tags used by the irregular-form table.
    pub fn from_verb_tag(tag: &str) -> Option<Self> {
        match tag {
            "VB" => Some(Tag::VB),
            "VBD" => Some(Tag::VBD),
            "VBG" => Some(Tag::VBG),
            "VBN" => Some(Tag::VBN),
            "VBP" => Some(Tag::VBP),
            "VBZ" => Some(Tag::VBZ),
            _ => None,
        }
    }
}

/// Universal coarse part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pos {
    Noun,
    Propn,
    Verb,
    Aux,
    Adj,
    Adv,
    Det,
    Adp,
    Pron,
    Cconj,
    Sconj,
    Num,
    Part,
    Intj,
    Punct,
    X,
}

/// A token with its trailing whitespace and optional annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub whitespace: String,
    pub tag: Option<Tag>,
    pub pos: Option<Pos>,
    pub lemma: String,
}

impl Token {
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    pub fn is_alpha(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_alphabetic)
    }
}

/// A tokenized, possibly tagged text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Doc {
    pub leading: String,
    pub tokens: Vec<Token>,
}

impl Doc {
    /// Rebuild the text from the tokens.
    pub fn text(&self) -> String {
        let mut out = self.leading.clone();
        for token in &self.tokens {
            out.push_str(&token.text);
            out.push_str(&token.whitespace);
        }
        out
    }

    /// Contiguous proper-noun runs as `(label, text)` pairs, in order.
    pub fn entities(&self) -> Vec<(String, String)> {
        let mut entities = Vec::new();
        let mut current = String::new();

        for token in &self.tokens {
            if token.pos == Some(Pos::Propn) {
                current.push_str(&token.text);
                current.push_str(&token.whitespace);
                continue;
            }
            flush_entity(&mut current, &mut entities);
        }
        flush_entity(&mut current, &mut entities);

        entities
    }
}

fn flush_entity(current: &mut String, out: &mut Vec<(String, String)>) {
    let text = current.trim();
    if !text.is_empty() {
        out.push(("PROPN".to_string(), text.to_string()));
    }
    current.clear();
}

/// Splits text into tokens and annotates them.
pub trait Tagger: Send + Sync {
    fn tag(&self, text: &str) -> Doc;
}

// ============================================================================
// Entailment
// ============================================================================

/// Raw entailment scores for one premise/hypothesis pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NliLogits {
    pub contradiction: f32,
    pub entailment: f32,
    pub neutral: f32,
}

impl NliLogits {
    pub fn new(contradiction: f32, entailment: f32, neutral: f32) -> Self {
        Self {
            contradiction,
            entailment,
            neutral,
        }
    }

    /// Softmax over (contradiction, entailment, neutral).
    pub fn probabilities(&self) -> NliLogits {
        let [c, e, n] = softmax([self.contradiction, self.entailment, self.neutral]);
        NliLogits::new(c, e, n)
    }
}

/// Natural-language-inference classifier.
#[async_trait]
pub trait EntailmentModel: Send + Sync {
    /// Score each `(premise, hypothesis)` pair.
    async fn predict(&self, pairs: &[(String, String)]) -> Result<Vec<NliLogits>, ModelError>;
}

/// Numerically stable softmax.
pub fn softmax<const N: usize>(logits: [f32; N]) -> [f32; N] {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps = logits.map(|x| (x - max).exp());
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return [1.0 / N as f32; N];
    }
    exps.map(|x| x / sum)
}

// ============================================================================
// Generation
// ============================================================================

/// Decoding parameters for seq2seq generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: usize,
    pub do_sample: bool,
    pub num_beams: usize,
    pub early_stopping: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 128,
            do_sample: false,
            num_beams: 4,
            early_stopping: true,
        }
    }
}

/// Text-to-text generator.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax([2.0, 1.0, 0.1]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[0] > probs[1] && probs[1] > probs[2]);
    }

    #[test]
    fn test_softmax_large_values() {
        let probs = softmax([1000.0, 1000.0, 1000.0]);
        for p in probs {
            assert!((p - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_nli_probabilities() {
        let probs = NliLogits::new(0.0, 0.0, 0.0).probabilities();
        assert!((probs.entailment - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_doc_entities_group_runs() {
        let token = |text: &str, ws: &str, pos: Pos| Token {
            text: text.to_string(),
            whitespace: ws.to_string(),
            tag: None,
            pos: Some(pos),
            lemma: text.to_lowercase(),
        };
        let doc = Doc {
            leading: String::new(),
            tokens: vec![
                token("New", " ", Pos::Propn),
                token("York", " ", Pos::Propn),
                token("met", " ", Pos::Verb),
                token("Alice", "", Pos::Propn),
                token(".", "", Pos::Punct),
            ],
        };

        assert_eq!(
            doc.entities(),
            vec![
                ("PROPN".to_string(), "New York".to_string()),
                ("PROPN".to_string(), "Alice".to_string()),
            ]
        );
        assert_eq!(doc.text(), "New York met Alice.");
    }

    #[test]
    fn test_generation_defaults() {
        let params = GenerationParams::default();
        assert_eq!(params.max_new_tokens, 128);
        assert_eq!(params.num_beams, 4);
        assert!(!params.do_sample);
        assert!(params.early_stopping);
    }
}
