//! Structure and clarity: readability, long sentences, and spelling hints.

use crate::spelling::SpellChecker;
use crate::text::{match_case, normalize_text, split_sentences, tokenize};
use serde::{Deserialize, Serialize};

/// Sentences with more words than this are flagged.
pub const LONG_SENTENCE_WORDS: usize = 30;

const MAX_SPELLING_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureResult {
    pub readability_score: f64,
    pub long_sentences: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StructureEngine {
    speller: SpellChecker,
}

impl StructureEngine {
    pub fn new(speller: SpellChecker) -> Self {
        Self { speller }
    }

    pub fn analyze(&self, text: &str) -> StructureResult {
        let normalized = normalize_text(text);
        let sentences = split_sentences(&normalized);
        let readability_score = flesch_reading_ease(&normalized);

        let long_sentences: Vec<String> = sentences
            .iter()
            .filter(|s| s.split_whitespace().count() > LONG_SENTENCE_WORDS)
            .cloned()
            .collect();

        let mut suggestions = self.spelling_suggestions(&normalized);
        if readability_score < 50.0 {
            suggestions
                .push("Improve readability by using shorter sentences and simpler words.".to_string());
        }
        if !long_sentences.is_empty() {
            suggestions.push(format!(
                "Split {} long sentence(s) to improve clarity.",
                long_sentences.len()
            ));
        }
        if suggestions.is_empty() {
            suggestions.push("Structure and clarity look good.".to_string());
        }

        StructureResult {
            readability_score,
            long_sentences,
            suggestions,
        }
    }

    fn spelling_suggestions(&self, text: &str) -> Vec<String> {
        let (_, tokens) = tokenize(text);
        tokens
            .iter()
            .map(|t| t.text.as_str())
            .filter(|w| w.chars().count() > 2 && w.chars().all(char::is_alphabetic))
            .filter_map(|word| {
                let corrected = self.speller.correction(word)?;
                (corrected != word.to_lowercase()).then(|| {
                    format!(
                        "Possible spelling/grammar issue: '{word}'. Consider '{}'.",
                        match_case(word, &corrected)
                    )
                })
            })
            .take(MAX_SPELLING_SUGGESTIONS)
            .collect()
    }
}

/// Flesch reading ease, rounded to two decimals. Text without words scores 0.
pub fn flesch_reading_ease(text: &str) -> f64 {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return 0.0;
    }

    let sentence_count = split_sentences(text).len().max(1) as f64;
    let word_count = words.len() as f64;
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    let score = 206.835 - 1.015 * (word_count / sentence_count) - 84.6 * (syllables as f64 / word_count);
    (score * 100.0).round() / 100.0
}

/// Vowel-group syllable estimate with a silent trailing `e`.
pub fn count_syllables(word: &str) -> usize {
    let lower: Vec<char> = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    if lower.is_empty() {
        return 0;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0;
    let mut previous_vowel = false;
    for &c in &lower {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }

    let n = lower.len();
    if n > 2 && lower[n - 1] == 'e' && !is_vowel(lower[n - 2]) {
        let consonant_le = lower[n - 2] == 'l' && !is_vowel(lower[n - 3]);
        if !consonant_le {
            count -= 1;
        }
    }

    count.max(1)
}
