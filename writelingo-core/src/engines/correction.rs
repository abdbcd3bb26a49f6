//! Rule-based grammar correction plus a per-token spelling pass.
//!
//! The rule pass runs over a tagged [`Doc`] and proposes edits over token
//! spans. Edits are deduplicated according to [`DedupMode`] and applied,
//! then every untouched word goes through the spell checker.

use crate::change::{ChangeRecord, ChangeType};
use crate::models::english;
use crate::models::{Doc, Pos, Tag, Tagger, Token};
use crate::spelling::SpellChecker;
use crate::text::{is_upper, match_case};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const SPELLING_REASON: &str = "Spelling or common word usage correction.";

/// How repeated or overlapping edits are collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupMode {
    /// Keep the first change per `before` string and rewrite every matching token.
    #[default]
    Surface,
    /// Keep the first change per token position and apply it only there.
    Position,
}

impl FromStr for DedupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "surface" => Ok(DedupMode::Surface),
            "position" => Ok(DedupMode::Position),
            other => Err(format!("unknown dedup mode '{other}' (expected surface or position)")),
        }
    }
}

impl fmt::Display for DedupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupMode::Surface => write!(f, "surface"),
            DedupMode::Position => write!(f, "position"),
        }
    }
}

/// Corrected text and the changes that produced it, in detection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub corrected_text: String,
    pub changes: Vec<ChangeRecord>,
}

/// A proposed rewrite of tokens `start..end`.
#[derive(Debug, Clone)]
struct Edit {
    start: usize,
    end: usize,
    record: ChangeRecord,
}

impl Edit {
    fn single(index: usize, token: &Token, replacement: &str, reason: String) -> Self {
        Self {
            start: index,
            end: index + 1,
            record: ChangeRecord::modification(&token.text, match_case(&token.text, replacement))
                .with_reason(reason),
        }
    }

    fn span(start: usize, end: usize, change_type: ChangeType, before: String, after: String, reason: &str) -> Self {
        Self {
            start,
            end,
            record: ChangeRecord::new(change_type, before, after).with_reason(reason),
        }
    }

    fn is_single(&self) -> bool {
        self.end - self.start == 1
    }
}

/// Grammar and spelling corrector.
pub struct CorrectionEngine {
    tagger: Arc<dyn Tagger>,
    speller: SpellChecker,
    dedup: DedupMode,
}

impl CorrectionEngine {
    pub fn new(tagger: Arc<dyn Tagger>, speller: SpellChecker) -> Self {
        Self {
            tagger,
            speller,
            dedup: DedupMode::default(),
        }
    }

    pub fn with_dedup(mut self, dedup: DedupMode) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn dedup(&self) -> DedupMode {
        self.dedup
    }

    /// Correct `text`, returning the new text and the deduplicated changes.
    pub fn correct(&self, text: &str) -> CorrectionResult {
        let doc = self.tagger.tag(text);
        let edits = detect_edits(&doc.tokens);

        let (mut changes, mut replacements) = match self.dedup {
            DedupMode::Surface => apply_by_surface(&doc.tokens, edits),
            DedupMode::Position => apply_by_position(edits),
        };

        let mut seen: HashSet<String> = changes.iter().map(|c| c.before.clone()).collect();
        let covered: HashSet<usize> = replacements
            .iter()
            .flat_map(|(start, (end, _))| *start..*end)
            .collect();

        for (i, token) in doc.tokens.iter().enumerate() {
            if covered.contains(&i) || !spelling_eligible(token) {
                continue;
            }
            let Some(corrected) = self.speller.correction(&token.text) else {
                continue;
            };
            if corrected.to_lowercase() == token.text.to_lowercase() {
                continue;
            }

            let after = match_case(&token.text, &corrected);
            replacements.insert(i, (i + 1, after.clone()));

            let first_time = match self.dedup {
                DedupMode::Surface => seen.insert(token.text.clone()),
                DedupMode::Position => true,
            };
            if first_time {
                changes.push(ChangeRecord::modification(&token.text, after).with_reason(SPELLING_REASON));
            }
        }

        let corrected_text = render(&doc, &replacements);
        tracing::debug!(changes = changes.len(), mode = %self.dedup, "correction pass");

        CorrectionResult {
            corrected_text,
            changes,
        }
    }
}

/// Replacements keyed by start token: `start -> (end, text)`.
type Replacements = HashMap<usize, (usize, String)>;

fn apply_by_surface(tokens: &[Token], edits: Vec<Edit>) -> (Vec<ChangeRecord>, Replacements) {
    let mut kept: HashMap<String, String> = HashMap::new();
    let mut records = Vec::new();
    for edit in &edits {
        if !kept.contains_key(&edit.record.before) {
            kept.insert(edit.record.before.clone(), edit.record.after.clone());
            records.push(edit.record.clone());
        }
    }

    let mut replacements = Replacements::new();
    let mut covered = vec![false; tokens.len()];

    // Multi-token edits apply wherever they fired, leftmost first.
    let mut spans: Vec<&Edit> = edits.iter().filter(|e| !e.is_single()).collect();
    spans.sort_by_key(|e| e.start);
    for edit in spans {
        if covered[edit.start..edit.end].iter().any(|c| *c) {
            continue;
        }
        let after = kept
            .get(&edit.record.before)
            .cloned()
            .unwrap_or_else(|| edit.record.after.clone());
        covered[edit.start..edit.end].iter_mut().for_each(|c| *c = true);
        replacements.insert(edit.start, (edit.end, after));
    }

    // Single-token edits rewrite every token with the same surface form.
    let single_befores: HashSet<&str> = edits
        .iter()
        .filter(|e| e.is_single())
        .map(|e| e.record.before.as_str())
        .collect();
    for (i, token) in tokens.iter().enumerate() {
        if covered[i] || !single_befores.contains(token.text.as_str()) {
            continue;
        }
        if let Some(after) = kept.get(&token.text) {
            replacements.insert(i, (i + 1, after.clone()));
            covered[i] = true;
        }
    }

    (records, replacements)
}

fn apply_by_position(edits: Vec<Edit>) -> (Vec<ChangeRecord>, Replacements) {
    let mut covered: HashSet<usize> = HashSet::new();
    let mut records = Vec::new();
    let mut replacements = Replacements::new();

    for edit in edits {
        if (edit.start..edit.end).any(|i| covered.contains(&i)) {
            continue;
        }
        covered.extend(edit.start..edit.end);
        replacements.insert(edit.start, (edit.end, edit.record.after.clone()));
        records.push(edit.record);
    }

    (records, replacements)
}

fn render(doc: &Doc, replacements: &Replacements) -> String {
    let mut out = doc.leading.clone();
    let mut i = 0;
    while i < doc.tokens.len() {
        match replacements.get(&i) {
            Some((end, text)) => {
                out.push_str(text);
                out.push_str(&doc.tokens[end - 1].whitespace);
                i = *end;
            }
            None => {
                out.push_str(&doc.tokens[i].text);
                out.push_str(&doc.tokens[i].whitespace);
                i += 1;
            }
        }
    }
    out
}

fn spelling_eligible(token: &Token) -> bool {
    token.is_alpha()
        && token.text.chars().count() > 2
        && !is_upper(&token.text)
        && token.pos != Some(Pos::Propn)
}

// ============================================================================
// Rules
// ============================================================================

fn detect_edits(tokens: &[Token]) -> Vec<Edit> {
    let mut edits = Vec::new();
    duplicate_words(tokens, &mut edits);
    article_agreement(tokens, &mut edits);
    for i in 0..tokens.len() {
        tense_agreement(tokens, i, &mut edits);
    }
    for i in 0..tokens.len() {
        lexical_override(tokens, i, &mut edits);
    }
    edits
}

fn is_word(token: &Token) -> bool {
    !token.text.is_empty() && token.text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn repeats(first: &Token, second: &Token) -> bool {
    is_word(first)
        && !first.whitespace.is_empty()
        && first.text.to_lowercase() == second.text.to_lowercase()
}

/// A run of the same word collapses to its first occurrence in one edit.
fn duplicate_words(tokens: &[Token], edits: &mut Vec<Edit>) {
    let mut i = 0;
    while i + 1 < tokens.len() {
        let mut end = i + 1;
        while end < tokens.len() && repeats(&tokens[end - 1], &tokens[end]) {
            end += 1;
        }
        if end - i < 2 {
            i += 1;
            continue;
        }

        let mut before = String::new();
        for token in &tokens[i..end - 1] {
            before.push_str(&token.text);
            before.push_str(&token.whitespace);
        }
        before.push_str(&tokens[end - 1].text);

        edits.push(Edit::span(
            i,
            end,
            ChangeType::Deletion,
            before,
            tokens[i].text.clone(),
            "Duplicate word detected.",
        ));
        i = end;
    }
}

fn is_vowel_letter(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

fn article_agreement(tokens: &[Token], edits: &mut Vec<Edit>) {
    for (i, pair) in tokens.windows(2).enumerate() {
        let (article, word) = (&pair[0], &pair[1]);
        if article.whitespace.is_empty() || !is_word(word) || word.text.chars().count() < 2 {
            continue;
        }
        let Some(first) = word.text.chars().next() else {
            continue;
        };

        let (after_article, reason) = match article.text.as_str() {
            "a" if is_vowel_letter(first) => ("an", "Use 'an' before a vowel sound."),
            "an" if first.is_ascii_alphabetic()
                && !is_vowel_letter(first)
                && word.text.chars().all(|c| c.is_ascii_alphabetic()) =>
            {
                ("a", "Use 'a' before a consonant sound.")
            }
            _ => continue,
        };

        edits.push(Edit::span(
            i,
            i + 2,
            ChangeType::Modification,
            format!("{}{}{}", article.text, article.whitespace, word.text),
            format!("{}{}{}", after_article, article.whitespace, word.text),
            reason,
        ));
    }
}

fn is_verb_with(token: &Token, tags: &[Tag]) -> bool {
    token.pos == Some(Pos::Verb) && token.tag.is_some_and(|t| tags.contains(&t))
}

fn tense_agreement(tokens: &[Token], i: usize, edits: &mut Vec<Edit>) {
    let token = &tokens[i];

    // A: do (+ not) + past/participle/3sg verb -> base form.
    if token.lemma == "do" && matches!(token.pos, Some(Pos::Aux | Pos::Verb)) {
        let mut j = i + 1;
        if tokens
            .get(j)
            .is_some_and(|t| t.pos == Some(Pos::Part) && t.lemma == "not")
        {
            j += 1;
        }
        if let Some(verb) = tokens.get(j) {
            if is_verb_with(verb, &[Tag::VBD, Tag::VBN, Tag::VBZ]) && verb.lemma != verb.lower() {
                edits.push(Edit::single(
                    j,
                    verb,
                    &verb.lemma,
                    format!("After '{}', use the base form '{}'.", token.text, verb.lemma),
                ));
            }
        }
    }

    let Some(next) = tokens.get(i + 1) else {
        return;
    };

    // B: be + base verb -> present participle.
    if token.lemma == "be" && token.pos == Some(Pos::Aux) && is_verb_with(next, &[Tag::VB]) {
        let participle = english::present_participle(&next.lemma);
        edits.push(Edit::single(
            i + 1,
            next,
            &participle,
            format!("Expected present participle '-ing' after '{}'.", token.text),
        ));
    }

    // C: modal + inflected verb -> base form.
    if token.tag == Some(Tag::MD)
        && next.pos == Some(Pos::Verb)
        && next.tag != Some(Tag::VB)
        && next.lemma != next.lower()
    {
        edits.push(Edit::single(
            i + 1,
            next,
            &next.lemma,
            format!("After modal '{}', use the base form '{}'.", token.text, next.lemma),
        ));
    }

    // D: aux + very + -ly adverb -> adjective.
    if token.pos == Some(Pos::Aux) && next.lower() == "very" {
        if let Some(adverb) = tokens.get(i + 2) {
            let lower = adverb.lower();
            if adverb.tag == Some(Tag::RB) && lower.ends_with("ly") {
                let adjective = english::adjective_from_adverb(&lower);
                edits.push(Edit::single(
                    i + 2,
                    adverb,
                    &adjective,
                    "Expected an adjective after 'very' here.".to_string(),
                ));
            }
        }
    }
}

fn lexical_override(tokens: &[Token], i: usize, edits: &mut Vec<Edit>) {
    let token = &tokens[i];
    let lower = token.lower();

    let (replacement, reason) = match lower.as_str() {
        "soonly" => ("soon", "'Soonly' is not a standard word; use 'soon'."),
        "meeted" => ("met", "'Meeted' is incorrect; the past tense of 'meet' is 'met'."),
        "works" if governed_by_the(tokens, i) => {
            ("work", "In this context, 'work' is usually uncountable.")
        }
        "offices" if governed_by_the(tokens, i) => {
            ("office", "Singular 'office' is more likely correct here.")
        }
        _ => return,
    };

    edits.push(Edit::single(i, token, replacement, reason.to_string()));
}

/// Whether a noun is preceded by `the`, allowing adjectives in between.
fn governed_by_the(tokens: &[Token], i: usize) -> bool {
    if tokens[i].pos != Some(Pos::Noun) {
        return false;
    }
    tokens[..i]
        .iter()
        .rev()
        .find(|t| t.pos != Some(Pos::Adj))
        .is_some_and(|t| t.pos == Some(Pos::Det) && t.lower() == "the")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlankTagger, LexiconTagger};

    fn engine() -> CorrectionEngine {
        CorrectionEngine::new(Arc::new(LexiconTagger::builtin()), SpellChecker::builtin())
    }

    fn befores(result: &CorrectionResult) -> Vec<&str> {
        result.changes.iter().map(|c| c.before.as_str()).collect()
    }

    #[test]
    fn test_do_support_base_form() {
        let result = engine().correct("I didn't completed the task.");
        assert_eq!(result.corrected_text, "I didn't complete the task.");
        assert_eq!(result.changes.len(), 1);

        let change = &result.changes[0];
        assert_eq!(change.change_type, ChangeType::Modification);
        assert_eq!(change.before, "completed");
        assert_eq!(change.after, "complete");
        assert_eq!(
            change.reason.as_deref(),
            Some("After 'did', use the base form 'complete'.")
        );
    }

    #[test]
    fn test_article_before_vowel() {
        let result = engine().correct("a apple was eaten");
        assert_eq!(result.corrected_text, "an apple was eaten");
        assert_eq!(result.changes[0].before, "a apple");
        assert_eq!(result.changes[0].after, "an apple");
        assert_eq!(
            result.changes[0].reason.as_deref(),
            Some("Use 'an' before a vowel sound.")
        );
    }

    #[test]
    fn test_article_before_consonant() {
        let result = engine().correct("It was an book.");
        assert_eq!(result.corrected_text, "It was a book.");
        assert_eq!(result.changes[0].after, "a book");
    }

    #[test]
    fn test_capitalized_article_is_left_alone() {
        let result = engine().correct("A apple fell.");
        assert!(result.changes.iter().all(|c| c.before != "A apple"));
    }

    #[test]
    fn test_duplicate_word_removed() {
        let result = engine().correct("This is the the best plan.");
        assert_eq!(result.corrected_text, "This is the best plan.");
        let change = &result.changes[0];
        assert_eq!(change.change_type, ChangeType::Deletion);
        assert_eq!(change.before, "the the");
        assert_eq!(change.after, "the");
        assert_eq!(change.reason.as_deref(), Some("Duplicate word detected."));
    }

    #[test]
    fn test_repeated_run_collapses_to_one_word() {
        let result = engine().correct("the the the cat sat");
        assert_eq!(result.corrected_text, "the cat sat");
        assert_eq!(befores(&result), vec!["the the the"]);
        assert_eq!(result.changes[0].after, "the");

        let result = engine()
            .with_dedup(DedupMode::Position)
            .correct("We saw it it it twice.");
        assert_eq!(result.corrected_text, "We saw it twice.");
        assert_eq!(befores(&result), vec!["it it it"]);
    }

    #[test]
    fn test_be_then_base_verb() {
        let result = engine().correct("I am go home.");
        assert_eq!(result.corrected_text, "I am going home.");
        assert_eq!(
            result.changes[0].reason.as_deref(),
            Some("Expected present participle '-ing' after 'am'.")
        );
    }

    #[test]
    fn test_very_with_adverb() {
        let result = engine().correct("She is very happily.");
        assert_eq!(result.corrected_text, "She is very happy.");
        assert_eq!(
            result.changes[0].reason.as_deref(),
            Some("Expected an adjective after 'very' here.")
        );
    }

    #[test]
    fn test_modal_rule_wins_over_lexical_override() {
        let result = engine().correct("We will meeted tomorrow.");
        assert_eq!(befores(&result), vec!["meeted"]);
        assert_eq!(result.changes[0].after, "meet");
        assert_eq!(
            result.changes[0].reason.as_deref(),
            Some("After modal 'will', use the base form 'meet'.")
        );
        assert_eq!(result.corrected_text, "We will meet tomorrow.");
    }

    #[test]
    fn test_lexical_overrides() {
        let result = engine().correct("We meeted soonly.");
        assert_eq!(result.corrected_text, "We met soon.");
        assert_eq!(befores(&result), vec!["meeted", "soonly"]);
    }

    #[test]
    fn test_countable_noun_overrides() {
        let result = engine().correct("I finished the works in the big offices.");
        assert_eq!(result.corrected_text, "I finished the work in the big office.");
        assert_eq!(
            result.changes[1].reason.as_deref(),
            Some("Singular 'office' is more likely correct here.")
        );
    }

    #[test]
    fn test_surface_dedup_rewrites_every_occurrence() {
        let result = engine().correct("I can completed this. It was completed.");
        assert_eq!(befores(&result), vec!["completed"]);
        assert_eq!(result.corrected_text, "I can complete this. It was complete.");
    }

    #[test]
    fn test_position_dedup_only_touches_fired_tokens() {
        let result = engine()
            .with_dedup(DedupMode::Position)
            .correct("I can completed this. It was completed.");
        assert_eq!(befores(&result), vec!["completed"]);
        assert_eq!(result.corrected_text, "I can complete this. It was completed.");
    }

    #[test]
    fn test_position_mode_keeps_repeated_befores() {
        let result = engine()
            .with_dedup(DedupMode::Position)
            .correct("I can completed it. You must completed it.");
        assert_eq!(befores(&result), vec!["completed", "completed"]);
    }

    #[test]
    fn test_spelling_correction_and_case() {
        let result = engine().correct("I will recieve the letter.");
        assert_eq!(result.corrected_text, "I will receive the letter.");
        assert_eq!(result.changes[0].reason.as_deref(), Some(SPELLING_REASON));

        let blank = CorrectionEngine::new(Arc::new(BlankTagger), SpellChecker::builtin());
        let result = blank.correct("Recieve it.");
        assert_eq!(result.corrected_text, "Receive it.");
        assert_eq!(result.changes[0].after, "Receive");
    }

    #[test]
    fn test_spelling_skips_short_caps_and_proper_nouns() {
        let result = engine().correct("Then Zorblax saw xq and NASAA.");
        assert!(result.changes.is_empty(), "{:?}", result.changes);
        assert_eq!(result.corrected_text, "Then Zorblax saw xq and NASAA.");
    }

    #[test]
    fn test_everyday_prose_is_unchanged() {
        let text = "Hello, the penguin swam across the cold water. \
                    Our algorithm handles database queries efficiently. \
                    The journalist interviewed several witnesses after the storm. \
                    My grandmother baked fresh bread every morning, and the kitchen smelled wonderful.";
        let result = engine().correct(text);
        assert!(result.changes.is_empty(), "{:?}", result.changes);
        assert_eq!(result.corrected_text, text);
    }

    #[test]
    fn test_all_caps_sentence_gets_rule_fixes() {
        let result = engine().correct("I DIDN'T COMPLETED THE TASK.");
        assert_eq!(result.corrected_text, "I DIDN'T COMPLETE THE TASK.");
        assert_eq!(befores(&result), vec!["COMPLETED"]);
        assert_eq!(result.changes[0].after, "COMPLETE");
    }

    #[test]
    fn test_repeated_misspelling_recorded_once() {
        let result = engine().correct("teh cat and teh dog");
        assert_eq!(result.corrected_text, "the cat and the dog");
        assert_eq!(befores(&result), vec!["teh"]);
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let result = engine().correct("  I  didn't completed\tthe task. ");
        assert_eq!(result.corrected_text, "  I  didn't complete\tthe task. ");
    }

    #[test]
    fn test_blank_tagger_skips_tagged_rules() {
        let blank = CorrectionEngine::new(Arc::new(BlankTagger), SpellChecker::builtin());
        let result = blank.correct("I didn't completed the works.");
        assert!(result.changes.is_empty());
        assert_eq!(result.corrected_text, "I didn't completed the works.");
    }

    #[test]
    fn test_dedup_mode_parsing() {
        assert_eq!("surface".parse::<DedupMode>(), Ok(DedupMode::Surface));
        assert_eq!(" Position ".parse::<DedupMode>(), Ok(DedupMode::Position));
        assert!("other".parse::<DedupMode>().is_err());
        assert_eq!(DedupMode::Position.to_string(), "position");
    }
}
