//! Nearest-known-word spelling correction.

use crate::lexicon::Lexicon;
use std::sync::Arc;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Corrects words against a [`Lexicon`].
///
/// A known word, including a regular inflection of a listed one, is its own
/// correction. Otherwise the candidates are the listed words at edit
/// distance 1, or failing that 2, and the most frequent candidate wins.
/// Candidates must be exact entries so a correction is always a real word.
#[derive(Debug, Clone)]
pub struct SpellChecker {
    lexicon: Arc<Lexicon>,
}

impl SpellChecker {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn builtin() -> Self {
        Self::new(Lexicon::builtin())
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn is_known(&self, word: &str) -> bool {
        self.lexicon.is_known(word)
    }

    /// Best correction for a word, in lowercase. `None` if nothing is close enough.
    pub fn correction(&self, word: &str) -> Option<String> {
        let lower = word.to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if self.lexicon.is_known(&lower) {
            return Some(lower);
        }

        self.best_of(edits1(&lower))
            .or_else(|| self.nearest_by_distance(&lower, 2))
    }

    fn best_of(&self, candidates: Vec<String>) -> Option<String> {
        candidates
            .into_iter()
            .filter_map(|c| self.lexicon.count(&c).map(|f| (f, c)))
            .max()
            .map(|(_, word)| word)
    }

    /// Scan the lexicon for words within `max_distance` (optimal string alignment).
    fn nearest_by_distance(&self, word: &str, max_distance: usize) -> Option<String> {
        let len = word.chars().count();
        self.lexicon
            .words()
            .filter(|(candidate, _)| candidate.chars().count().abs_diff(len) <= max_distance)
            .filter_map(|(candidate, freq)| {
                let distance = strsim::osa_distance(word, candidate);
                (distance <= max_distance).then_some((distance, freq, candidate))
            })
            .min_by(|a, b| {
                a.0.cmp(&b.0)
                    .then_with(|| b.1.cmp(&a.1))
                    .then_with(|| b.2.cmp(a.2))
            })
            .map(|(_, _, candidate)| candidate.to_string())
    }
}

/// All strings one deletion, transposition, replacement, or insertion away.
fn edits1(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    let mut out = Vec::with_capacity(54 * n + 25);

    let join = |parts: &[&[char]]| parts.iter().flat_map(|p| p.iter()).collect::<String>();

    for i in 0..n {
        out.push(join(&[&chars[..i], &chars[i + 1..]]));
    }
    for i in 0..n.saturating_sub(1) {
        let mut swapped = chars.clone();
        swapped.swap(i, i + 1);
        out.push(swapped.into_iter().collect());
    }
    for i in 0..n {
        for c in ALPHABET.chars() {
            if c != chars[i] {
                out.push(join(&[&chars[..i], &[c], &chars[i + 1..]]));
            }
        }
    }
    for i in 0..=n {
        for c in ALPHABET.chars() {
            out.push(join(&[&chars[..i], &[c], &chars[i..]]));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_word_is_its_own_correction() {
        let checker = SpellChecker::builtin();
        assert_eq!(checker.correction("Apple").as_deref(), Some("apple"));
        assert_eq!(checker.correction("completed").as_deref(), Some("completed"));
    }

    #[test]
    fn test_common_misspellings() {
        let checker = SpellChecker::builtin();
        assert_eq!(checker.correction("recieve").as_deref(), Some("receive"));
        assert_eq!(checker.correction("teh").as_deref(), Some("the"));
        assert_eq!(checker.correction("wrld").as_deref(), Some("world"));
    }

    #[test]
    fn test_distance_two_fallback() {
        let lexicon = Arc::new(Lexicon::from_counts([("grammar", 10u64), ("glamour", 1)]));
        let checker = SpellChecker::new(lexicon);
        assert_eq!(checker.correction("grammer").as_deref(), Some("grammar"));
        assert_eq!(checker.correction("gramar").as_deref(), Some("grammar"));
        assert_eq!(checker.correction("gxxmmxx"), None);
    }

    #[test]
    fn test_frequency_breaks_ties() {
        let lexicon = Arc::new(Lexicon::from_counts([("cat", 5u64), ("bat", 50)]));
        let checker = SpellChecker::new(lexicon);
        assert_eq!(checker.correction("xat").as_deref(), Some("bat"));
    }

    #[test]
    fn test_corrections_are_listed_words() {
        let lexicon = Arc::new(Lexicon::from_counts([("hand", 100u64), ("handle", 2)]));
        let checker = SpellChecker::new(lexicon);
        // "handes" only passes as an inflection of "hand", so it is never offered.
        assert_eq!(checker.correction("hanles").as_deref(), Some("handle"));
        assert!(checker.is_known("handles"));

        let lexicon = Arc::new(Lexicon::from_counts([
            ("hand", 100u64),
            ("handle", 2),
            ("handles", 2),
        ]));
        let checker = SpellChecker::new(lexicon);
        assert_eq!(checker.correction("hanles").as_deref(), Some("handles"));
    }

    #[test]
    fn test_everyday_words_are_left_alone() {
        let checker = SpellChecker::builtin();
        for word in ["Hello", "handles", "journalist", "penguin", "interviewed", "witnesses"] {
            assert_eq!(checker.correction(word), Some(word.to_lowercase()), "{word}");
        }
    }

    #[test]
    fn test_edits1_size() {
        let edits = edits1("ab");
        // 2 deletes, 1 transpose, 2*25 replaces, 3*26 inserts
        assert_eq!(edits.len(), 2 + 1 + 50 + 78);
    }
}
