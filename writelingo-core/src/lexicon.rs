//! Word-frequency lexicon backing the tagger and the spell checker.
//!
//! The built-in list ships with the crate; a custom list can be loaded from
//! disk with [`Lexicon::from_path`]. The file format is whitespace-separated
//! words in descending frequency order. A word may be followed by an integer
//! count; otherwise its count is derived from its rank. Lines starting with
//! `#` are ignored.

use crate::models::english;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

const BUILTIN_WORDS: &str = include_str!("../data/words.txt");

static BUILTIN: Lazy<Arc<Lexicon>> = Lazy::new(|| Arc::new(Lexicon::parse(BUILTIN_WORDS)));

/// Errors from loading a lexicon file.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("Failed to read lexicon {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lexicon {0} contains no words")]
    Empty(PathBuf),
}

/// A lowercase word list with frequency counts.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    counts: HashMap<String, u64>,
}

impl Lexicon {
    /// The shared built-in lexicon.
    pub fn builtin() -> Arc<Lexicon> {
        Arc::clone(&BUILTIN)
    }

    /// Load a lexicon from a word-list file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let lexicon = Self::parse(&content);
        if lexicon.is_empty() {
            return Err(LexiconError::Empty(path.to_path_buf()));
        }

        tracing::info!(path = %path.display(), words = lexicon.len(), "Loaded lexicon");
        Ok(lexicon)
    }

    /// Parse a word list. Earlier words rank higher; duplicates keep their first rank.
    pub fn parse(content: &str) -> Self {
        let mut counts = HashMap::new();
        let mut rank: u64 = 0;
        let mut last: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            for field in line.split_whitespace() {
                if let Ok(count) = field.parse::<u64>() {
                    if let Some(word) = last.take() {
                        counts.insert(word, count);
                    }
                    continue;
                }

                let word = field.to_lowercase();
                if !counts.contains_key(&word) {
                    counts.insert(word.clone(), zipf_count(rank));
                    rank += 1;
                    last = Some(word);
                } else {
                    last = None;
                }
            }
        }

        Self { counts }
    }

    /// Build a lexicon from explicit `(word, count)` pairs.
    pub fn from_counts<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            counts: entries
                .into_iter()
                .map(|(word, count)| (word.into().to_lowercase(), count))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Whether the exact lowercase word is listed.
    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(&word.to_lowercase())
    }

    /// Count of the exact lowercase word, without inflection matching.
    pub fn count(&self, word: &str) -> Option<u64> {
        self.counts.get(&word.to_lowercase()).copied()
    }

    /// Frequency of a word, accepting regular inflections of listed words.
    ///
    /// Inflected forms count half as much as their base so that an exact
    /// entry wins a tie against an inflection.
    pub fn frequency(&self, word: &str) -> Option<u64> {
        let lower = word.to_lowercase();
        if let Some(count) = self.counts.get(&lower) {
            return Some(*count);
        }

        if let Some((lemma, _)) = english::irregular(&lower) {
            return self.counts.get(lemma).map(|c| (c / 2).max(1));
        }

        inflection_bases(&lower)
            .into_iter()
            .filter(|base| !(lower.ends_with("ed") && english::has_irregular_past(base)))
            .find_map(|base| self.counts.get(&base))
            .map(|c| (c / 2).max(1))
    }

    /// Whether the word, or a regular inflection of it, is listed.
    pub fn is_known(&self, word: &str) -> bool {
        self.frequency(word).is_some()
    }

    /// Iterate over listed words and their counts, in no particular order.
    pub fn words(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(w, c)| (w.as_str(), *c))
    }
}

fn zipf_count(rank: u64) -> u64 {
    1_000_000 / (rank + 1)
}

/// Possible base forms of an inflected word, across verbs, nouns, adjectives and adverbs.
fn inflection_bases(word: &str) -> Vec<String> {
    let mut bases = english::base_candidates(word);

    if let Some(stem) = word.strip_suffix("ily") {
        bases.push(format!("{stem}y"));
    } else if let Some(stem) = word.strip_suffix("ly") {
        bases.push(stem.to_string());
        bases.push(format!("{stem}le"));
    }

    for suffix in ["est", "er"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            if let Some(y_stem) = stem.strip_suffix('i') {
                bases.push(format!("{y_stem}y"));
            }
            bases.push(stem.to_string());
            bases.push(format!("{stem}e"));
            let mut rev = stem.chars().rev();
            if let (Some(a), Some(b)) = (rev.next(), rev.next()) {
                if a == b {
                    bases.push(stem[..stem.len() - a.len_utf8()].to_string());
                }
            }
            break;
        }
    }

    bases.retain(|b| b.len() >= 2);
    bases
}
