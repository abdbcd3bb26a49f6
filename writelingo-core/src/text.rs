//! Shared text helpers: whitespace normalization, sentence splitting, and
//! the word tokenizer used by the tagger and the correction pipeline.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

/// Abbreviations whose trailing period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc", "ltd",
    "co", "no", "fig", "approx", "a.m", "p.m", "dept", "est", "mt", "gen", "col", "lt", "sgt",
];

/// Contraction suffixes split off the end of a word, longest first.
const CONTRACTIONS: &[&str] = &["n't", "'re", "'ve", "'ll", "'s", "'d", "'m"];

/// Collapse runs of whitespace to a single space and trim the ends.
pub fn normalize_text(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Split text into trimmed, non-empty sentences.
///
/// Sentences end after `.`, `!` or `?` (optionally followed by closing quotes
/// or brackets) unless the word is a known abbreviation or a single-letter
/// initial. Falls back to a plain terminal-punctuation split if the
/// abbreviation-aware pass produces nothing.
pub fn split_sentences(text: &str) -> Vec<String> {
    let sentences = split_with_abbreviations(text);
    if !sentences.is_empty() {
        return sentences;
    }
    split_on_terminals(text)
}

fn split_with_abbreviations(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;

    for word in WORD.find_iter(text) {
        if start.is_none() {
            start = Some(word.start());
        }
        end = word.end();

        if ends_sentence(word.as_str()) {
            if let Some(s) = start.take() {
                push_trimmed(&mut sentences, &text[s..end]);
            }
        }
    }

    if let Some(s) = start {
        push_trimmed(&mut sentences, &text[s..end]);
    }

    sentences
}

fn split_on_terminals(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            push_trimmed(&mut sentences, &current);
            current.clear();
        }
    }
    push_trimmed(&mut sentences, &current);

    sentences
}

fn push_trimmed(out: &mut Vec<String>, sentence: &str) {
    let trimmed = sentence.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

fn ends_sentence(word: &str) -> bool {
    let core = word.trim_end_matches(['"', '\'', ')', ']', '}', '\u{201d}', '\u{2019}']);
    let Some(last) = core.chars().last() else {
        return false;
    };
    if !matches!(last, '.' | '!' | '?') {
        return false;
    }
    if last != '.' {
        return true;
    }

    let stem = core
        .trim_start_matches(['"', '\'', '(', '[', '\u{201c}', '\u{2018}'])
        .trim_end_matches('.');
    if stem.is_empty() {
        // A bare ellipsis or dot run.
        return true;
    }

    let lowered = stem.to_lowercase();
    if ABBREVIATIONS.contains(&lowered.as_str()) {
        return false;
    }

    let mut stem_chars = stem.chars();
    let is_initial = matches!(
        (stem_chars.next(), stem_chars.next()),
        (Some(c), None) if c.is_uppercase()
    );
    !is_initial
}

/// A token produced by [`tokenize`], with the whitespace that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub text: String,
    pub whitespace: String,
}

impl RawToken {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            whitespace: String::new(),
        }
    }
}

/// Split text into tokens, keeping the whitespace after each one.
///
/// Returns the leading whitespace of the text separately so that
/// `leading + Σ(text + whitespace)` reproduces the input exactly.
pub fn tokenize(text: &str) -> (String, Vec<RawToken>) {
    let trimmed = text.trim_start();
    let leading = text[..text.len() - trimmed.len()].to_string();

    let mut tokens = Vec::new();
    let mut rest = trimmed;

    while !rest.is_empty() {
        let chunk_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let chunk = &rest[..chunk_end];
        let after = &rest[chunk_end..];
        let ws_end = after
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(after.len());

        let first_new = tokens.len();
        split_chunk(chunk, &mut tokens);
        if tokens.len() > first_new {
            if let Some(last) = tokens.last_mut() {
                last.whitespace = after[..ws_end].to_string();
            }
        }

        rest = &after[ws_end..];
    }

    (leading, tokens)
}

fn split_chunk(chunk: &str, out: &mut Vec<RawToken>) {
    if !chunk.chars().any(char::is_alphanumeric) {
        out.push(RawToken::new(chunk));
        return;
    }

    // Leading punctuation, one token per character.
    let mut core = chunk;
    while let Some(c) = core.chars().next() {
        if c.is_alphanumeric() {
            break;
        }
        out.push(RawToken::new(&core[..c.len_utf8()]));
        core = &core[c.len_utf8()..];
    }

    // Trailing punctuation, collected right to left; dot runs stay together.
    let mut suffixes: Vec<&str> = Vec::new();
    loop {
        let Some(c) = core.chars().last() else {
            break;
        };
        if c.is_alphanumeric() {
            break;
        }
        let split_at = if c == '.' {
            core.trim_end_matches('.').len()
        } else {
            core.len() - c.len_utf8()
        };
        suffixes.push(&core[split_at..]);
        core = &core[..split_at];
    }

    // Contraction suffix, e.g. "didn't" -> "did" + "n't".
    let normalized = core.replace('\u{2019}', "'");
    let mut contraction = None;
    for suffix in CONTRACTIONS {
        let lowered = normalized.to_lowercase();
        if lowered.ends_with(suffix) && normalized.len() > suffix.len() {
            let split_at = core.len() - suffix_byte_len(core, suffix.chars().count());
            contraction = Some(split_at);
            break;
        }
    }

    match contraction {
        Some(split_at) => {
            out.push(RawToken::new(&core[..split_at]));
            out.push(RawToken::new(&core[split_at..]));
        }
        None => out.push(RawToken::new(core)),
    }

    for suffix in suffixes.into_iter().rev() {
        out.push(RawToken::new(suffix));
    }
}

fn suffix_byte_len(word: &str, chars: usize) -> usize {
    word.chars().rev().take(chars).map(char::len_utf8).sum()
}

/// Python-style `istitle` for a single word: first cased char upper, the rest lower.
pub fn is_title(word: &str) -> bool {
    let mut cased = word.chars().filter(|c| c.is_alphabetic());
    match cased.next() {
        Some(first) if first.is_uppercase() => cased.all(|c| !c.is_uppercase()),
        _ => false,
    }
}

/// Python-style `isupper`: at least one cased char and no lowercase ones.
pub fn is_upper(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Capitalize the first letter and lowercase the rest.
pub fn to_title(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Give `replacement` the case shape of `original`.
pub fn match_case(original: &str, replacement: &str) -> String {
    if is_upper(original) && original.chars().filter(|c| c.is_alphabetic()).count() > 1 {
        replacement.to_uppercase()
    } else if is_title(original) {
        to_title(replacement)
    } else {
        replacement.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[RawToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn rebuild(leading: &str, tokens: &[RawToken]) -> String {
        let mut out = leading.to_string();
        for t in tokens {
            out.push_str(&t.text);
            out.push_str(&t.whitespace);
        }
        out
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  one\n\ttwo   three "), "one two three");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_split_sentences_basic() {
        let sentences = split_sentences("The sky is blue. It rains! Does it? Yes.");
        assert_eq!(sentences, vec!["The sky is blue.", "It rains!", "Does it?", "Yes."]);
    }

    #[test]
    fn test_split_sentences_abbreviations() {
        let sentences = split_sentences("Mr. Smith met Dr. Jones at 5 p.m. today. They talked.");
        assert_eq!(
            sentences,
            vec!["Mr. Smith met Dr. Jones at 5 p.m. today.", "They talked."]
        );
    }

    #[test]
    fn test_split_sentences_initials_and_quotes() {
        let sentences = split_sentences("J. R. Tolkien wrote it. \"Really?\" she asked.");
        assert_eq!(
            sentences,
            vec!["J. R. Tolkien wrote it.", "\"Really?\"", "she asked."]
        );
    }

    #[test]
    fn test_split_sentences_without_terminal() {
        assert_eq!(split_sentences("no punctuation here"), vec!["no punctuation here"]);
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_split_on_terminals_fallback() {
        assert_eq!(split_on_terminals("One. Two? Three"), vec!["One.", "Two?", "Three"]);
    }

    #[test]
    fn test_tokenize_contractions_and_punctuation() {
        let (leading, tokens) = tokenize("I didn't completed the task.");
        assert_eq!(leading, "");
        assert_eq!(
            texts(&tokens),
            vec!["I", "did", "n't", "completed", "the", "task", "."]
        );
        assert_eq!(tokens[1].whitespace, "");
        assert_eq!(tokens[2].whitespace, " ");
    }

    #[test]
    fn test_tokenize_preserves_spacing() {
        let input = "  Hello,  world!\n(\"quoted\")  it's...  done ";
        let (leading, tokens) = tokenize(input);
        assert_eq!(rebuild(&leading, &tokens), input);
        assert!(texts(&tokens).contains(&"'s"));
        assert!(texts(&tokens).contains(&"..."));
    }

    #[test]
    fn test_tokenize_pure_punctuation_chunk() {
        let (_, tokens) = tokenize("wait -- what");
        assert_eq!(texts(&tokens), vec!["wait", "--", "what"]);
    }

    #[test]
    fn test_case_helpers() {
        assert!(is_title("Hello"));
        assert!(!is_title("HeLLo"));
        assert!(!is_title("hello"));
        assert!(is_upper("NASA"));
        assert!(!is_upper("NaSA"));
        assert!(!is_upper("123"));
        assert_eq!(to_title("wORLD"), "World");
    }

    #[test]
    fn test_match_case() {
        assert_eq!(match_case("Recieve", "receive"), "Receive");
        assert_eq!(match_case("RECIEVE", "receive"), "RECEIVE");
        assert_eq!(match_case("recieve", "receive"), "receive");
        assert_eq!(match_case("I", "me"), "Me");
    }
}
