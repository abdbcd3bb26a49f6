//! Built-in taggers.
//!
//! [`LexiconTagger`] is a left-to-right heuristic tagger: closed-class words
//! come from fixed lists, open-class words are tagged from their suffix and
//! the tag of the preceding content word. It is good enough to drive the
//! grammar rules without a statistical model. [`BlankTagger`] only tokenizes.

use super::english::{self, contains};
use super::{Doc, Pos, Tag, Tagger, Token};
use crate::lexicon::Lexicon;
use crate::text::{is_upper, tokenize};
use std::sync::Arc;

/// Tokenizer without annotations, used when no tagger is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankTagger;

impl Tagger for BlankTagger {
    fn tag(&self, text: &str) -> Doc {
        let (leading, raw) = tokenize(text);
        let tokens = raw
            .into_iter()
            .map(|r| Token {
                lemma: r.text.to_lowercase(),
                text: r.text,
                whitespace: r.whitespace,
                tag: None,
                pos: None,
            })
            .collect();
        Doc { leading, tokens }
    }
}

/// Heuristic POS tagger and lemmatizer backed by a [`Lexicon`].
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    lexicon: Arc<Lexicon>,
}

/// What the preceding content word says about the current slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// After a modal, `to`, or auxiliary `do`.
    BaseVerb,
    AfterBe,
    AfterHave,
    Subject,
    Nominal,
    Open,
}

type Annotation = (Tag, Pos, String);

impl LexiconTagger {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn builtin() -> Self {
        Self::new(Lexicon::builtin())
    }

    fn classify(&self, tokens: &[Token], i: usize) -> Annotation {
        let text = tokens[i].text.replace('\u{2019}', "'");
        let w = text.to_lowercase();

        if !text.chars().any(char::is_alphanumeric) {
            return (Tag::PUNCT, Pos::Punct, text);
        }
        if text.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
            return (Tag::CD, Pos::Num, text);
        }
        if w == "n't" || w == "not" {
            return (Tag::RB, Pos::Part, "not".to_string());
        }
        if let Some(annotation) = contraction(&w, previous_word(tokens, i).as_deref()) {
            return annotation;
        }

        let first_upper = text.chars().next().is_some_and(char::is_uppercase);
        if first_upper && w != "i" {
            let known = is_closed_class(&w) || self.lexicon.is_known(&w);
            // Shouted words are tagged by their lowercase form; unknown ones stay acronyms.
            let shouted = is_upper(&text) && known;
            if !shouted && (!at_sentence_start(tokens, i) || !known) {
                return (Tag::NNP, Pos::Propn, text);
            }
        }

        if let Some(annotation) = self.closed_class(tokens, i, &w) {
            return annotation;
        }

        self.open_class(tokens, i, &w)
    }

    fn closed_class(&self, tokens: &[Token], i: usize, w: &str) -> Option<Annotation> {
        let next = next_word(tokens, i);
        let next = next.as_deref();
        let slot = slot(tokens, i);

        let annotation = match w {
            "to" => (Tag::TO, Pos::Part, "to".to_string()),
            "ca" | "wo" if next == Some("n't") => {
                let lemma = if w == "ca" { "can" } else { "will" };
                (Tag::MD, Pos::Aux, lemma.to_string())
            }
            _ if contains(english::MODALS, w) && w != "ca" && w != "wo" => {
                (Tag::MD, Pos::Aux, w.to_string())
            }
            "be" | "am" | "is" | "are" | "was" | "were" | "been" | "being" => {
                let tag = match english::irregular(w) {
                    Some((_, tag)) => Tag::from_verb_tag(tag).unwrap_or(Tag::VB),
                    None => Tag::VB,
                };
                (tag, Pos::Aux, "be".to_string())
            }
            "have" | "has" | "had" | "having" => {
                let tag = match w {
                    "has" => Tag::VBZ,
                    "had" => Tag::VBD,
                    "having" => Tag::VBG,
                    _ if slot == Slot::BaseVerb => Tag::VB,
                    _ => Tag::VBP,
                };
                let pos = if next_is_participle(tokens, i) {
                    Pos::Aux
                } else {
                    Pos::Verb
                };
                (tag, pos, "have".to_string())
            }
            "do" | "does" | "did" | "done" | "doing" => {
                let tag = match w {
                    "does" => Tag::VBZ,
                    "did" => Tag::VBD,
                    "done" => Tag::VBN,
                    "doing" => Tag::VBG,
                    _ if slot == Slot::BaseVerb => Tag::VB,
                    _ => Tag::VBP,
                };
                let auxiliary = matches!(w, "do" | "does" | "did")
                    && next.is_some_and(|n| {
                        n == "n't"
                            || n == "not"
                            || contains(english::SUBJECT_PRONOUNS, n)
                            || english::is_verb_base(n)
                    });
                let pos = if auxiliary { Pos::Aux } else { Pos::Verb };
                (tag, pos, "do".to_string())
            }
            "there" if next.is_some_and(is_be_form) => (Tag::EX, Pos::Pron, w.to_string()),
            "that" if next.is_some_and(|n| {
                contains(english::SUBJECT_PRONOUNS, n) || contains(english::DETERMINERS, n)
            }) =>
            {
                (Tag::IN, Pos::Sconj, w.to_string())
            }
            _ if contains(english::DETERMINERS, w) => (Tag::DT, Pos::Det, w.to_string()),
            _ if contains(english::POSSESSIVES, w) => (Tag::PRPS, Pos::Pron, w.to_string()),
            _ if contains(english::SUBJECT_PRONOUNS, w) || contains(english::OBJECT_PRONOUNS, w) => {
                (Tag::PRP, Pos::Pron, w.to_string())
            }
            "who" | "whom" | "whose" | "what" | "which" => (Tag::WH, Pos::Pron, w.to_string()),
            _ if contains(english::WH_WORDS, w) => (Tag::WH, Pos::Adv, w.to_string()),
            _ if contains(english::PREPOSITIONS, w)
                && !(slot == Slot::Subject && english::is_verb_base(w)) =>
            {
                (Tag::IN, Pos::Adp, w.to_string())
            }
            _ if contains(english::COORDINATORS, w) => (Tag::CC, Pos::Cconj, w.to_string()),
            _ if contains(english::SUBORDINATORS, w) => (Tag::IN, Pos::Sconj, w.to_string()),
            _ if contains(english::INTERJECTIONS, w) => (Tag::UH, Pos::Intj, w.to_string()),
            _ if contains(english::ADVERBS, w) => (Tag::RB, Pos::Adv, w.to_string()),
            _ => return None,
        };

        Some(annotation)
    }

    fn open_class(&self, tokens: &[Token], i: usize, w: &str) -> Annotation {
        let slot = slot(tokens, i);
        let len = w.chars().count();

        if let Some((lemma, tag)) = english::irregular(w) {
            if slot == Slot::Nominal && self.lexicon.contains(w) {
                return (Tag::NN, Pos::Noun, w.to_string());
            }
            let mut tag = Tag::from_verb_tag(tag).unwrap_or(Tag::VBD);
            if tag == Tag::VBD && matches!(slot, Slot::AfterBe | Slot::AfterHave) {
                tag = Tag::VBN;
            }
            return (tag, Pos::Verb, lemma.to_string());
        }

        if contains(english::ED_NON_VERBS, w) {
            return if contains(english::ADJECTIVES, w) {
                (Tag::JJ, Pos::Adj, w.to_string())
            } else {
                (Tag::NN, Pos::Noun, w.to_string())
            };
        }

        if contains(english::ING_NON_VERBS, w) && slot != Slot::AfterBe {
            return (Tag::NN, Pos::Noun, w.to_string());
        }

        let verb_base = english::is_verb_base(w);
        if verb_base && slot == Slot::BaseVerb {
            return (Tag::VB, Pos::Verb, w.to_string());
        }
        if verb_base && slot == Slot::Subject {
            return (Tag::VBP, Pos::Verb, w.to_string());
        }

        if contains(english::ADJECTIVES, w) {
            return (Tag::JJ, Pos::Adj, w.to_string());
        }

        if verb_base {
            return match slot {
                Slot::Nominal => (Tag::NN, Pos::Noun, w.to_string()),
                Slot::Open if !at_sentence_start(tokens, i) => (Tag::NN, Pos::Noun, w.to_string()),
                _ => (Tag::VB, Pos::Verb, w.to_string()),
            };
        }

        if len > 4 && w.ends_with("ly") && !contains(english::LY_NON_ADVERBS, w) {
            return (Tag::RB, Pos::Adv, w.to_string());
        }

        if len > 4 && w.ends_with("ing") {
            return (Tag::VBG, Pos::Verb, self.verb_lemma(w));
        }

        if len > 3 && w.ends_with("ed") {
            let tag = match slot {
                Slot::AfterBe | Slot::AfterHave | Slot::Nominal => Tag::VBN,
                _ => Tag::VBD,
            };
            return (tag, Pos::Verb, self.verb_lemma(w));
        }

        if len > 3 && w.ends_with('s') && !w.ends_with("ss") && !w.ends_with("us") {
            let lemma = self.verb_lemma(w);
            let verbal = english::is_verb_base(&lemma)
                && matches!(slot, Slot::Subject | Slot::BaseVerb);
            return if verbal {
                (Tag::VBZ, Pos::Verb, lemma)
            } else {
                (Tag::NNS, Pos::Noun, lemma)
            };
        }

        if len > 5
            && ["ous", "ful", "ive", "able", "ible", "less", "ic"]
                .iter()
                .any(|suffix| w.ends_with(suffix))
        {
            return (Tag::JJ, Pos::Adj, w.to_string());
        }

        (Tag::NN, Pos::Noun, w.to_string())
    }

    /// Pick the most plausible base form: a known verb, then any listed word.
    fn verb_lemma(&self, w: &str) -> String {
        let candidates = english::base_candidates(w);
        candidates
            .iter()
            .find(|c| english::is_verb_base(c))
            .or_else(|| candidates.iter().find(|c| self.lexicon.contains(c)))
            .or_else(|| candidates.first())
            .cloned()
            .unwrap_or_else(|| w.to_string())
    }
}

impl Tagger for LexiconTagger {
    fn tag(&self, text: &str) -> Doc {
        let (leading, raw) = tokenize(text);
        let mut tokens: Vec<Token> = raw
            .into_iter()
            .map(|r| Token {
                text: r.text,
                whitespace: r.whitespace,
                tag: None,
                pos: None,
                lemma: String::new(),
            })
            .collect();

        for i in 0..tokens.len() {
            let (tag, pos, lemma) = self.classify(&tokens, i);
            let token = &mut tokens[i];
            token.tag = Some(tag);
            token.pos = Some(pos);
            token.lemma = lemma;
        }

        Doc { leading, tokens }
    }
}

fn contraction(w: &str, previous: Option<&str>) -> Option<Annotation> {
    let annotation = match w {
        "'s" => {
            let copula = previous.is_some_and(|p| {
                matches!(
                    p,
                    "it" | "he" | "she" | "that" | "there" | "what" | "who" | "where" | "how"
                        | "here" | "this"
                )
            });
            if copula {
                (Tag::VBZ, Pos::Aux, "be")
            } else {
                (Tag::POS, Pos::Part, "'s")
            }
        }
        "'re" | "'m" => (Tag::VBP, Pos::Aux, "be"),
        "'ve" => (Tag::VBP, Pos::Aux, "have"),
        "'ll" => (Tag::MD, Pos::Aux, "will"),
        "'d" => (Tag::MD, Pos::Aux, "would"),
        _ => return None,
    };
    let (tag, pos, lemma) = annotation;
    Some((tag, pos, lemma.to_string()))
}

fn is_closed_class(w: &str) -> bool {
    [
        english::DETERMINERS,
        english::POSSESSIVES,
        english::SUBJECT_PRONOUNS,
        english::OBJECT_PRONOUNS,
        english::PREPOSITIONS,
        english::COORDINATORS,
        english::SUBORDINATORS,
        english::MODALS,
        english::WH_WORDS,
        english::INTERJECTIONS,
        english::ADVERBS,
    ]
    .iter()
    .any(|list| contains(list, w))
}

fn is_be_form(w: &str) -> bool {
    matches!(w, "is" | "are" | "was" | "were" | "be" | "been" | "'s" | "'re")
}

fn is_opening_mark(text: &str) -> bool {
    matches!(text, "\"" | "'" | "(" | "[" | "\u{201c}" | "\u{2018}")
}

fn at_sentence_start(tokens: &[Token], i: usize) -> bool {
    tokens[..i]
        .iter()
        .rev()
        .find(|t| !is_opening_mark(&t.text))
        .map_or(true, |t| {
            t.text.ends_with(['.', '!', '?', ':']) && !t.text.chars().any(char::is_alphanumeric)
        })
}

fn previous_word(tokens: &[Token], i: usize) -> Option<String> {
    i.checked_sub(1).map(|j| tokens[j].lower())
}

fn next_word(tokens: &[Token], i: usize) -> Option<String> {
    tokens.get(i + 1).map(|t| t.lower().replace('\u{2019}', "'"))
}

/// Whether the next content word (skipping adverbs and `not`) looks like a past participle.
fn next_is_participle(tokens: &[Token], i: usize) -> bool {
    tokens[i + 1..]
        .iter()
        .map(|t| t.lower())
        .find(|w| w != "n't" && w != "not" && !contains(english::ADVERBS, w))
        .is_some_and(|w| {
            matches!(english::irregular(&w), Some((_, "VBN" | "VBD")))
                || (w.len() > 3 && (w.ends_with("ed") || w.ends_with("en")))
        })
}

/// Classify the slot from the closest preceding token that is not an adverb.
fn slot(tokens: &[Token], i: usize) -> Slot {
    let Some(prev) = tokens[..i]
        .iter()
        .rev()
        .find(|t| !matches!(t.pos, Some(Pos::Adv | Pos::Part)) || t.tag == Some(Tag::TO))
    else {
        return Slot::Open;
    };

    match (prev.tag, prev.pos) {
        (Some(Tag::MD | Tag::TO), _) => Slot::BaseVerb,
        (_, Some(Pos::Aux)) if prev.lemma == "do" => Slot::BaseVerb,
        (_, Some(Pos::Aux)) if prev.lemma == "be" => Slot::AfterBe,
        (_, Some(Pos::Aux)) if prev.lemma == "have" => Slot::AfterHave,
        (Some(Tag::PRP), _) if contains(english::SUBJECT_PRONOUNS, &prev.lower()) => Slot::Subject,
        (_, Some(Pos::Noun | Pos::Propn)) => Slot::Subject,
        (Some(Tag::PRPS | Tag::POS), _) => Slot::Nominal,
        (_, Some(Pos::Det | Pos::Adj | Pos::Adp | Pos::Num)) => Slot::Nominal,
        _ => Slot::Open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(text: &str) -> Vec<(String, Option<Tag>, Option<Pos>, String)> {
        LexiconTagger::builtin()
            .tag(text)
            .tokens
            .into_iter()
            .map(|t| (t.text, t.tag, t.pos, t.lemma))
            .collect()
    }

    fn find<'a>(
        tokens: &'a [(String, Option<Tag>, Option<Pos>, String)],
        text: &str,
    ) -> &'a (String, Option<Tag>, Option<Pos>, String) {
        tokens.iter().find(|t| t.0 == text).unwrap()
    }

    #[test]
    fn test_do_support_with_negation() {
        let tokens = tagged("I didn't completed the task.");
        let did = find(&tokens, "did");
        assert_eq!(did.2, Some(Pos::Aux));
        assert_eq!(did.3, "do");

        let nt = find(&tokens, "n't");
        assert_eq!(nt.2, Some(Pos::Part));
        assert_eq!(nt.3, "not");

        let completed = find(&tokens, "completed");
        assert_eq!(completed.1, Some(Tag::VBD));
        assert_eq!(completed.2, Some(Pos::Verb));
        assert_eq!(completed.3, "complete");

        assert_eq!(find(&tokens, "task").2, Some(Pos::Noun));
        assert_eq!(find(&tokens, ".").2, Some(Pos::Punct));
    }

    #[test]
    fn test_modal_then_past_form() {
        let tokens = tagged("We will meeted tomorrow.");
        assert_eq!(find(&tokens, "will").1, Some(Tag::MD));
        let meeted = find(&tokens, "meeted");
        assert_eq!(meeted.1, Some(Tag::VBD));
        assert_eq!(meeted.3, "meet");
    }

    #[test]
    fn test_be_then_base_verb() {
        let tokens = tagged("I am go to school.");
        assert_eq!(find(&tokens, "am").2, Some(Pos::Aux));
        assert_eq!(find(&tokens, "go").1, Some(Tag::VB));
    }

    #[test]
    fn test_adverb_after_very() {
        let tokens = tagged("She is very quickly.");
        assert_eq!(find(&tokens, "very").1, Some(Tag::RB));
        assert_eq!(find(&tokens, "quickly").1, Some(Tag::RB));
    }

    #[test]
    fn test_plural_nouns_after_determiner() {
        let tokens = tagged("I visited the works and the offices.");
        let works = find(&tokens, "works");
        assert_eq!(works.1, Some(Tag::NNS));
        assert_eq!(works.3, "work");
        let offices = find(&tokens, "offices");
        assert_eq!(offices.2, Some(Pos::Noun));
        assert_eq!(offices.3, "office");
    }

    #[test]
    fn test_third_person_verb() {
        let tokens = tagged("She works hard.");
        assert_eq!(find(&tokens, "works").1, Some(Tag::VBZ));
    }

    #[test]
    fn test_proper_nouns() {
        let tokens = tagged("Yesterday Alice met Bob in Paris.");
        assert_eq!(find(&tokens, "Yesterday").2, Some(Pos::Adv));
        assert_eq!(find(&tokens, "Alice").2, Some(Pos::Propn));
        assert_eq!(find(&tokens, "Paris").2, Some(Pos::Propn));
        assert_eq!(find(&tokens, "met").1, Some(Tag::VBD));
    }

    #[test]
    fn test_all_caps_words_use_lowercase_tags() {
        let tokens = tagged("I DIDN'T COMPLETED THE TASK FOR NASA.");
        assert_eq!(find(&tokens, "DID").2, Some(Pos::Aux));
        let completed = find(&tokens, "COMPLETED");
        assert_eq!(completed.1, Some(Tag::VBD));
        assert_eq!(completed.3, "complete");
        assert_eq!(find(&tokens, "THE").2, Some(Pos::Det));
        assert_eq!(find(&tokens, "TASK").2, Some(Pos::Noun));
        assert_eq!(find(&tokens, "NASA").2, Some(Pos::Propn));
    }

    #[test]
    fn test_participle_after_be() {
        let tokens = tagged("A apple was eaten.");
        assert_eq!(find(&tokens, "apple").2, Some(Pos::Noun));
        assert_eq!(find(&tokens, "eaten").1, Some(Tag::VBN));
    }

    #[test]
    fn test_blank_tagger_has_no_annotations() {
        let doc = BlankTagger.tag("  Hello there.");
        assert_eq!(doc.leading, "  ");
        assert!(doc.tokens.iter().all(|t| t.tag.is_none() && t.pos.is_none()));
        assert_eq!(doc.tokens[0].lemma, "hello");
        assert_eq!(doc.text(), "  Hello there.");
    }
}
