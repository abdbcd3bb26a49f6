//! Closed-class word lists and verb morphology tables for the heuristic tagger.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

pub const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "every", "each", "some", "any", "no",
    "another", "either", "neither", "all", "both", "few", "many", "much", "several",
];

pub const POSSESSIVES: &[&str] = &["my", "your", "his", "her", "its", "our", "their"];

/// Pronouns that can open a clause as its subject.
pub const SUBJECT_PRONOUNS: &[&str] = &["i", "you", "he", "she", "it", "we", "they"];

pub const OBJECT_PRONOUNS: &[&str] = &[
    "me", "him", "us", "them", "myself", "yourself", "himself", "herself", "itself", "ourselves",
    "themselves", "mine", "yours", "hers", "ours", "theirs", "everyone", "someone", "anyone",
    "nobody", "everybody", "somebody", "anybody", "something", "nothing", "everything",
    "anything",
];

pub const PREPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "from", "up", "down", "out", "off",
    "over", "under", "around", "among", "across", "behind", "beside", "beyond", "near",
    "toward", "towards", "upon", "within", "without", "along", "despite", "like", "per", "via",
    "onto", "past", "inside", "outside",
];

pub const COORDINATORS: &[&str] = &["and", "or", "but", "nor", "yet"];

pub const SUBORDINATORS: &[&str] = &[
    "because", "if", "while", "although", "though", "since", "unless", "until", "whereas",
    "whether", "than", "so", "once",
];

pub const MODALS: &[&str] = &[
    "can", "could", "will", "would", "shall", "should", "may", "might", "must", "ca", "wo",
];

pub const WH_WORDS: &[&str] = &[
    "who", "whom", "whose", "what", "which", "when", "where", "why", "how",
];

pub const INTERJECTIONS: &[&str] = &[
    "hey", "oh", "lol", "wow", "hi", "hello", "ok", "okay", "yes", "yeah", "please", "thanks",
    "ah", "oops", "hmm",
];

pub const ADVERBS: &[&str] = &[
    "very", "really", "too", "also", "just", "never", "always", "often", "here", "there", "now",
    "then", "soon", "still", "already", "quite", "even", "only", "again", "ago", "almost",
    "perhaps", "maybe", "yesterday", "today", "tomorrow", "well", "rather", "sometimes", "away",
    "back", "ever", "once", "twice", "together", "instead", "however", "therefore", "moreover",
    "thus", "indeed", "anyway", "later", "fast", "hard", "more", "most", "less", "least",
    "enough", "else", "yet", "kinda", "somewhat", "abroad", "upstairs", "downstairs", "home",
];

/// Words ending in `-ly` that are adjectives, nouns or verbs rather than adverbs.
pub const LY_NON_ADVERBS: &[&str] = &[
    "friendly", "lovely", "likely", "early", "family", "reply", "apply", "supply", "ugly",
    "silly", "holy", "lonely", "curly", "elderly", "costly", "deadly", "jolly", "fly", "july",
    "italy", "ally", "rely", "belly", "bully", "lily", "only", "daily", "weekly", "monthly",
    "yearly", "lively", "orderly", "chilly", "hilly", "sly", "assembly", "anomaly", "butterfly",
    "melancholy", "comply", "imply", "multiply", "unlikely", "unfriendly", "homely", "cowardly",
    "scholarly", "leisurely", "kindly",
];

/// Words ending in `-ing` that are not present participles.
pub const ING_NON_VERBS: &[&str] = &[
    "thing", "king", "ring", "wing", "spring", "string", "swing", "sting", "during", "morning",
    "evening", "nothing", "something", "anything", "everything", "ceiling", "pudding",
    "wedding", "building", "meaning", "feeling", "beginning", "ending", "painting", "meeting",
    "clothing", "housing", "training", "funding", "setting", "reading", "writing", "spelling",
];

/// Words ending in `-ed` that are not verb forms.
pub const ED_NON_VERBS: &[&str] = &[
    "bed", "red", "shed", "hundred", "sacred", "naked", "wicked", "greed", "seed", "weed",
    "indeed", "sled", "sped", "fled", "bled", "wed", "led", "fed",
];

/// Adjectives the suffix heuristics would otherwise miss.
pub const ADJECTIVES: &[&str] = &[
    "good", "bad", "big", "small", "new", "old", "great", "little", "long", "short", "high",
    "low", "large", "young", "early", "late", "important", "different", "happy", "sad", "quick",
    "slow", "quiet", "loud", "easy", "hard", "simple", "clear", "strong", "weak", "hot", "cold",
    "warm", "cool", "awesome", "nice", "fine", "real", "sure", "full", "free", "true", "whole",
    "best", "better", "worse", "worst", "right", "wrong", "able", "ready", "busy", "tired",
    "beautiful", "certain", "common", "dark", "bright", "deep", "difficult", "fair", "final",
    "formal", "informal", "neutral", "general", "main", "major", "open", "poor", "rich",
    "possible", "public", "recent", "serious", "social", "special", "whole", "wide", "huge",
    "tiny", "angry", "calm", "clean", "dirty", "empty", "exact", "fresh", "funny", "gentle",
    "glad", "heavy", "honest", "kind", "light", "lucky", "modern", "natural", "nervous",
    "normal", "perfect", "polite", "proud", "pure", "rare", "rude", "safe", "sharp", "smart",
    "soft", "sorry", "strange", "sweet", "thick", "thin", "tall", "ugly", "weird", "wise",
    "bored", "scared", "excited", "interested", "crazy", "lazy", "brave", "cheap", "dry", "wet",
    "green", "blue", "red", "white", "black", "yellow", "brown", "grey", "gray", "pink",
    "close", "complete", "correct", "clear", "live", "dead",
];

/// Base forms of common verbs.
pub const VERB_BASES: &[&str] = &[
    "be", "have", "do", "say", "go", "get", "make", "know", "think", "take", "see", "come",
    "want", "look", "use", "find", "give", "tell", "work", "call", "try", "ask", "need", "feel",
    "become", "leave", "put", "mean", "keep", "let", "begin", "seem", "help", "talk", "turn",
    "start", "show", "hear", "play", "run", "move", "like", "live", "believe", "hold", "bring",
    "happen", "write", "provide", "sit", "stand", "lose", "pay", "meet", "include", "continue",
    "set", "learn", "change", "lead", "understand", "watch", "follow", "stop", "create",
    "speak", "read", "allow", "add", "spend", "grow", "open", "walk", "win", "offer",
    "remember", "love", "consider", "appear", "buy", "wait", "serve", "die", "send", "expect",
    "build", "stay", "fall", "cut", "reach", "kill", "remain", "suggest", "raise", "pass",
    "sell", "require", "report", "decide", "pull", "complete", "finish", "eat", "drink",
    "sleep", "drive", "fly", "swim", "sing", "dance", "cook", "clean", "wash", "study",
    "teach", "catch", "throw", "break", "choose", "forget", "wear", "draw", "ride", "rise",
    "hide", "bite", "shake", "steal", "wake", "fight", "arrive", "return", "answer", "close",
    "enjoy", "explain", "fix", "hope", "improve", "join", "jump", "laugh", "listen", "miss",
    "plan", "prefer", "prepare", "promise", "receive", "rest", "save", "share", "smile",
    "travel", "visit", "worry", "agree", "apply", "carry", "cry", "deliver", "describe",
    "discuss", "enter", "fail", "fill", "hate", "hurry", "imagine", "invite", "kick", "knock",
    "lie", "manage", "mention", "notice", "order", "paint", "pick", "push", "rain", "relax",
    "rely", "replace", "reply", "search", "shout", "sign", "solve", "spell", "stare", "step",
    "succeed", "surprise", "thank", "touch", "train", "trust", "vote", "wish", "wonder",
    "write", "attend", "submit", "review", "edit", "rewrite", "correct", "check", "focus",
    "achieve", "analyze", "argue", "develop", "discover", "introduce", "produce", "publish",
    "realize", "reduce", "support", "accept", "admit", "avoid", "borrow", "celebrate",
    "compare", "contain", "count", "cover", "depend", "design", "destroy", "drop", "end",
    "exist", "fit", "form", "hit", "hurt", "kiss", "lend", "lift", "lock", "mark", "marry",
    "mix", "obey", "own", "point", "print", "protect", "prove", "repeat", "rush", "seek",
    "shut", "sink", "slide", "smell", "sound", "spread", "taste", "tear", "test", "treat",
    "type", "wave", "feed", "bleed", "breed", "speed", "cost", "quit", "spin", "bend",
];

/// Irregular inflected forms: surface form, lemma, and Penn tag.
const IRREGULAR_FORMS: &[(&str, &str, &str)] = &[
    ("was", "be", "VBD"), ("were", "be", "VBD"), ("been", "be", "VBN"), ("is", "be", "VBZ"),
    ("am", "be", "VBP"), ("are", "be", "VBP"), ("being", "be", "VBG"),
    ("had", "have", "VBD"), ("has", "have", "VBZ"), ("having", "have", "VBG"),
    ("did", "do", "VBD"), ("done", "do", "VBN"), ("does", "do", "VBZ"), ("doing", "do", "VBG"),
    ("went", "go", "VBD"), ("gone", "go", "VBN"), ("goes", "go", "VBZ"),
    ("met", "meet", "VBD"), ("ate", "eat", "VBD"), ("eaten", "eat", "VBN"),
    ("saw", "see", "VBD"), ("seen", "see", "VBN"), ("took", "take", "VBD"),
    ("taken", "take", "VBN"), ("made", "make", "VBD"), ("said", "say", "VBD"),
    ("got", "get", "VBD"), ("gotten", "get", "VBN"), ("came", "come", "VBD"),
    ("knew", "know", "VBD"), ("known", "know", "VBN"), ("thought", "think", "VBD"),
    ("told", "tell", "VBD"), ("found", "find", "VBD"), ("gave", "give", "VBD"),
    ("given", "give", "VBN"), ("wrote", "write", "VBD"), ("written", "write", "VBN"),
    ("began", "begin", "VBD"), ("begun", "begin", "VBN"), ("ran", "run", "VBD"),
    ("brought", "bring", "VBD"), ("bought", "buy", "VBD"), ("caught", "catch", "VBD"),
    ("taught", "teach", "VBD"), ("felt", "feel", "VBD"), ("left", "leave", "VBD"),
    ("kept", "keep", "VBD"), ("held", "hold", "VBD"), ("stood", "stand", "VBD"),
    ("understood", "understand", "VBD"), ("heard", "hear", "VBD"), ("meant", "mean", "VBD"),
    ("sent", "send", "VBD"), ("built", "build", "VBD"), ("spent", "spend", "VBD"),
    ("lost", "lose", "VBD"), ("paid", "pay", "VBD"), ("sold", "sell", "VBD"),
    ("sat", "sit", "VBD"), ("spoke", "speak", "VBD"), ("spoken", "speak", "VBN"),
    ("broke", "break", "VBD"), ("broken", "break", "VBN"), ("chose", "choose", "VBD"),
    ("chosen", "choose", "VBN"), ("drove", "drive", "VBD"), ("driven", "drive", "VBN"),
    ("fell", "fall", "VBD"), ("fallen", "fall", "VBN"), ("forgot", "forget", "VBD"),
    ("forgotten", "forget", "VBN"), ("grew", "grow", "VBD"), ("grown", "grow", "VBN"),
    ("threw", "throw", "VBD"), ("thrown", "throw", "VBN"), ("flew", "fly", "VBD"),
    ("flown", "fly", "VBN"), ("drew", "draw", "VBD"), ("drawn", "draw", "VBN"),
    ("wore", "wear", "VBD"), ("worn", "wear", "VBN"), ("won", "win", "VBD"),
    ("led", "lead", "VBD"), ("slept", "sleep", "VBD"), ("fought", "fight", "VBD"),
    ("sang", "sing", "VBD"), ("sung", "sing", "VBN"), ("swam", "swim", "VBD"),
    ("swum", "swim", "VBN"), ("rode", "ride", "VBD"), ("ridden", "ride", "VBN"),
    ("rose", "rise", "VBD"), ("risen", "rise", "VBN"), ("hid", "hide", "VBD"),
    ("hidden", "hide", "VBN"), ("bit", "bite", "VBD"), ("bitten", "bite", "VBN"),
    ("shook", "shake", "VBD"), ("shaken", "shake", "VBN"), ("stole", "steal", "VBD"),
    ("stolen", "steal", "VBN"), ("woke", "wake", "VBD"), ("woken", "wake", "VBN"),
    ("became", "become", "VBD"), ("drank", "drink", "VBD"), ("drunk", "drink", "VBN"),
    ("fed", "feed", "VBD"), ("bled", "bleed", "VBD"), ("lent", "lend", "VBD"),
    ("sought", "seek", "VBD"), ("sank", "sink", "VBD"), ("sunk", "sink", "VBN"),
    ("slid", "slide", "VBD"), ("tore", "tear", "VBD"), ("torn", "tear", "VBN"),
    ("lay", "lie", "VBD"), ("lain", "lie", "VBN"), ("bent", "bend", "VBD"),
    ("spun", "spin", "VBD"), ("rewrote", "rewrite", "VBD"), ("rewritten", "rewrite", "VBN"),
];

static IRREGULARS: Lazy<HashMap<&'static str, (&'static str, &'static str)>> = Lazy::new(|| {
    IRREGULAR_FORMS
        .iter()
        .map(|(form, lemma, tag)| (*form, (*lemma, *tag)))
        .collect()
});

static VERB_BASE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| VERB_BASES.iter().copied().collect());

static IRREGULAR_LEMMAS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    IRREGULAR_FORMS
        .iter()
        .filter(|(_, _, tag)| *tag == "VBD")
        .map(|(_, lemma, _)| *lemma)
        .collect()
});

/// Look up an irregular verb form, returning its lemma and Penn tag.
pub fn irregular(word: &str) -> Option<(&'static str, &'static str)> {
    IRREGULARS.get(word).copied()
}

pub fn is_verb_base(word: &str) -> bool {
    VERB_BASE_SET.contains(word)
}

/// Whether the verb forms its past tense irregularly (so `-ed` is wrong).
pub fn has_irregular_past(lemma: &str) -> bool {
    IRREGULAR_LEMMAS.contains(lemma)
}

pub fn contains(list: &[&str], word: &str) -> bool {
    list.contains(&word)
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Whether a short verb doubles its final consonant before a suffix (`run` -> `running`).
fn doubles_final_consonant(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    if !(3..=4).contains(&n) {
        return false;
    }
    let (c1, v, c2) = (chars[n - 3], chars[n - 2], chars[n - 1]);
    !is_vowel(c1) && is_vowel(v) && !is_vowel(c2) && !matches!(c2, 'w' | 'x' | 'y')
        && (n == 3 || !is_vowel(chars[0]) || chars[0] == chars[1])
}

/// Present participle of a base-form verb.
pub fn present_participle(lemma: &str) -> String {
    if let Some(stem) = lemma.strip_suffix("ie") {
        return format!("{stem}ying");
    }
    if lemma == "be" || lemma.ends_with("ee") || lemma.ends_with("ye") || lemma.ends_with("oe") {
        return format!("{lemma}ing");
    }
    if let Some(stem) = lemma.strip_suffix('e') {
        if !stem.is_empty() {
            return format!("{stem}ing");
        }
    }
    if doubles_final_consonant(lemma) {
        if let Some(last) = lemma.chars().last() {
            return format!("{lemma}{last}ing");
        }
    }
    format!("{lemma}ing")
}

/// Candidate base forms for an inflected word, most likely first.
pub fn base_candidates(word: &str) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(stem) = word.strip_suffix("ing") {
        if stem.len() >= 2 {
            out.push(stem.to_string());
            out.push(format!("{stem}e"));
            push_undoubled(stem, &mut out);
        }
    } else if let Some(stem) = word.strip_suffix("ied") {
        out.push(format!("{stem}y"));
    } else if let Some(stem) = word.strip_suffix("ed") {
        if stem.len() >= 2 {
            out.push(format!("{stem}e"));
            out.push(stem.to_string());
            push_undoubled(stem, &mut out);
        }
    } else if let Some(stem) = word.strip_suffix("ies") {
        out.push(format!("{stem}y"));
    } else if let Some(stem) = word.strip_suffix('s') {
        if !word.ends_with("ss") && !word.ends_with("us") && stem.len() >= 2 {
            out.push(stem.to_string());
            if let Some(shorter) = stem.strip_suffix('e') {
                out.push(shorter.to_string());
            }
        }
    }

    out
}

fn push_undoubled(stem: &str, out: &mut Vec<String>) {
    let mut chars = stem.chars().rev();
    if let (Some(a), Some(b)) = (chars.next(), chars.next()) {
        if a == b && !is_vowel(a) {
            out.push(stem[..stem.len() - a.len_utf8()].to_string());
        }
    }
}

/// Adjective form of an `-ly` adverb (`quickly` -> `quick`, `happily` -> `happy`).
pub fn adjective_from_adverb(adverb: &str) -> String {
    if let Some(stem) = adverb.strip_suffix("ily") {
        return format!("{stem}y");
    }
    if let Some(stem) = adverb.strip_suffix("ly") {
        return stem.to_string();
    }
    adverb.to_string()
}
