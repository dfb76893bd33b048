//! Key sentence extraction.
//!
//! Picks the one or two most informative sentences out of the retrieved
//! passages, scored by how many domain keywords they mention.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Domain terms (waste, ecology, reporting) that make a sentence worth quoting.
const DOMAIN_KEYWORDS: &[&str] = &[
    "sampah",
    "plastik",
    "puntung",
    "jaring",
    "biota",
    "mangrove",
    "lamun",
    "edukasi",
    "konservasi",
    "wisata",
    "muara",
    "lapor",
    "ecosea",
];

/// Knowledge-base headings that read badly when quoted.
const BOILERPLATE: &[&str] = &["Lokasi pantai", "Konteks lokal"];

const MIN_SENTENCE_CHARS: usize = 40;
const MAX_SENTENCE_CHARS: usize = 220;
const MAX_HYPHENS: usize = 3;
const ELLIPSIS: &str = "...";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace"));

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("Invalid regex: sentence end"));

/// A candidate sentence with its keyword score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySentence {
    pub text: String,
    pub score: usize,
}

/// Selects key sentences from retrieved contexts.
#[derive(Debug, Clone)]
pub struct KeySentenceExtractor {
    max_sentences: usize,
}

impl Default for KeySentenceExtractor {
    fn default() -> Self {
        Self::new(2)
    }
}

impl KeySentenceExtractor {
    pub fn new(max_sentences: usize) -> Self {
        Self { max_sentences }
    }

    /// Returns up to `max_sentences` sentences, best first, shortened to
    /// at most 220 characters.
    pub fn extract(&self, contexts: &[String]) -> Vec<String> {
        self.ranked(contexts)
            .into_iter()
            .take(self.max_sentences)
            .map(|s| shorten(&s.text))
            .collect()
    }

    /// All acceptable sentences ordered by (score, length), descending.
    pub fn ranked(&self, contexts: &[String]) -> Vec<KeySentence> {
        if contexts.is_empty() {
            return Vec::new();
        }

        let text = contexts.join("\n");
        let text = WHITESPACE.replace_all(&text, " ");

        let mut candidates: Vec<KeySentence> = split_sentences(text.trim())
            .into_iter()
            .map(str::trim)
            .filter(|s| is_quotable(s))
            .map(|s| KeySentence {
                text: s.to_string(),
                score: keyword_score(s),
            })
            .collect();

        // stable: equal keys keep document order
        candidates.sort_by(|a, b| {
            (b.score, b.text.chars().count()).cmp(&(a.score, a.text.chars().count()))
        });
        candidates
    }
}

/// Splits after `.`, `!` or `?` followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        // punctuation is a single ASCII byte
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

fn is_quotable(sentence: &str) -> bool {
    sentence.chars().count() >= MIN_SENTENCE_CHARS
        && sentence.matches('-').count() < MAX_HYPHENS
        && !BOILERPLATE.iter().any(|b| sentence.contains(b))
}

/// Number of distinct domain keywords mentioned in `sentence`.
pub fn keyword_score(sentence: &str) -> usize {
    let lower = sentence.to_lowercase();
    DOMAIN_KEYWORDS
        .iter()
        .filter(|k| lower.contains(*k))
        .count()
}

fn shorten(sentence: &str) -> String {
    if sentence.chars().count() <= MAX_SENTENCE_CHARS {
        return sentence.to_string();
    }
    let cut: String = sentence
        .chars()
        .take(MAX_SENTENCE_CHARS - ELLIPSIS.len())
        .collect();
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}
