//! Lexical index with BM25 ranking.
//!
//! Built once from an ordered chunk sequence and never patched afterwards;
//! a knowledge-base reload builds a fresh index.

use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{debug, info};

use super::chunker::Chunk;

/// Term frequency saturation.
pub const DEFAULT_K1: f64 = 1.5;
/// Document length normalization.
pub const DEFAULT_B: f64 = 0.75;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9À-ÿ]+").expect("Invalid regex: token"));

/// Lowercased runs of ASCII letters/digits and Latin-1 letters.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// A chunk together with its relevance to a query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// Always > 0 for search results; only the ordering is meaningful.
    pub score: f64,
}

#[derive(Debug, Clone)]
struct DocStats {
    tokens: Vec<String>,
    term_freqs: HashMap<String, usize>,
}

impl DocStats {
    fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Term statistics over a fixed corpus of chunks.
#[derive(Debug, Clone)]
pub struct LexicalIndex {
    chunks: Vec<Chunk>,
    docs: Vec<DocStats>,
    doc_freqs: HashMap<String, usize>,
    idf: HashMap<String, f64>,
    avg_doc_len: f64,
    k1: f64,
    b: f64,
}

impl LexicalIndex {
    pub fn build(chunks: Vec<Chunk>) -> Self {
        Self::with_params(chunks, DEFAULT_K1, DEFAULT_B)
    }

    pub fn with_params(chunks: Vec<Chunk>, k1: f64, b: f64) -> Self {
        let docs: Vec<DocStats> = chunks
            .iter()
            .map(|chunk| {
                let tokens = tokenize(&chunk.text);
                let mut term_freqs = HashMap::new();
                for token in &tokens {
                    *term_freqs.entry(token.clone()).or_insert(0) += 1;
                }
                DocStats { tokens, term_freqs }
            })
            .collect();

        let mut doc_freqs: HashMap<String, usize> = HashMap::new();
        for doc in &docs {
            for term in doc.term_freqs.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let n = docs.len() as f64;
        let avg_doc_len = if docs.is_empty() {
            0.0
        } else {
            docs.iter().map(DocStats::len).sum::<usize>() as f64 / n
        };

        let idf = doc_freqs
            .iter()
            .map(|(term, &df)| {
                let df = df as f64;
                (term.clone(), ((n - df + 0.5) / (df + 0.5) + 1.0).ln())
            })
            .collect();

        info!(
            "Built lexical index: {} docs, {} terms, avg length {:.1}",
            docs.len(),
            doc_freqs.len(),
            avg_doc_len
        );

        Self {
            chunks,
            docs,
            doc_freqs,
            idf,
            avg_doc_len,
            k1,
            b,
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of distinct terms in the corpus.
    pub fn vocabulary_size(&self) -> usize {
        self.doc_freqs.len()
    }

    pub fn avg_doc_len(&self) -> f64 {
        self.avg_doc_len
    }

    /// Number of chunks containing `term` (already lowercased).
    pub fn doc_freq(&self, term: &str) -> usize {
        self.doc_freqs.get(term).copied().unwrap_or(0)
    }

    pub fn idf(&self, term: &str) -> f64 {
        self.idf.get(term).copied().unwrap_or(0.0)
    }

    /// Returns at most `max(1, k)` chunks with a positive score, best first.
    /// Ties keep corpus order.
    pub fn search(&self, query: &str, k: usize) -> Vec<ScoredChunk> {
        if query.is_empty() || self.chunks.is_empty() {
            return Vec::new();
        }
        let terms = query_terms(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .enumerate()
            .filter_map(|(idx, chunk)| {
                let score = self.score_terms(idx, &terms);
                (score > 0.0).then(|| ScoredChunk {
                    chunk: chunk.clone(),
                    score,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k.max(1));

        debug!("Query {:?} matched {} chunks", query, results.len());
        results
    }

    /// BM25 score of the chunk at `doc_idx` for `query`; 0 when out of range.
    pub fn score(&self, doc_idx: usize, query: &str) -> f64 {
        if doc_idx >= self.docs.len() {
            return 0.0;
        }
        self.score_terms(doc_idx, &query_terms(query))
    }

    fn score_terms(&self, doc_idx: usize, terms: &[String]) -> f64 {
        let doc = &self.docs[doc_idx];
        let doc_len = doc.len() as f64;
        let avg = if self.avg_doc_len > 0.0 {
            self.avg_doc_len
        } else {
            1.0
        };

        terms
            .iter()
            .filter_map(|term| doc.term_freqs.get(term).map(|&f| (term, f as f64)))
            .map(|(term, f)| {
                let norm = f + self.k1 * (1.0 - self.b + self.b * (doc_len / avg));
                self.idf(term) * (f * (self.k1 + 1.0)) / norm
            })
            .sum()
    }
}

/// Distinct query tokens in first-seen order.
fn query_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(query)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
