//! Knowledge-base normalization and chunking.
//!
//! Source documents are often exported with hard line wraps, so a single
//! newline is treated as a space and only blank lines separate paragraphs.
//! Paragraphs are then packed greedily into chunks of at most `chunk_size`
//! characters; a paragraph that is longer than that on its own is cut with an
//! overlapping sliding window.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::config::RagConfig;
use crate::error::{AppError, AppResult};

const PARAGRAPH_BREAK: &str = "\n\n";

static MULTI_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid regex: multi newline"));

static VOCAB_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-zÀ-ÿ]+").expect("Invalid regex: vocabulary word"));

// A 1-2 letter fragment followed by a longer one, e.g. "p antai".
static SPLIT_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([a-z]{1,2})\s+([a-z]{2,})\b").expect("Invalid regex: split word")
});

/// A passage of knowledge-base text, the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identifier derived from the ordinal position (`kb:<index>`).
    pub id: String,
    pub text: String,
}

impl Chunk {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            id: format!("kb:{}", index),
            text: text.into(),
        }
    }
}

/// Splits raw knowledge-base text into bounded passages.
#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    chunk_overlap: usize,
    rejoin_split_words: bool,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::from_config(&RagConfig::default())
    }
}

impl Chunker {
    /// Creates a chunker; the overlap is capped below the chunk size.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
            rejoin_split_words: true,
        }
    }

    pub fn from_config(config: &RagConfig) -> Self {
        let config = config.normalized();
        Self::new(config.chunk_size, config.chunk_overlap)
            .with_word_rejoin(config.rejoin_split_words)
    }

    /// Enables or disables the split-word repair pass.
    pub fn with_word_rejoin(mut self, enabled: bool) -> Self {
        self.rejoin_split_words = enabled;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Normalizes `text` and returns the ordered chunk strings.
    pub fn split(&self, text: &str) -> Vec<String> {
        let text = normalize_text(text, self.rejoin_split_words);
        if text.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut current = String::new();

        for paragraph in text
            .split(PARAGRAPH_BREAK)
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            let paragraph_len = char_len(paragraph);
            let candidate_len = if current.is_empty() {
                paragraph_len
            } else {
                char_len(&current) + PARAGRAPH_BREAK.len() + paragraph_len
            };

            if candidate_len <= self.chunk_size {
                if !current.is_empty() {
                    current.push_str(PARAGRAPH_BREAK);
                }
                current.push_str(paragraph);
                continue;
            }

            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }

            if paragraph_len > self.chunk_size {
                chunks.extend(
                    sliding_windows(paragraph, self.chunk_size, self.chunk_overlap)
                        .into_iter()
                        .map(str::trim)
                        .filter(|w| !w.is_empty())
                        .map(str::to_string),
                );
            } else {
                current.push_str(paragraph);
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    /// Like [`split`](Self::split) but wraps each passage into a [`Chunk`].
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        self.split(text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(i, text))
            .collect()
    }
}

/// Reads the configured knowledge-base file and chunks it.
pub fn load_kb_chunks(config: &RagConfig) -> AppResult<Vec<Chunk>> {
    let path = &config.kb_path;
    if path.as_os_str().is_empty() {
        return Err(AppError::Config("knowledge-base path is empty".to_string()));
    }
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "knowledge base not found: {}",
            path.display()
        )));
    }

    let text = fs::read_to_string(path)?;
    let chunks = Chunker::from_config(config).chunk(&text);
    info!(
        "Loaded knowledge base {:?}: {} bytes, {} chunks",
        path,
        text.len(),
        chunks.len()
    );
    Ok(chunks)
}

/// Normalizes line endings and undoes hard line wraps.
///
/// Blank lines survive as `"\n\n"` paragraph breaks; every other newline
/// becomes a space. With `rejoin_split_words`, a short fragment followed by a
/// longer one is glued back together only when the glued word appears intact
/// somewhere else in the same text.
pub fn normalize_text(text: &str, rejoin_split_words: bool) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = MULTI_NEWLINE.replace_all(&text, PARAGRAPH_BREAK);

    let paragraphs: Vec<String> = text
        .split(PARAGRAPH_BREAK)
        .map(|p| p.replace('\n', " "))
        .collect();

    let paragraphs = if rejoin_split_words {
        let vocab = build_vocabulary(&paragraphs);
        debug!("Word-rejoin vocabulary holds {} words", vocab.len());
        paragraphs
            .iter()
            .map(|p| rejoin_split_words_in(p, &vocab))
            .collect()
    } else {
        paragraphs
    };

    paragraphs.join(PARAGRAPH_BREAK).trim().to_string()
}

fn build_vocabulary(paragraphs: &[String]) -> HashSet<String> {
    paragraphs
        .iter()
        .flat_map(|p| VOCAB_WORD.find_iter(p))
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

fn rejoin_split_words_in(text: &str, vocab: &HashSet<String>) -> String {
    SPLIT_WORD
        .replace_all(text, |caps: &Captures| {
            let joined = format!("{}{}", &caps[1], &caps[2]);
            if vocab.contains(&joined) {
                joined
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Cuts `text` into windows of `size` characters, each starting `overlap`
/// characters before the end of the previous one. Windows are not trimmed.
pub fn sliding_windows(text: &str, size: usize, overlap: usize) -> Vec<&str> {
    let size = size.max(1);
    let overlap = overlap.min(size - 1);

    // byte offset of every char, plus the end of the string
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = bounds.len() - 1;

    let mut windows = Vec::new();
    let mut start = 0;
    while start < total {
        let end = (start + size).min(total);
        windows.push(&text[bounds[start]..bounds[end]]);
        if end >= total {
            break;
        }
        start = end - overlap;
    }
    windows
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
