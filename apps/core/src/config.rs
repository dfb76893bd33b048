//! Engine configuration.
//!
//! Values come from (in increasing priority) built-in defaults, the process
//! environment (optionally seeded from a `.env` file) and explicit overrides
//! applied by the caller, e.g. command-line flags.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

pub const DEFAULT_TOP_K: usize = 4;
pub const DEFAULT_CHUNK_SIZE: usize = 650;
pub const DEFAULT_CHUNK_OVERLAP: usize = 120;
pub const MIN_CHUNK_SIZE: usize = 200;

pub const ENV_KB_PATH: &str = "RAG_KB_PATH";
pub const ENV_TOP_K: &str = "RAG_TOP_K";
pub const ENV_CHUNK_SIZE: &str = "RAG_CHUNK_SIZE";
pub const ENV_CHUNK_OVERLAP: &str = "RAG_CHUNK_OVERLAP";
pub const ENV_REJOIN_WORDS: &str = "RAG_REJOIN_WORDS";

/// Configuration for the retrieval engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Path to the UTF-8 knowledge-base text file.
    pub kb_path: PathBuf,
    /// Number of passages retrieved per question (minimum 1).
    pub top_k: usize,
    /// Maximum chunk length in characters (minimum 200).
    pub chunk_size: usize,
    /// Overlap in characters between sliding windows of an oversized paragraph.
    pub chunk_overlap: usize,
    /// Repair words split by hard line wraps ("p antai" -> "pantai").
    pub rejoin_split_words: bool,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            kb_path: PathBuf::new(),
            top_k: DEFAULT_TOP_K,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            rejoin_split_words: true,
        }
    }
}

impl RagConfig {
    /// Creates a default configuration pointing at `kb_path`.
    pub fn new(kb_path: impl Into<PathBuf>) -> Self {
        Self {
            kb_path: kb_path.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with every numeric field clamped into its valid range.
    ///
    /// The overlap is kept strictly below the chunk size, otherwise the
    /// sliding window would never advance.
    pub fn normalized(&self) -> Self {
        let chunk_size = self.chunk_size.max(MIN_CHUNK_SIZE);
        Self {
            kb_path: self.kb_path.clone(),
            top_k: self.top_k.max(1),
            chunk_size,
            chunk_overlap: self.chunk_overlap.min(chunk_size - 1),
            rejoin_split_words: self.rejoin_split_words,
        }
    }

    /// Builds a configuration from `RAG_*` environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// Missing variables fall back to defaults; malformed numbers are a
    /// configuration error.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenv::dotenv();

        let mut config = Self::default();
        if let Ok(path) = env::var(ENV_KB_PATH) {
            config.kb_path = PathBuf::from(path.trim());
        }
        if let Some(top_k) = parse_env(ENV_TOP_K)? {
            config.top_k = top_k;
        }
        if let Some(size) = parse_env(ENV_CHUNK_SIZE)? {
            config.chunk_size = size;
        }
        if let Some(overlap) = parse_env(ENV_CHUNK_OVERLAP)? {
            config.chunk_overlap = overlap;
        }
        if let Some(rejoin) = parse_env(ENV_REJOIN_WORDS)? {
            config.rejoin_split_words = rejoin;
        }
        Ok(config)
    }
}

fn parse_env<T: FromStr>(key: &str) -> AppResult<Option<T>> {
    match env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {:?}", key, raw))),
        Err(_) => Ok(None),
    }
}
