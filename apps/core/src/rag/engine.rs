//! Engine facade.
//!
//! [`RagEngine`] owns the chunked knowledge base, its lexical index and the
//! reply composer. It is immutable once built, so it can be shared behind an
//! `Arc` without locking. [`SharedEngine`] builds it lazily, exactly once.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, info};

use super::chunker::{load_kb_chunks, Chunk, Chunker};
use super::index::{LexicalIndex, ScoredChunk};
use crate::brain::{ResponseComposer, EMPTY_MESSAGE_REPLY};
use crate::config::RagConfig;
use crate::error::AppResult;
use crate::models::HistoryTurn;

/// Reply plus the passages it was grounded on, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub reply: String,
    pub contexts: Vec<String>,
}

/// Size figures for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    pub chunks: usize,
    pub vocabulary: usize,
    pub avg_doc_len: f64,
}

/// Retrieval-augmented answering over a static knowledge base.
#[derive(Debug)]
pub struct RagEngine {
    config: RagConfig,
    index: LexicalIndex,
    composer: ResponseComposer,
}

impl RagEngine {
    /// Loads the knowledge base named in `config` and indexes it.
    ///
    /// Fails fast on an empty path, a missing file or a read error.
    pub fn from_config(config: &RagConfig) -> AppResult<Self> {
        let config = config.normalized();
        let chunks = load_kb_chunks(&config)?;
        Ok(Self::from_chunks(chunks, config))
    }

    /// Builds an engine over already chunked passages.
    pub fn from_chunks(chunks: Vec<Chunk>, config: RagConfig) -> Self {
        Self {
            config: config.normalized(),
            index: LexicalIndex::build(chunks),
            composer: ResponseComposer::default(),
        }
    }

    /// Chunks `text` with the settings in `config` and builds an engine.
    pub fn from_text(text: &str, config: RagConfig) -> Self {
        let chunks = Chunker::from_config(&config).chunk(text);
        Self::from_chunks(chunks, config)
    }

    /// Builds a fresh engine from the same configuration.
    pub fn reload(&self) -> AppResult<Self> {
        info!("Reloading knowledge base from {:?}", self.config.kb_path);
        Self::from_config(&self.config)
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    pub fn chunks(&self) -> &[Chunk] {
        self.index.chunks()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            chunks: self.index.len(),
            vocabulary: self.index.vocabulary_size(),
            avg_doc_len: self.index.avg_doc_len(),
        }
    }

    /// Scored hits for `question`; `k` defaults to the configured top-k.
    pub fn search(&self, question: &str, k: Option<usize>) -> Vec<ScoredChunk> {
        let k = k.unwrap_or(self.config.top_k).max(1);
        self.index.search(question, k)
    }

    /// Texts of the top-k passages for `question`.
    pub fn retrieve(&self, question: &str, k: Option<usize>) -> Vec<String> {
        self.search(question, k)
            .into_iter()
            .map(|hit| hit.chunk.text)
            .collect()
    }

    /// Answers `question` from the knowledge base.
    ///
    /// `history` is accepted for conversational callers but is not consulted
    /// when generating the reply.
    pub fn answer(&self, question: &str, history: Option<&[HistoryTurn]>) -> RetrievalResult {
        let question = question.trim();
        if question.is_empty() {
            return RetrievalResult {
                reply: EMPTY_MESSAGE_REPLY.to_string(),
                contexts: Vec::new(),
            };
        }

        let contexts = self.retrieve(question, None);
        let reply = self.composer.compose(question, &contexts);
        debug!(
            "Answered with {} contexts ({} history turns ignored)",
            contexts.len(),
            history.map_or(0, <[HistoryTurn]>::len)
        );
        RetrievalResult { reply, contexts }
    }
}

/// Lazily built, process-wide engine handle.
///
/// The first caller of [`get`](Self::get) builds the engine while holding an
/// init lock; concurrent callers wait and then observe the same instance.
/// A failed build is not remembered, so a later call retries.
#[derive(Debug)]
pub struct SharedEngine {
    config: RagConfig,
    cell: OnceLock<Arc<RagEngine>>,
    init_lock: Mutex<()>,
    builds: AtomicUsize,
}

impl SharedEngine {
    pub fn new(config: RagConfig) -> Self {
        Self {
            config,
            cell: OnceLock::new(),
            init_lock: Mutex::new(()),
            builds: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Returns the engine, building it on first use.
    pub fn get(&self) -> AppResult<Arc<RagEngine>> {
        if let Some(engine) = self.cell.get() {
            return Ok(Arc::clone(engine));
        }

        // the guarded data is (), so a poisoned lock is still usable
        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(engine) = self.cell.get() {
            return Ok(Arc::clone(engine));
        }

        info!("Initializing RAG engine...");
        let engine = Arc::new(RagEngine::from_config(&self.config)?);
        self.builds.fetch_add(1, Ordering::SeqCst);
        let stats = engine.stats();
        info!(
            "RAG engine ready: {} chunks, {} terms",
            stats.chunks, stats.vocabulary
        );

        Ok(Arc::clone(self.cell.get_or_init(|| engine)))
    }

    /// The engine if it has already been built.
    pub fn get_if_ready(&self) -> Option<Arc<RagEngine>> {
        self.cell.get().cloned()
    }

    /// How many times an engine was successfully built (0 or 1).
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Convenience for `get()?.answer(..)`.
    pub fn answer(
        &self,
        question: &str,
        history: Option<&[HistoryTurn]>,
    ) -> AppResult<RetrievalResult> {
        Ok(self.get()?.answer(question, history))
    }
}
