//! # RAG Module
//!
//! Offline retrieval over a static knowledge-base text file.
//!
//! ```text
//! kb.txt -> Chunker -> LexicalIndex --search--> contexts
//!                                                  |
//! question -------------> ResponseComposer <-------+
//!                               |
//!                        RetrievalResult
//! ```

pub mod chunker;
pub mod engine;
pub mod index;

pub use chunker::{load_kb_chunks, normalize_text, sliding_windows, Chunk, Chunker};
pub use engine::{EngineStats, RagEngine, RetrievalResult, SharedEngine};
pub use index::{tokenize, LexicalIndex, ScoredChunk};
