//! EcoSea offline answering engine.
//!
//! Answers questions about beach cleanliness, waste reporting and coastal
//! care from a static knowledge-base text file. Retrieval is lexical (BM25)
//! and replies come from templates, so everything runs offline and is
//! deterministic.

pub mod actors;
pub mod brain;
pub mod config;
pub mod error;
pub mod models;
pub mod rag;

pub use config::RagConfig;
pub use error::{AppError, AppResult};
pub use models::{ChatFailure, ChatRequest, ChatResponse, HistoryTurn, Role};
pub use rag::{RagEngine, RetrievalResult, SharedEngine};

#[cfg(test)]
mod tests;
