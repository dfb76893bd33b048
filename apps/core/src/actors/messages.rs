use serde::Serialize;
use tokio::sync::oneshot;

use crate::models::HistoryTurn;
use crate::rag::{EngineStats, RetrievalResult};

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// An error originating from the RAG actor.
    #[error("RAG request failed: {0}")]
    RagError(String),
    /// A generic internal error within an actor.
    #[error("Internal system error: {0}")]
    Internal(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(format!("Actor operation timed out: {}", err))
    }
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the `RagActor`.
#[derive(Debug)]
pub enum RagMessage {
    /// A request to answer a question from the knowledge base.
    Answer {
        question: String,
        /// Prior conversation; accepted but not used for generation.
        history: Vec<HistoryTurn>,
        /// A channel to send the reply and its contexts back.
        responder: oneshot::Sender<Result<RetrievalResult, AppError>>,
    },
    /// A request to rebuild the chunks and index from the knowledge-base file.
    Reload {
        responder: oneshot::Sender<Result<EngineStats, AppError>>,
    },
    /// A request for index statistics (builds the engine if needed).
    Stats {
        responder: oneshot::Sender<Result<EngineStats, AppError>>,
    },
}
