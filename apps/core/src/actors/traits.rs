use crate::actors::messages::AppError;
use crate::models::HistoryTurn;
use crate::rag::RetrievalResult;
use async_trait::async_trait;

/// Defines the public interface for a RAG (Retrieval-Augmented Generation) service.
///
/// This trait abstracts where answers come from, so the chat supervisor can be
/// driven by the real actor or by a test double.
#[async_trait]
pub trait RagService: Send + Sync + 'static {
    /// Answers a question, returning the reply and the passages it used.
    async fn answer(
        &self,
        question: String,
        history: Vec<HistoryTurn>,
    ) -> Result<RetrievalResult, AppError>;
}
