use crate::actors::messages::{ActorError, AppError};
use crate::actors::traits::RagService;
use crate::models::{ChatFailure, ChatRequest, ChatResponse};
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument};

/// Returned to the host when both the message and the history are empty.
pub const EMPTY_REQUEST_MESSAGE: &str = "Pesan kosong";
/// Returned to the host when the engine fails; the error text goes in `detail`.
pub const FAILED_REQUEST_MESSAGE: &str = "Gagal memproses chat RAG";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Entry point for chat requests coming from the host.
///
/// Validates the request, forwards it to a [`RagService`] and maps every
/// failure to a [`ChatFailure`] the host can show as-is.
pub struct ChatSupervisor<R: RagService> {
    rag: Arc<R>,
    request_timeout: Duration,
}

impl<R: RagService> Clone for ChatSupervisor<R> {
    fn clone(&self) -> Self {
        Self {
            rag: Arc::clone(&self.rag),
            request_timeout: self.request_timeout,
        }
    }
}

impl<R: RagService> ChatSupervisor<R> {
    pub fn new(rag: Arc<R>) -> Self {
        Self {
            rag,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides how long a single request may take before it fails.
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Handles one chat request.
    ///
    /// An empty message with a non-empty history is still answered; the
    /// engine replies with its empty-message prompt.
    #[instrument(skip(self, request), fields(history = request.history.len()))]
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatResponse, ChatFailure> {
        let message = request.message.trim().to_string();
        if message.is_empty() && request.history.is_empty() {
            info!("Rejected empty chat request");
            return Err(ChatFailure::rejected(EMPTY_REQUEST_MESSAGE));
        }

        match self.answer(message, request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                error!("Chat request failed: {}", e);
                Err(ChatFailure::failed(FAILED_REQUEST_MESSAGE, e.to_string()))
            }
        }
    }

    async fn answer(&self, message: String, request: ChatRequest) -> Result<ChatResponse, AppError> {
        let result = timeout(self.request_timeout, self.rag.answer(message, request.history))
            .await
            .map_err(|e| AppError::Actor(ActorError::from(e)))??;

        Ok(ChatResponse {
            reply: result.reply,
            contexts: result.contexts,
        })
    }
}
