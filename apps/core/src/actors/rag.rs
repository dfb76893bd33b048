use crate::actors::messages::{ActorError, AppError, RagMessage};
use crate::actors::traits::RagService;
use crate::models::HistoryTurn;
use crate::rag::{EngineStats, RagEngine, RetrievalResult, SharedEngine};
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// A handle to the `RagActor`.
///
/// This provides a public, cloneable interface for sending messages to the running RAG actor,
/// which owns the engine and serves answers one request at a time.
#[derive(Clone)]
pub struct RagActorHandle {
    sender: mpsc::Sender<RagMessage>,
}

impl RagActorHandle {
    /// Spawns a new `RagActor` over `engine` and returns a handle to it.
    ///
    /// The engine is not built until the first request arrives. Several actors
    /// may share one [`SharedEngine`]; it is still built only once.
    pub fn new(engine: Arc<SharedEngine>) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = RagActorRunner::new(receiver, engine);
        tokio::spawn(async move { actor.run().await });
        Self { sender }
    }

    /// Rebuilds the knowledge base for this actor and drops cached answers.
    ///
    /// Other actors sharing the same [`SharedEngine`] keep their engine.
    pub async fn reload(&self) -> Result<EngineStats, AppError> {
        let (send, recv) = oneshot::channel();
        self.send(RagMessage::Reload { responder: send }).await?;
        recv.await
            .map_err(|_| AppError::Actor(ActorError::Internal("RAG Actor failed to respond".to_string())))?
    }

    /// Index statistics of the engine currently served.
    pub async fn stats(&self) -> Result<EngineStats, AppError> {
        let (send, recv) = oneshot::channel();
        self.send(RagMessage::Stats { responder: send }).await?;
        recv.await
            .map_err(|_| AppError::Actor(ActorError::Internal("RAG Actor failed to respond".to_string())))?
    }

    async fn send(&self, msg: RagMessage) -> Result<(), AppError> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| AppError::Actor(ActorError::Internal("RAG Actor closed".to_string())))
    }
}

#[async_trait]
impl RagService for RagActorHandle {
    async fn answer(
        &self,
        question: String,
        history: Vec<HistoryTurn>,
    ) -> Result<RetrievalResult, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = RagMessage::Answer {
            question,
            history,
            responder: send,
        };
        self.send(msg).await?;
        recv.await
            .map_err(|_| AppError::Actor(ActorError::Internal("RAG Actor failed to respond".to_string())))?
    }
}

// --- Actor Runner (Internal Logic) ---
struct RagActorRunner {
    receiver: mpsc::Receiver<RagMessage>,
    shared: Arc<SharedEngine>,
    engine: Option<Arc<RagEngine>>,
    answer_cache: LruCache<String, RetrievalResult>,
}

impl RagActorRunner {
    const CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(256) {
        Some(size) => size,
        None => panic!("Cache size must be non-zero"),
    };

    fn new(receiver: mpsc::Receiver<RagMessage>, shared: Arc<SharedEngine>) -> Self {
        Self {
            receiver,
            shared,
            engine: None,
            answer_cache: LruCache::new(Self::CACHE_SIZE),
        }
    }

    async fn run(mut self) {
        info!("RagActor started");
        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg);
        }
        info!("RagActor stopped");
    }

    fn handle_message(&mut self, msg: RagMessage) {
        match msg {
            RagMessage::Answer {
                question,
                history,
                responder,
            } => {
                let result = self.answer(&question, &history);
                if responder.send(result).is_err() {
                    warn!("Failed to send answer response (channel closed)");
                }
            }
            RagMessage::Reload { responder } => {
                let result = self.reload();
                if responder.send(result).is_err() {
                    warn!("Failed to send reload response (channel closed)");
                }
            }
            RagMessage::Stats { responder } => {
                let result = self.engine().map(|engine| engine.stats());
                if responder.send(result).is_err() {
                    warn!("Failed to send stats response (channel closed)");
                }
            }
        }
    }

    fn engine(&mut self) -> Result<Arc<RagEngine>, AppError> {
        if let Some(engine) = &self.engine {
            return Ok(Arc::clone(engine));
        }
        let engine = self.shared.get()?;
        self.engine = Some(Arc::clone(&engine));
        Ok(engine)
    }

    fn answer(
        &mut self,
        question: &str,
        history: &[HistoryTurn],
    ) -> Result<RetrievalResult, AppError> {
        let key = question.trim().to_string();
        if let Some(cached) = self.answer_cache.get(&key) {
            debug!("Cache hit for question: '{}'", key);
            return Ok(cached.clone());
        }

        let engine = self.engine()?;
        let result = engine.answer(&key, Some(history));
        self.answer_cache.put(key, result.clone());
        Ok(result)
    }

    fn reload(&mut self) -> Result<EngineStats, AppError> {
        let current = self.engine()?;
        let fresh = Arc::new(current.reload()?);
        let stats = fresh.stats();

        self.engine = Some(fresh);
        self.answer_cache.clear();
        info!(
            "Knowledge base reloaded: {} chunks, {} terms",
            stats.chunks, stats.vocabulary
        );
        Ok(stats)
    }
}
