//! Actor System Tests
//!
//! RAG actor behavior (cache, reload, shared initialization) and the chat
//! supervisor driven by both the real actor and mock services.

use super::{kb_file, SAMPLE_KB};
use crate::actors::messages::{ActorError, AppError};
use crate::actors::rag::RagActorHandle;
use crate::actors::supervisor::{ChatSupervisor, EMPTY_REQUEST_MESSAGE, FAILED_REQUEST_MESSAGE};
use crate::actors::traits::RagService;
use crate::config::RagConfig;
use crate::models::{ChatRequest, HistoryTurn, Role};
use crate::rag::{RetrievalResult, SharedEngine};
use async_trait::async_trait;
use futures::future::join_all;
use std::fs;
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration};

// ============================================================================
// Mock Services for Testing
// ============================================================================

/// Mock RAG service that echoes the question and records every call
pub struct MockRagService {
    pub delay_ms: u64,
    pub should_fail: bool,
    pub calls: Mutex<Vec<String>>,
}

impl MockRagService {
    pub fn new() -> Self {
        Self {
            delay_ms: 0,
            should_fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RagService for MockRagService {
    async fn answer(
        &self,
        question: String,
        _history: Vec<HistoryTurn>,
    ) -> Result<RetrievalResult, AppError> {
        self.calls.lock().unwrap().push(question.clone());
        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }

        if self.should_fail {
            Err(AppError::Actor(ActorError::RagError("Mock failure".to_string())))
        } else {
            Ok(RetrievalResult {
                reply: format!("echo: {}", question),
                contexts: vec!["mock context".to_string()],
            })
        }
    }
}

fn shared(path: &std::path::Path) -> Arc<SharedEngine> {
    Arc::new(SharedEngine::new(RagConfig::new(path)))
}

// ============================================================================
// RAG Actor Tests
// ============================================================================

#[cfg(test)]
mod rag_actor_tests {
    use super::*;

    #[tokio::test]
    async fn test_answer_matches_engine() {
        let file = kb_file(SAMPLE_KB);
        let engine = shared(file.path());
        let actor = RagActorHandle::new(Arc::clone(&engine));

        let question = "ada sampah numpuk di muara, gimana?";
        let via_actor = actor.answer(question.to_string(), Vec::new()).await.unwrap();
        let direct = engine.get().unwrap().answer(question, None);
        assert_eq!(via_actor, direct);
    }

    #[tokio::test]
    async fn test_cached_answer_is_identical() {
        let file = kb_file(SAMPLE_KB);
        let actor = RagActorHandle::new(shared(file.path()));

        let first = actor.answer("kenapa plastik bahaya".to_string(), Vec::new()).await.unwrap();
        let second = actor
            .answer("  kenapa plastik bahaya  ".to_string(), Vec::new())
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_first_use_across_actors() {
        let file = kb_file(SAMPLE_KB);
        let engine = shared(file.path());
        let actors: Vec<_> = (0..4).map(|_| RagActorHandle::new(Arc::clone(&engine))).collect();

        let results = join_all(
            actors
                .iter()
                .map(|a| a.answer("wisata pantai".to_string(), Vec::new())),
        )
        .await;

        assert_eq!(engine.build_count(), 1);
        let first = results[0].as_ref().unwrap();
        for result in &results {
            assert_eq!(result.as_ref().unwrap(), first);
        }
    }

    #[tokio::test]
    async fn test_missing_knowledge_base_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let actor = RagActorHandle::new(shared(&dir.path().join("kb.txt")));

        let err = actor.answer("halo".to_string(), Vec::new()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);
        assert!(actor.stats().await.is_err());
    }

    #[tokio::test]
    async fn test_reload_picks_up_changes_and_clears_cache() {
        let file = kb_file("Mangrove menahan abrasi dan menjadi rumah bagi banyak biota laut.");
        let actor = RagActorHandle::new(shared(file.path()));

        let before = actor.stats().await.unwrap();
        assert_eq!(before.chunks, 1);
        let stale = actor.answer("terumbu karang".to_string(), Vec::new()).await.unwrap();
        assert!(stale.contexts.is_empty());

        fs::write(file.path(), SAMPLE_KB.replace("rob.", "rob dan merusak terumbu karang.")).unwrap();
        let after = actor.reload().await.unwrap();
        assert!(after.chunks > before.chunks);

        let fresh = actor.answer("terumbu karang".to_string(), Vec::new()).await.unwrap();
        assert!(!fresh.contexts.is_empty());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_current_engine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.txt");
        fs::write(&path, SAMPLE_KB).unwrap();
        let actor = RagActorHandle::new(shared(&path));

        let stats = actor.stats().await.unwrap();
        fs::remove_file(&path).unwrap();

        assert!(matches!(actor.reload().await, Err(AppError::NotFound(_))));
        assert_eq!(actor.stats().await.unwrap(), stats);
        let result = actor.answer("sampah di muara".to_string(), Vec::new()).await.unwrap();
        assert!(!result.contexts.is_empty());
    }
}

// ============================================================================
// Supervisor Tests
// ============================================================================

#[cfg(test)]
mod supervisor_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_request_is_rejected() {
        let service = Arc::new(MockRagService::new());
        let supervisor = ChatSupervisor::new(Arc::clone(&service));

        let failure = supervisor.handle(ChatRequest::new("   ")).await.unwrap_err();
        assert!(failure.is_rejected());
        assert_eq!(failure.message, EMPTY_REQUEST_MESSAGE);
        assert!(failure.detail.is_none());
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_message_with_history_is_forwarded() {
        let service = Arc::new(MockRagService::new());
        let supervisor = ChatSupervisor::new(Arc::clone(&service));

        let request =
            ChatRequest::new("").with_history(vec![HistoryTurn::new(Role::User, "halo")]);
        assert!(supervisor.handle(request).await.is_ok());
        assert_eq!(service.calls(), vec![String::new()]);
    }

    #[tokio::test]
    async fn test_message_is_trimmed() {
        let service = Arc::new(MockRagService::new());
        let supervisor = ChatSupervisor::new(Arc::clone(&service));

        let response = supervisor.handle(ChatRequest::new("  halo \n")).await.unwrap();
        assert_eq!(response.reply, "echo: halo");
        assert_eq!(response.contexts, vec!["mock context".to_string()]);
    }

    #[tokio::test]
    async fn test_service_error_is_wrapped() {
        let supervisor = ChatSupervisor::new(Arc::new(MockRagService::failing()));

        let failure = supervisor.handle(ChatRequest::new("halo")).await.unwrap_err();
        assert!(!failure.is_rejected());
        assert_eq!(failure.message, FAILED_REQUEST_MESSAGE);
        assert!(failure.detail.unwrap().contains("Mock failure"));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let supervisor = ChatSupervisor::new(Arc::new(MockRagService::new().with_delay(500)))
            .with_timeout(Duration::from_millis(20));

        let failure = supervisor.handle(ChatRequest::new("halo")).await.unwrap_err();
        assert_eq!(failure.message, FAILED_REQUEST_MESSAGE);
        assert!(failure.detail.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_malformed_history_from_json() {
        let service = Arc::new(MockRagService::new());
        let supervisor = ChatSupervisor::new(Arc::clone(&service));

        let request: ChatRequest = serde_json::from_value(serde_json::json!({
            "message": "halo",
            "history": "bukan daftar"
        }))
        .unwrap();
        assert!(request.history.is_empty());
        assert!(supervisor.handle(request).await.is_ok());
    }

    #[tokio::test]
    async fn test_supervisor_over_real_actor() {
        let file = kb_file(SAMPLE_KB);
        let actor = RagActorHandle::new(shared(file.path()));
        let supervisor = ChatSupervisor::new(Arc::new(actor));

        let response = supervisor
            .handle(ChatRequest::new("pantai PAI kotor banget"))
            .await
            .unwrap();
        assert!(response.reply.contains("Pantai Alam Indah (PAI)"));
        assert!(!response.contexts.is_empty());
    }

    #[tokio::test]
    async fn test_failure_serializes_without_kind() {
        let supervisor = ChatSupervisor::new(Arc::new(MockRagService::failing()));
        let failure = supervisor.handle(ChatRequest::new("halo")).await.unwrap_err();

        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["message"], FAILED_REQUEST_MESSAGE);
        assert!(json.get("kind").is_none());
        assert!(json["detail"].as_str().unwrap().contains("Mock failure"));
    }
}
