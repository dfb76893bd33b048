//! Actor layer between the host and the engine.
//!
//! - `rag`: owns an engine handle and an answer cache, serves requests in order
//! - `supervisor`: validates host requests and maps failures
//! - `messages`: message and error types exchanged over channels
//! - `traits`: the [`RagService`](traits::RagService) seam used by the supervisor

pub mod messages;
pub mod rag;
pub mod supervisor;
pub mod traits;

pub use messages::{ActorError, RagMessage};
pub use rag::RagActorHandle;
pub use supervisor::{ChatSupervisor, EMPTY_REQUEST_MESSAGE, FAILED_REQUEST_MESSAGE};
pub use traits::RagService;
