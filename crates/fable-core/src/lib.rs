//! # Fable Core
//!
//! State management for conversational character agents.
//!
//! A Fable process hosts one or more agents (personas) talking to many users
//! across many channels. Two kinds of state are kept per agent:
//!
//! - **Durable per-user memory** — short summarized facts about each user,
//!   appended after every exchange and consolidated into a single narrative
//!   once the log crosses a threshold. Owned by
//!   [`MemoryLifecycleManager`](memory::MemoryLifecycleManager), persisted
//!   through the [`MemoryStore`](store::MemoryStore) trait, and survives
//!   restarts.
//! - **Transient per-channel context** — who is active in a channel and a
//!   rolling buffer of recent lines. Owned by
//!   [`GroupContextTracker`](group::GroupContextTracker), in-process only.
//!
//! [`ResponseOrchestrator`](orchestrator::ResponseOrchestrator) composes both
//! into a prompt, calls the external text service, and schedules the memory
//! append off the reply path.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fable_core::config::{MemoryConfig, OrchestratorConfig, TrackerConfig};
//! use fable_core::group::GroupContextTracker;
//! use fable_core::memory::MemoryLifecycleManager;
//! use fable_core::orchestrator::{AgentProfile, IncomingMessage, ResponseOrchestrator};
//! use fable_core::store::InMemoryStore;
//! use fable_llm::GeminiClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = Arc::new(GeminiClient::from_env()?);
//! let store = Arc::new(InMemoryStore::new());
//!
//! let memory = Arc::new(MemoryLifecycleManager::new(
//!     store,
//!     service.clone(),
//!     MemoryConfig::default(),
//! ));
//! let tracker = Arc::new(GroupContextTracker::new(TrackerConfig::default()));
//! let orchestrator =
//!     ResponseOrchestrator::new(service, memory, tracker, OrchestratorConfig::default());
//!
//! let profile = AgentProfile::new("shen_ze", "Shen Ze", "A reserved violinist.");
//! let message = IncomingMessage::new(42, "user-1", "Alice", "Do you remember me?");
//! let reply = orchestrator.respond(&profile, &message, None).await;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod group;
pub mod memory;
pub mod orchestrator;
pub mod store;
pub mod tasks;
mod text;

pub use error::{FableError, FableResult};
