//! Durable memory store boundary
//!
//! The process persists exactly one thing across restarts: the ordered list
//! of memory entries per `(agent_id, user_id)`. Any document database with
//! per-key get/set semantics can back this trait; no partial-write semantics
//! are assumed, so a failed `set_memories` means the write never happened.

use crate::error::FableResult;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Per-(agent, user) document storage for memory logs
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Fetch the memory log for one user, `None` when no log exists yet
    async fn get_memories(
        &self,
        agent_id: &str,
        user_id: &str,
    ) -> FableResult<Option<Vec<String>>>;

    /// Overwrite the memory log for one user
    async fn set_memories(
        &self,
        agent_id: &str,
        user_id: &str,
        entries: &[String],
    ) -> FableResult<()>;
}

/// In-process reference implementation, used for tests and single-node runs
/// where durability across restarts is not required.
#[derive(Default)]
pub struct InMemoryStore {
    logs: RwLock<HashMap<(String, String), Vec<String>>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of (agent, user) logs currently held
    pub fn log_count(&self) -> usize {
        self.logs.read().len()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn get_memories(
        &self,
        agent_id: &str,
        user_id: &str,
    ) -> FableResult<Option<Vec<String>>> {
        let key = (agent_id.to_string(), user_id.to_string());
        Ok(self.logs.read().get(&key).cloned())
    }

    async fn set_memories(
        &self,
        agent_id: &str,
        user_id: &str,
        entries: &[String],
    ) -> FableResult<()> {
        let key = (agent_id.to_string(), user_id.to_string());
        self.logs.write().insert(key, entries.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_log_reads_as_none() {
        let store = InMemoryStore::new();
        assert!(store.get_memories("a", "u").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = InMemoryStore::new();
        store
            .set_memories("a", "u", &["likes tea".to_string()])
            .await
            .unwrap();

        let log = store.get_memories("a", "u").await.unwrap().unwrap();
        assert_eq!(log, vec!["likes tea".to_string()]);
        assert_eq!(store.log_count(), 1);
    }

    #[tokio::test]
    async fn logs_are_scoped_per_agent_and_user() {
        let store = InMemoryStore::new();
        store
            .set_memories("a1", "u", &["one".to_string()])
            .await
            .unwrap();
        store
            .set_memories("a2", "u", &["two".to_string()])
            .await
            .unwrap();

        let log = store.get_memories("a1", "u").await.unwrap().unwrap();
        assert_eq!(log, vec!["one".to_string()]);
    }
}
