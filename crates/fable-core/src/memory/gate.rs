//! Per-key mutual exclusion for memory read-modify-write cycles

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Identifies one memory log: an agent/user pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoryKey {
    /// Agent (persona) half of the key
    pub agent_id: String,
    /// User half of the key
    pub user_id: String,
}

impl MemoryKey {
    /// Build a key from its two halves
    pub fn new(agent_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            user_id: user_id.into(),
        }
    }
}

/// Exclusive sections keyed by [`MemoryKey`].
///
/// The slot map only holds keys with an in-flight (or awaited) section:
/// releasing a guard removes its slot once nobody else holds or waits on it,
/// so the footprint is bounded by concurrent activity, not by the number of
/// users ever seen.
#[derive(Default)]
pub struct ConsolidationGate {
    slots: Mutex<HashMap<MemoryKey, Arc<AsyncMutex<()>>>>,
}

impl ConsolidationGate {
    /// Create an empty gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    ///
    /// Used by the append pipeline, which must not lose entries and therefore
    /// queues behind other writers on the same key.
    pub async fn acquire(&self, key: MemoryKey) -> GateGuard<'_> {
        let slot = self.slot(&key);
        let permit = slot.lock_owned().await;
        GateGuard {
            gate: self,
            key,
            permit: Some(permit),
        }
    }

    /// Claim exclusive access to `key` without waiting.
    ///
    /// `None` means another section is in flight for this key; the caller
    /// skips its own attempt this cycle rather than queuing.
    pub fn try_acquire(&self, key: MemoryKey) -> Option<GateGuard<'_>> {
        let slot = self.slot(&key);
        match slot.try_lock_owned() {
            Ok(permit) => Some(GateGuard {
                gate: self,
                key,
                permit: Some(permit),
            }),
            Err(_) => None,
        }
    }

    /// Number of keys with an in-flight section
    pub fn in_flight(&self) -> usize {
        self.slots.lock().len()
    }

    fn slot(&self, key: &MemoryKey) -> Arc<AsyncMutex<()>> {
        self.slots
            .lock()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    fn release(&self, key: &MemoryKey) {
        let mut slots = self.slots.lock();
        // Holders and waiters each own an Arc clone; a count of one means the
        // map reference is the last one and the slot can go.
        if let Some(slot) = slots.get(key) {
            if Arc::strong_count(slot) == 1 {
                slots.remove(key);
            }
        }
    }
}

/// Exclusive access to one key; released on drop
pub struct GateGuard<'a> {
    gate: &'a ConsolidationGate,
    key: MemoryKey,
    permit: Option<OwnedMutexGuard<()>>,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        // Release the lock before deciding whether the slot is still needed.
        self.permit.take();
        self.gate.release(&self.key);
    }
}
