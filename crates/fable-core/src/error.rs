//! Core error taxonomy
//!
//! Every variant here is recoverable: the affected conversational turn
//! degrades (fallback text, empty read, skipped consolidation) and the
//! process keeps running. Nothing in this crate escalates one of these into
//! a panic or an unhandled error at a component boundary.

use thiserror::Error;

/// Result alias used throughout `fable-core`
pub type FableResult<T> = Result<T, FableError>;

/// Errors produced by the memory and orchestration subsystems
#[derive(Debug, Error)]
pub enum FableError {
    /// Turn summarization failed; the caller substitutes a truncated
    /// fallback entry.
    #[error("summarization failed: {reason}")]
    Summarization {
        /// What the text service reported
        reason: String,
    },

    /// Consolidation failed; existing entries are retained (possibly over
    /// the threshold) and the next append retries.
    #[error("consolidation failed for {agent_id}/{user_id}: {reason}")]
    Consolidation {
        /// Agent whose memory log was being consolidated
        agent_id: String,
        /// User the log belongs to
        user_id: String,
        /// What the text service reported
        reason: String,
    },

    /// The durable store could not be reached. Reads degrade to empty;
    /// a failed write surfaces this error, since it means a lost memory.
    #[error("memory store unavailable during {operation}: {reason}")]
    StoreUnavailable {
        /// The store call that failed (`get_memories`, `set_memories`)
        operation: String,
        /// Underlying failure description
        reason: String,
    },

    /// Reply generation failed; the orchestrator substitutes the apology
    /// string.
    #[error("generation failed: {reason}")]
    Generation {
        /// What the text service reported
        reason: String,
    },

    /// Another consolidation is in flight for this key. Expected and benign:
    /// the caller skips its own attempt this cycle.
    #[error("consolidation already in progress for {agent_id}/{user_id}")]
    LockContention {
        /// Agent half of the contended key
        agent_id: String,
        /// User half of the contended key
        user_id: String,
    },
}

impl FableError {
    /// Build a [`FableError::StoreUnavailable`] for a failed store call
    pub fn store_unavailable(operation: &str, reason: impl ToString) -> Self {
        Self::StoreUnavailable {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }
}
