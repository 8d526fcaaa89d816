//! # Per-channel group conversation context
//!
//! Transient, in-process state about what is happening in each channel an
//! agent can see: who has spoken recently and a rolling buffer of the last
//! few lines. Lost on restart; the durable per-user memory lives
//! in [`crate::memory`] and shares neither storage nor locking with this
//! module.

mod tracker;

pub use tracker::{ActiveUserRecord, ConversationEntry, GroupContextTracker};
