//! # Per-user durable memory
//!
//! One memory log per `(agent_id, user_id)`: an ordered list of short
//! summarized facts, appended after every exchange and collapsed into a
//! single narrative once it crosses the consolidation threshold.
//!
//! The store interaction is a read-modify-write on a whole document, so two
//! unguarded appends racing on the same key would silently drop one side's
//! entry. [`ConsolidationGate`] serializes that critical section per key;
//! [`MemoryLifecycleManager`] owns the append → threshold-check →
//! consolidate → persist pipeline.

mod gate;
mod lifecycle;

pub use gate::{ConsolidationGate, GateGuard, MemoryKey};
pub use lifecycle::MemoryLifecycleManager;
