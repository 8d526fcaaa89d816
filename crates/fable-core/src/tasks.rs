//! Detached background work
//!
//! Memory appends run after the reply has already been sent; their failure
//! or delay must never reach the user. This module makes that fire-and-forget
//! contract explicit: one detached tokio task per unit of work, failures
//! logged and dropped.

use crate::error::FableResult;
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::warn;

/// Spawn a named detached task whose error is logged instead of propagated.
///
/// The returned handle is for tests and shutdown sequencing; dropping it does
/// not cancel the task.
pub fn spawn_logged<F>(task: &'static str, fut: F) -> JoinHandle<()>
where
    F: Future<Output = FableResult<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(error) = fut.await {
            warn!(task, %error, "background task failed");
        }
    })
}
