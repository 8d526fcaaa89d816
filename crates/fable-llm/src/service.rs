//! The text service trait

use crate::error::LlmResult;
use crate::params::GenerationParams;
use async_trait::async_trait;

/// An opaque summarization/generation service.
///
/// Both operations may take seconds and may fail; neither is ever on a
/// caller's hot path without a timeout or a fallback. A successful call may
/// still return an empty or no-signal string, which callers must treat as
/// "nothing extracted" (see [`crate::is_no_signal`]).
#[async_trait]
pub trait TextService: Send + Sync {
    /// Condense `text` (a conversational turn or an instruction plus a batch
    /// of stored entries) into a short summary.
    async fn summarize(&self, text: &str) -> LlmResult<String>;

    /// Produce a reply for a fully assembled prompt.
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> LlmResult<String>;
}
