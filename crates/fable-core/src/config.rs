//! Configuration for the core subsystems
//!
//! All limits live here as plain data with builder-style setters; the
//! components receive a config at construction and never consult global
//! state. Thresholds are fixed for the lifetime of the process — a log
//! persisted under a larger threshold is consolidated lazily on its next
//! append rather than eagerly on load.

use fable_llm::GenerationParams;
use std::time::Duration;

/// Settings for [`crate::memory::MemoryLifecycleManager`]
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Entry count above which a log is consolidated into one narrative
    pub consolidation_threshold: usize,

    /// Default number of entries returned by reads
    pub read_limit: usize,

    /// Hard character cap on a consolidated narrative
    pub consolidation_max_chars: usize,

    /// Characters of raw text kept in fallback entries
    pub fallback_snippet_chars: usize,
}

impl MemoryConfig {
    /// Set the consolidation threshold
    pub fn with_consolidation_threshold(mut self, threshold: usize) -> Self {
        self.consolidation_threshold = threshold;
        self
    }

    /// Set the default read limit
    pub fn with_read_limit(mut self, limit: usize) -> Self {
        self.read_limit = limit;
        self
    }

    /// Set the consolidated-narrative character cap
    pub fn with_consolidation_max_chars(mut self, max_chars: usize) -> Self {
        self.consolidation_max_chars = max_chars;
        self
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            consolidation_threshold: 15,
            read_limit: 25,
            consolidation_max_chars: 300,
            fallback_snippet_chars: 30,
        }
    }
}

/// Settings for [`crate::group::GroupContextTracker`]
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Rolling conversation buffer capacity per channel (FIFO eviction)
    pub buffer_capacity: usize,

    /// Default activity window, in minutes, for "who is active" queries
    pub activity_window_minutes: u64,

    /// Characters of a user's last message kept on their activity record
    pub snippet_chars: usize,
}

impl TrackerConfig {
    /// Set the per-channel buffer capacity
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set the default activity window
    pub fn with_activity_window_minutes(mut self, minutes: u64) -> Self {
        self.activity_window_minutes = minutes;
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 30,
            activity_window_minutes: 30,
            snippet_chars: 100,
        }
    }
}

/// Settings for [`crate::orchestrator::ResponseOrchestrator`]
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Overall timeout on the reply-path generation call
    pub generation_timeout: Duration,

    /// How many memory entries go into a prompt
    pub memory_read_limit: usize,

    /// How many recent conversation lines go into a prompt
    pub recent_context_limit: usize,

    /// In-character reply used whenever generation fails or times out
    pub apology: String,

    /// Bottom layer of the generation parameter precedence chain
    pub default_params: GenerationParams,
}

impl OrchestratorConfig {
    /// Set the generation timeout
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Set the apology reply
    pub fn with_apology(mut self, apology: impl Into<String>) -> Self {
        self.apology = apology.into();
        self
    }

    /// Set the default generation parameters
    pub fn with_default_params(mut self, params: GenerationParams) -> Self {
        self.default_params = params;
        self
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(30),
            memory_read_limit: 25,
            recent_context_limit: 8,
            apology: "「抱歉，我現在有點累……」".to_string(),
            default_params: GenerationParams::hard_defaults(),
        }
    }
}
