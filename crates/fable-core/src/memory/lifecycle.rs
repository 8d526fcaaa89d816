//! Memory lifecycle: append, consolidate, read back

use crate::config::MemoryConfig;
use crate::error::{FableError, FableResult};
use crate::memory::gate::{ConsolidationGate, MemoryKey};
use crate::store::MemoryStore;
use crate::text::truncate_chars;
use fable_llm::{is_no_signal, TextService};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Instruction wrapped around a conversational turn before summarization.
/// Single fact per line; "None." when nothing is worth keeping.
const TURN_SUMMARY_INSTRUCTION: &str = "You are a memory extraction assistant. \
From the conversation below, identify information about the user worth remembering \
long-term: personal preferences, hobbies or interests, significant life events, \
emotional state or personality traits, and relationships with other users. \
List each point as one concise sentence, one per line, without numbering or \
formatting symbols. If there is no important information worth remembering, \
reply with \"None.\".";

/// Owns the append → threshold-check → consolidate → persist pipeline for
/// per-user memory logs.
///
/// The text service is treated as unreliable: summarizer failures fall
/// back to snippet entries and consolidation failures keep the log as-is.
/// Reads degrade to empty when the store is unreachable; only appends
/// surface a store error, since a failed write means a lost memory.
pub struct MemoryLifecycleManager {
    store: Arc<dyn MemoryStore>,
    service: Arc<dyn TextService>,
    gate: ConsolidationGate,
    config: MemoryConfig,
}

impl MemoryLifecycleManager {
    /// Create a manager over a store and a text service
    pub fn new(
        store: Arc<dyn MemoryStore>,
        service: Arc<dyn TextService>,
        config: MemoryConfig,
    ) -> Self {
        Self {
            store,
            service,
            gate: ConsolidationGate::new(),
            config,
        }
    }

    /// Summarize one conversational turn and append it to the user's log,
    /// consolidating first when the log has outgrown the threshold.
    ///
    /// The summarization call runs before the critical section; the
    /// load → append → consolidate → persist sequence runs under the
    /// per-key gate so concurrent appends on the same key cannot lose
    /// entries to a read-modify-write race.
    pub async fn append(
        &self,
        agent_id: &str,
        user_id: &str,
        raw_text: &str,
        display_name: &str,
    ) -> FableResult<()> {
        let entry = self.summarize_turn(raw_text, display_name).await;

        let _guard = self.gate.acquire(MemoryKey::new(agent_id, user_id)).await;

        let mut entries = self
            .store
            .get_memories(agent_id, user_id)
            .await?
            .unwrap_or_default();
        entries.push(entry);

        if entries.len() > self.config.consolidation_threshold {
            match self.merge_entries(&entries, agent_id, user_id, display_name).await {
                Ok(merged) => {
                    info!(
                        agent_id,
                        user_id,
                        collapsed = entries.len(),
                        "memory log consolidated"
                    );
                    entries = vec![merged];
                }
                Err(error) => {
                    // Entries are kept (over the threshold for now); the
                    // next append re-checks and retries.
                    warn!(agent_id, user_id, %error, "consolidation failed; keeping entries");
                }
            }
        }

        self.store.set_memories(agent_id, user_id, &entries).await?;

        debug!(agent_id, user_id, total = entries.len(), "memory appended");
        Ok(())
    }

    /// The most recent `limit` entries, in chronological order.
    ///
    /// Memory is an enhancement, not a requirement: a missing log or an
    /// unreachable store reads as empty, never as an error.
    pub async fn read(&self, agent_id: &str, user_id: &str, limit: usize) -> Vec<String> {
        match self.store.get_memories(agent_id, user_id).await {
            Ok(Some(entries)) => {
                let skip = entries.len().saturating_sub(limit);
                entries[skip..].to_vec()
            }
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(agent_id, user_id, %error, "memory read degraded to empty");
                Vec::new()
            }
        }
    }

    /// Consolidate an over-threshold log now, without waiting for the next
    /// append.
    ///
    /// Skips (with [`FableError::LockContention`]) when another section is
    /// in flight for this key — a future append re-checks the threshold
    /// anyway, so there is no point queuing.
    pub async fn consolidate_now(
        &self,
        agent_id: &str,
        user_id: &str,
        display_name: &str,
    ) -> FableResult<()> {
        let Some(_guard) = self.gate.try_acquire(MemoryKey::new(agent_id, user_id)) else {
            return Err(FableError::LockContention {
                agent_id: agent_id.to_string(),
                user_id: user_id.to_string(),
            });
        };

        let entries = self
            .store
            .get_memories(agent_id, user_id)
            .await?
            .unwrap_or_default();
        if entries.len() <= self.config.consolidation_threshold {
            return Ok(());
        }

        let merged = self
            .merge_entries(&entries, agent_id, user_id, display_name)
            .await?;
        self.store.set_memories(agent_id, user_id, &[merged]).await
    }

    /// Summarize a single turn, substituting a deterministic fallback entry
    /// when the service fails or finds nothing worth keeping. Never returns
    /// an empty or no-signal string.
    async fn summarize_turn(&self, raw_text: &str, display_name: &str) -> String {
        let prompt = format!("{TURN_SUMMARY_INSTRUCTION}\n\nConversation:\n{display_name}: {raw_text}");

        match self.service.summarize(&prompt).await {
            Ok(summary) if !is_no_signal(&summary) => summary.trim().to_string(),
            Ok(_) => {
                debug!(display_name, "summarizer found no signal; storing fallback entry");
                self.fallback_entry(raw_text, display_name)
            }
            Err(error) => {
                let error = FableError::Summarization {
                    reason: error.to_string(),
                };
                warn!(display_name, %error, "storing fallback entry");
                self.fallback_entry(raw_text, display_name)
            }
        }
    }

    fn fallback_entry(&self, raw_text: &str, display_name: &str) -> String {
        format!(
            "{display_name} had a conversational exchange: {}",
            truncate_chars(raw_text, self.config.fallback_snippet_chars)
        )
    }

    /// Merge a full entry list into one bounded narrative.
    ///
    /// No-signal entries are dropped first; when nothing remains the merge
    /// short-circuits to a generic narrative without a service call.
    async fn merge_entries(
        &self,
        entries: &[String],
        agent_id: &str,
        user_id: &str,
        display_name: &str,
    ) -> FableResult<String> {
        let kept: Vec<&str> = entries
            .iter()
            .map(String::as_str)
            .filter(|entry| !is_no_signal(entry))
            .collect();
        if kept.is_empty() {
            return Ok(format!("Has had repeated conversations with {display_name}."));
        }

        let prompt = format!(
            "Merge the existing memories below into a single narrative of at most {max} \
             characters. Preserve personal traits, significant events, and relationships. \
             Reply with the narrative only.\n\nExisting memories about {display_name}:\n{body}",
            max = self.config.consolidation_max_chars,
            body = kept.join("\n"),
        );

        let merged = self
            .service
            .summarize(&prompt)
            .await
            .map_err(|error| FableError::Consolidation {
                agent_id: agent_id.to_string(),
                user_id: user_id.to_string(),
                reason: error.to_string(),
            })?;

        let merged = merged.trim();
        if is_no_signal(merged) {
            return Err(FableError::Consolidation {
                agent_id: agent_id.to_string(),
                user_id: user_id.to_string(),
                reason: "merge produced no-signal output".to_string(),
            });
        }

        Ok(truncate_chars(merged, self.config.consolidation_max_chars))
    }
}
