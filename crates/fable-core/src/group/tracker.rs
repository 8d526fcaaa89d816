//! Activity map and rolling conversation buffer

use crate::config::TrackerConfig;
use crate::text::truncate_chars;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// At most this many names appear in a channel summary
const SUMMARY_USER_LIMIT: usize = 5;

/// At most this many recent lines appear in a channel summary
const SUMMARY_ENTRY_LIMIT: usize = 6;

/// Characters of each line kept in a channel summary
const SUMMARY_SNIPPET_CHARS: usize = 30;

/// Lines this short carry no topic signal and are skipped in summaries
const SUMMARY_MIN_MESSAGE_CHARS: usize = 10;

/// One user's presence in one channel, for one agent.
///
/// Updated on every message; logically expired (excluded from queries) once
/// its last activity falls outside the query window, but only deleted by an
/// explicit [`GroupContextTracker::cleanup`] sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveUserRecord {
    /// Stable user identifier
    pub user_id: String,
    /// Name shown in prompts
    pub display_name: String,
    /// When this user last spoke in the channel
    pub last_activity: DateTime<Utc>,
    /// Messages seen from this user since process start
    pub message_count: u64,
    /// Bounded snippet of the user's latest message
    pub last_message: String,
}

/// One line in a channel's rolling conversation buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// Who spoke (a user id, or the bot's name for replies)
    pub speaker_id: String,
    /// Display name of the speaker
    pub speaker_name: String,
    /// The message text
    pub message: String,
    /// When the line entered the buffer
    pub timestamp: DateTime<Utc>,
    /// Whether this line is the agent's own reply
    pub is_bot_reply: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ChannelKey {
    agent_id: String,
    channel_id: u64,
}

#[derive(Default)]
struct ChannelState {
    users: HashMap<String, ActiveUserRecord>,
    buffer: VecDeque<ConversationEntry>,
}

impl ChannelState {
    fn push_entry(&mut self, entry: ConversationEntry, capacity: usize) {
        while self.buffer.len() >= capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(entry);
    }
}

/// Tracks per-channel activity and recent conversation for each agent.
///
/// All shared state lives behind this type's methods; the channel map is a
/// [`DashMap`], so operations on different channels never serialize on each
/// other, while mutations within one channel are exclusive.
pub struct GroupContextTracker {
    channels: DashMap<ChannelKey, ChannelState>,
    config: TrackerConfig,
}

impl GroupContextTracker {
    /// Create a tracker with the given limits
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            channels: DashMap::new(),
            config,
        }
    }

    /// Record an inbound user message: upsert the activity record and push a
    /// conversation line (evicting the oldest once the buffer is full).
    pub fn record_user_activity(
        &self,
        agent_id: &str,
        channel_id: u64,
        user_id: &str,
        display_name: &str,
        message: &str,
    ) {
        self.record_user_activity_at(agent_id, channel_id, user_id, display_name, message, Utc::now());
    }

    pub(crate) fn record_user_activity_at(
        &self,
        agent_id: &str,
        channel_id: u64,
        user_id: &str,
        display_name: &str,
        message: &str,
        now: DateTime<Utc>,
    ) {
        let key = ChannelKey {
            agent_id: agent_id.to_string(),
            channel_id,
        };
        let mut state = self.channels.entry(key).or_default();

        {
            let record = state
                .users
                .entry(user_id.to_string())
                .or_insert_with(|| ActiveUserRecord {
                    user_id: user_id.to_string(),
                    display_name: display_name.to_string(),
                    last_activity: now,
                    message_count: 0,
                    last_message: String::new(),
                });
            record.display_name = display_name.to_string();
            record.last_activity = now;
            record.message_count += 1;
            record.last_message = truncate_chars(message, self.config.snippet_chars);
        }

        state.push_entry(
            ConversationEntry {
                speaker_id: user_id.to_string(),
                speaker_name: display_name.to_string(),
                message: message.to_string(),
                timestamp: now,
                is_bot_reply: false,
            },
            self.config.buffer_capacity,
        );
    }

    /// Record the agent's own reply as a conversation line. Does not touch
    /// the activity map.
    pub fn record_bot_reply(&self, agent_id: &str, channel_id: u64, bot_name: &str, reply: &str) {
        self.record_bot_reply_at(agent_id, channel_id, bot_name, reply, Utc::now());
    }

    pub(crate) fn record_bot_reply_at(
        &self,
        agent_id: &str,
        channel_id: u64,
        bot_name: &str,
        reply: &str,
        now: DateTime<Utc>,
    ) {
        let key = ChannelKey {
            agent_id: agent_id.to_string(),
            channel_id,
        };
        let mut state = self.channels.entry(key).or_default();
        state.push_entry(
            ConversationEntry {
                speaker_id: bot_name.to_string(),
                speaker_name: bot_name.to_string(),
                message: reply.to_string(),
                timestamp: now,
                is_bot_reply: true,
            },
            self.config.buffer_capacity,
        );
    }

    /// Users active in the channel within the last `window_minutes`, most
    /// recent first. Pure read: stale records are excluded, not deleted.
    pub fn active_users(
        &self,
        agent_id: &str,
        channel_id: u64,
        window_minutes: u64,
    ) -> Vec<ActiveUserRecord> {
        self.active_users_at(agent_id, channel_id, window_minutes, Utc::now())
    }

    pub(crate) fn active_users_at(
        &self,
        agent_id: &str,
        channel_id: u64,
        window_minutes: u64,
        now: DateTime<Utc>,
    ) -> Vec<ActiveUserRecord> {
        let key = ChannelKey {
            agent_id: agent_id.to_string(),
            channel_id,
        };
        let cutoff = now - Duration::minutes(window_minutes as i64);

        let Some(state) = self.channels.get(&key) else {
            return Vec::new();
        };
        let mut users: Vec<ActiveUserRecord> = state
            .users
            .values()
            .filter(|record| record.last_activity > cutoff)
            .cloned()
            .collect();
        users.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        users
    }

    /// The last `limit` conversation lines, oldest first
    pub fn recent_context(
        &self,
        agent_id: &str,
        channel_id: u64,
        limit: usize,
    ) -> Vec<ConversationEntry> {
        let key = ChannelKey {
            agent_id: agent_id.to_string(),
            channel_id,
        };
        let Some(state) = self.channels.get(&key) else {
            return Vec::new();
        };
        let skip = state.buffer.len().saturating_sub(limit);
        state.buffer.iter().skip(skip).cloned().collect()
    }

    /// A short human-readable description of the channel: who is active and
    /// what was said recently. Composed on the fly, never stored.
    pub fn summary(&self, agent_id: &str, channel_id: u64) -> String {
        self.summary_at(agent_id, channel_id, Utc::now())
    }

    pub(crate) fn summary_at(&self, agent_id: &str, channel_id: u64, now: DateTime<Utc>) -> String {
        let users =
            self.active_users_at(agent_id, channel_id, self.config.activity_window_minutes, now);
        if users.is_empty() {
            return "No active users right now".to_string();
        }

        let names: Vec<&str> = users
            .iter()
            .take(SUMMARY_USER_LIMIT)
            .map(|user| user.display_name.as_str())
            .collect();
        let mut parts = Vec::new();
        if names.len() == 1 {
            parts.push(format!("Currently talking with {}", names[0]));
        } else {
            parts.push(format!("Active users: {}", names.join(", ")));
        }

        let recent = self.recent_context(agent_id, channel_id, SUMMARY_ENTRY_LIMIT);
        let topics: Vec<String> = recent
            .iter()
            .filter(|entry| entry.message.chars().count() > SUMMARY_MIN_MESSAGE_CHARS)
            .map(|entry| {
                let marker = if entry.is_bot_reply { " (bot)" } else { "" };
                format!(
                    "{}{marker}: {}",
                    entry.speaker_name,
                    truncate_chars(&entry.message, SUMMARY_SNIPPET_CHARS)
                )
            })
            .collect();
        if !topics.is_empty() {
            parts.push(format!("Recent conversation: {}", topics.join(" | ")));
        }

        parts.join(" | ")
    }

    /// Delete activity records and conversation lines older than the window
    /// across all of one agent's channels, dropping emptied channels.
    ///
    /// Lazy expiry alone lets the maps grow for the life of the process;
    /// call this periodically from whatever scheduler the host provides.
    pub fn cleanup(&self, agent_id: &str, window_minutes: u64) {
        self.cleanup_at(agent_id, window_minutes, Utc::now());
    }

    pub(crate) fn cleanup_at(&self, agent_id: &str, window_minutes: u64, now: DateTime<Utc>) {
        let cutoff = now - Duration::minutes(window_minutes as i64);
        let mut dropped_channels = 0usize;

        self.channels.retain(|key, state| {
            if key.agent_id != agent_id {
                return true;
            }
            state.users.retain(|_, record| record.last_activity > cutoff);
            state.buffer.retain(|entry| entry.timestamp > cutoff);
            let keep = !(state.users.is_empty() && state.buffer.is_empty());
            if !keep {
                dropped_channels += 1;
            }
            keep
        });

        debug!(agent_id, dropped_channels, "stale group context swept");
    }

    /// Number of channels currently tracked (all agents)
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
