//! Reply-path composition
//!
//! The orchestrator is the only place where the memory manager, the group
//! tracker, and the text service meet. Its one entry point,
//! [`ResponseOrchestrator::respond`], always returns a sendable string: any
//! failure on the generation path collapses into the configured in-character
//! apology rather than an error the caller has to translate.

use crate::config::OrchestratorConfig;
use crate::error::FableError;
use crate::group::GroupContextTracker;
use crate::memory::MemoryLifecycleManager;
use crate::tasks::spawn_logged;
use fable_llm::{GenerationParams, TextService};
use std::sync::Arc;
use tracing::{debug, warn};

/// A character the process speaks as
#[derive(Debug, Clone)]
pub struct AgentProfile {
    /// Stable identifier, used as the memory partition key
    pub agent_id: String,
    /// Name the character speaks as
    pub name: String,
    /// Persona description injected at the top of every prompt
    pub persona: String,
    /// Per-agent generation overrides, layered over the config defaults
    pub params: Option<GenerationParams>,
}

impl AgentProfile {
    pub fn new(
        agent_id: impl Into<String>,
        name: impl Into<String>,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            name: name.into(),
            persona: persona.into(),
            params: None,
        }
    }

    /// Layer per-agent generation parameters over the config defaults
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = Some(params);
        self
    }
}

/// One inbound user message
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub channel_id: u64,
    pub user_id: String,
    pub display_name: String,
    pub text: String,
}

impl IncomingMessage {
    pub fn new(
        channel_id: u64,
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            channel_id,
            user_id: user_id.into(),
            display_name: display_name.into(),
            text: text.into(),
        }
    }
}

/// Assembles prompts and produces replies.
///
/// Per message: record the speaker in the group tracker, gather memory and
/// channel context, generate under a timeout, then hand the finished
/// exchange to the memory manager on a background task so persistence and
/// summarization never delay the reply.
pub struct ResponseOrchestrator {
    service: Arc<dyn TextService>,
    memory: Arc<MemoryLifecycleManager>,
    tracker: Arc<GroupContextTracker>,
    config: OrchestratorConfig,
}

impl ResponseOrchestrator {
    pub fn new(
        service: Arc<dyn TextService>,
        memory: Arc<MemoryLifecycleManager>,
        tracker: Arc<GroupContextTracker>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            service,
            memory,
            tracker,
            config,
        }
    }

    /// Produce a reply to `message` as `profile`. Infallible by design:
    /// generation errors and timeouts both yield the configured apology.
    ///
    /// Generation parameter precedence, strongest first: `override_params`,
    /// then the profile's params, then the config defaults.
    pub async fn respond(
        &self,
        profile: &AgentProfile,
        message: &IncomingMessage,
        override_params: Option<&GenerationParams>,
    ) -> String {
        self.tracker.record_user_activity(
            &profile.agent_id,
            message.channel_id,
            &message.user_id,
            &message.display_name,
            &message.text,
        );

        let prompt = self.build_prompt(profile, message).await;

        let mut params = self.config.default_params.clone();
        if let Some(agent_params) = &profile.params {
            params = params.overlaid(agent_params);
        }
        if let Some(call_params) = override_params {
            params = params.overlaid(call_params);
        }

        let generated = tokio::time::timeout(
            self.config.generation_timeout,
            self.service.generate(&prompt, &params),
        )
        .await;

        let reply = match generated {
            Ok(Ok(text)) => text,
            Ok(Err(error)) => {
                let error = FableError::Generation {
                    reason: error.to_string(),
                };
                warn!(
                    agent_id = %profile.agent_id,
                    channel_id = message.channel_id,
                    %error,
                    "replying with apology"
                );
                self.config.apology.clone()
            }
            Err(_) => {
                let error = FableError::Generation {
                    reason: format!(
                        "timed out after {}s",
                        self.config.generation_timeout.as_secs()
                    ),
                };
                warn!(
                    agent_id = %profile.agent_id,
                    channel_id = message.channel_id,
                    %error,
                    "replying with apology"
                );
                self.config.apology.clone()
            }
        };

        self.tracker
            .record_bot_reply(&profile.agent_id, message.channel_id, &profile.name, &reply);

        // Only a real exchange is worth remembering; apology turns carry
        // no information about the user.
        if reply != self.config.apology {
            self.schedule_memory_append(profile, message, &reply);
        }

        reply
    }

    async fn build_prompt(&self, profile: &AgentProfile, message: &IncomingMessage) -> String {
        let memories = self
            .memory
            .read(&profile.agent_id, &message.user_id, self.config.memory_read_limit)
            .await;
        let group_summary = self.tracker.summary(&profile.agent_id, message.channel_id);
        let recent = self.tracker.recent_context(
            &profile.agent_id,
            message.channel_id,
            self.config.recent_context_limit,
        );

        let mut prompt = String::new();
        prompt.push_str(&format!("You are {}. {}\n", profile.name, profile.persona));

        if !memories.is_empty() {
            prompt.push_str(&format!(
                "\nWhat you remember about {}:\n",
                message.display_name
            ));
            for entry in &memories {
                prompt.push_str(&format!("- {entry}\n"));
            }
        }

        prompt.push_str(&format!("\nChannel situation: {group_summary}\n"));

        if !recent.is_empty() {
            prompt.push_str("\nRecent conversation:\n");
            for entry in &recent {
                prompt.push_str(&format!("{}: {}\n", entry.speaker_name, entry.message));
            }
        }

        prompt.push_str(&format!(
            "\n{} says: {}\nReply in character, in the language they used.",
            message.display_name, message.text
        ));

        debug!(
            agent_id = %profile.agent_id,
            channel_id = message.channel_id,
            memories = memories.len(),
            context_lines = recent.len(),
            prompt_chars = prompt.chars().count(),
            "prompt assembled"
        );
        prompt
    }

    /// Summarize and persist the exchange off the reply path. Failures are
    /// logged by the task wrapper; the reply has already been sent.
    fn schedule_memory_append(
        &self,
        profile: &AgentProfile,
        message: &IncomingMessage,
        reply: &str,
    ) {
        let memory = Arc::clone(&self.memory);
        let agent_id = profile.agent_id.clone();
        let user_id = message.user_id.clone();
        let display_name = message.display_name.clone();
        let exchange = format!(
            "{}: {}\n{}: {}",
            message.display_name, message.text, profile.name, reply
        );

        spawn_logged("memory-append", async move {
            memory.append(&agent_id, &user_id, &exchange, &display_name).await
        });
    }
}
