//! Agent Runtime
//!
//! The context object handlers receive: settings lookup, language-model
//! invocation, memory creation, and explicit action dispatch. Re-entrant
//! dispatch is a direct call through `process_actions`, so control flow
//! between chained actions stays auditable.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::action::{ActionRegistry, HandlerCallback, HandlerOptions, Plugin, State};
use crate::error::{AgentError, Result};
use crate::memory::{InMemoryStore, Memory, MemoryManager};
use crate::message::Message;
use crate::provider::{GenerationOptions, LlmProvider, ModelClass, DEFAULT_MODEL};

/// The agent runtime handlers run against
pub struct AgentRuntime {
    agent_id: Uuid,
    settings: HashMap<String, String>,
    provider: Arc<dyn LlmProvider>,
    memories: Arc<dyn MemoryManager>,
    actions: ActionRegistry,
}

impl AgentRuntime {
    /// Start building a runtime
    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    /// This agent's identifier
    pub fn agent_id(&self) -> Uuid {
        self.agent_id
    }

    /// Look up a setting: runtime-provided values first, process
    /// environment second. Empty values fall through to the environment.
    pub fn setting(&self, key: &str) -> Option<String> {
        self.settings
            .get(key)
            .cloned()
            .filter(|v| !v.is_empty())
            .or_else(|| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    /// Resolve a model class to a concrete model name
    pub fn model_for(&self, class: ModelClass) -> String {
        self.setting(class.setting_key())
            .unwrap_or_else(|| DEFAULT_MODEL.into())
    }

    /// Single-shot text generation against the configured provider.
    ///
    /// The context is sent as one user message; the completion text is
    /// returned trimmed.
    pub async fn generate_text(
        &self,
        context: &str,
        class: ModelClass,
        stop_sequences: &[&str],
    ) -> Result<String> {
        let options = GenerationOptions {
            model: self.model_for(class),
            stop_sequences: stop_sequences.iter().map(ToString::to_string).collect(),
            ..Default::default()
        };

        let completion = self
            .provider
            .complete(&[Message::user(context)], &options)
            .await?;

        Ok(completion.content.trim().to_string())
    }

    /// Persist a new memory record
    pub async fn create_memory(&self, memory: Memory) -> Result<()> {
        self.memories.create_memory(memory).await
    }

    /// The memory store
    pub fn memories(&self) -> &Arc<dyn MemoryManager> {
        &self.memories
    }

    /// The action registry
    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// The LLM provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Dispatch a message to the action named in its content.
    ///
    /// Returns `Ok(false)` when the message carries no action tag or the
    /// action's validation declines it. Handlers may call this again with a
    /// memory they produced; the chain stays a plain call stack.
    pub async fn process_actions(
        &self,
        message: &Memory,
        state: &mut State,
        callback: Option<&HandlerCallback>,
    ) -> Result<bool> {
        let Some(name) = message.content.action.as_deref() else {
            return Ok(false);
        };

        let action = self
            .actions
            .get(name)
            .ok_or_else(|| AgentError::ActionNotFound(name.into()))?;

        if !action.validate(self, message).await? {
            tracing::debug!(action = name, "action declined the message");
            return Ok(false);
        }

        tracing::debug!(action = name, "dispatching action");
        action
            .handle(self, message, state, &HandlerOptions::new(), callback)
            .await
    }
}

/// Builder for `AgentRuntime`
pub struct AgentRuntimeBuilder {
    agent_id: Uuid,
    settings: HashMap<String, String>,
    provider: Option<Arc<dyn LlmProvider>>,
    memories: Option<Arc<dyn MemoryManager>>,
    actions: ActionRegistry,
}

impl Default for AgentRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentRuntimeBuilder {
    pub fn new() -> Self {
        Self {
            agent_id: Uuid::new_v4(),
            settings: HashMap::new(),
            provider: None,
            memories: None,
            actions: ActionRegistry::new(),
        }
    }

    pub fn agent_id(mut self, id: Uuid) -> Self {
        self.agent_id = id;
        self
    }

    pub fn setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn memories(mut self, memories: Arc<dyn MemoryManager>) -> Self {
        self.memories = Some(memories);
        self
    }

    pub fn action(mut self, action: Arc<dyn crate::action::Action>) -> Self {
        self.actions.register(action);
        self
    }

    /// Register every action a plugin contributes
    pub fn plugin(mut self, plugin: Plugin) -> Self {
        tracing::info!(
            plugin = plugin.name,
            actions = plugin.actions.len(),
            "registering plugin"
        );
        for action in plugin.actions {
            self.actions.register(action);
        }
        self
    }

    pub fn build(self) -> Result<AgentRuntime> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(AgentRuntime {
            agent_id: self.agent_id,
            settings: self.settings,
            provider,
            memories: self
                .memories
                .unwrap_or_else(|| Arc::new(InMemoryStore::new())),
            actions: self.actions,
        })
    }
}
