//! Action System
//!
//! Actions are named request handlers triggered by intent-matched natural
//! language. Each action carries a trigger description, example dialogues,
//! a validation predicate, and the handler itself.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::memory::{Content, Memory};
use crate::runtime::AgentRuntime;

/// One turn of an example dialogue used for intent matching
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionExample {
    /// Speaker placeholder (e.g. "{{user1}}")
    pub user: String,

    /// Turn content
    pub content: Content,
}

impl ActionExample {
    /// A user turn with plain text
    pub fn user_turn(text: impl Into<String>) -> Self {
        Self {
            user: "{{user1}}".into(),
            content: Content::text(text),
        }
    }

    /// The agent turn that triggers `action`
    pub fn agent_turn(action: impl Into<String>) -> Self {
        Self {
            user: "{{user2}}".into(),
            content: Content::text("").with_action(action),
        }
    }
}

/// Invocation options passed through to a handler
pub type HandlerOptions = HashMap<String, serde_json::Value>;

/// Optional result sink, invoked at most once per handler call
pub type HandlerCallback = dyn Fn(&Content) + Send + Sync;

/// Request-scoped conversation state threaded through dispatch
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Scratch values shared between handlers in one dispatch chain
    pub data: HashMap<String, serde_json::Value>,
}

/// Action trait - implement to add new capabilities
#[async_trait]
pub trait Action: Send + Sync {
    /// Unique action name (e.g. "ZAPPER_PORTFOLIO")
    fn name(&self) -> &'static str;

    /// Natural-language trigger description
    fn description(&self) -> &'static str;

    /// Alternative names this action answers to
    fn similes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Example dialogue pairs for intent matching
    fn examples(&self) -> Vec<Vec<ActionExample>> {
        Vec::new()
    }

    /// Precondition gating (optional)
    async fn validate(&self, _runtime: &AgentRuntime, _message: &Memory) -> Result<bool> {
        Ok(true)
    }

    /// Handle the message
    async fn handle(
        &self,
        runtime: &AgentRuntime,
        message: &Memory,
        state: &mut State,
        options: &HandlerOptions,
        callback: Option<&HandlerCallback>,
    ) -> Result<bool>;
}

/// Registry for available actions
#[derive(Default)]
pub struct ActionRegistry {
    actions: Vec<Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Register a new action
    pub fn register(&mut self, action: Arc<dyn Action>) {
        self.actions.push(action);
    }

    /// Resolve an action by exact name, then by simile
    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions
            .iter()
            .find(|a| a.name() == name)
            .or_else(|| {
                self.actions
                    .iter()
                    .find(|a| a.similes().iter().any(|s| *s == name))
            })
            .cloned()
    }

    /// Registered action names
    pub fn names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// A named bundle of actions contributed by one integration
pub struct Plugin {
    /// Plugin name
    pub name: &'static str,

    /// What the plugin provides
    pub description: &'static str,

    /// Actions to register
    pub actions: Vec<Arc<dyn Action>>,
}
