//! Conversation Memory
//!
//! Durable records of conversational turns. Handlers write their output as
//! new memories; the store owns whatever persistence the deployment needs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;

/// Content of a conversational turn.
///
/// `action` tags the memory for dispatch; `extra` carries ad-hoc attachments
/// a handler wants to hand to the next action (e.g. a resolved address list).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Content {
    /// Text of the turn
    pub text: String,

    /// Action this turn triggers or responds to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Originating channel (e.g. "discord", "farcaster")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Custom key-value attachments
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Content {
    /// Create plain text content
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Tag the content with an action name
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Attach a custom key-value pair
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// A single conversational memory record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Memory {
    /// Unique identifier
    pub id: Uuid,

    /// User who owns the conversation turn
    pub user_id: Uuid,

    /// Agent participating in the conversation
    pub agent_id: Uuid,

    /// Conversation/room this turn belongs to
    pub room_id: Uuid,

    /// Turn content
    pub content: Content,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Memory {
    /// Create a new memory record
    pub fn new(user_id: Uuid, agent_id: Uuid, room_id: Uuid, content: Content) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            agent_id,
            room_id,
            content,
            created_at: Utc::now(),
        }
    }

    /// Create a memory in the same conversation as `message`
    pub fn reply_to(message: &Memory, content: Content) -> Self {
        Self::new(message.user_id, message.agent_id, message.room_id, content)
    }
}

/// Store trait for conversation memories
#[async_trait]
pub trait MemoryManager: Send + Sync {
    /// Persist a new memory
    async fn create_memory(&self, memory: Memory) -> Result<()>;

    /// Most recent memories for a room, newest first
    async fn recent(&self, room_id: Uuid, limit: usize) -> Result<Vec<Memory>>;
}

/// In-memory store (for development/testing)
pub struct InMemoryStore {
    memories: RwLock<Vec<Memory>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            memories: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MemoryManager for InMemoryStore {
    async fn create_memory(&self, memory: Memory) -> Result<()> {
        let mut memories = self.memories.write().await;
        memories.push(memory);
        Ok(())
    }

    async fn recent(&self, room_id: Uuid, limit: usize) -> Result<Vec<Memory>> {
        let memories = self.memories.read().await;
        let mut result: Vec<_> = memories
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result.truncate(limit);

        Ok(result)
    }
}
