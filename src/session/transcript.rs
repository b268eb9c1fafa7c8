//! Append-only chat transcript.
//!
//! A transcript always begins with exactly one system message (the
//! persona) and grows only via [`Transcript::append`]. There are no
//! delete, edit, or reorder operations, and no context-window trimming —
//! readers consume ordered snapshots.

use serde::{Deserialize, Serialize};

// ── Role ─────────────────────────────────────────────────────────────────────

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire string for the chat-completions payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

// ── Message ──────────────────────────────────────────────────────────────────

/// One transcript entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

// ── Transcript ───────────────────────────────────────────────────────────────

/// Ordered message history for one session.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create a transcript seeded with `persona` as its system message.
    pub fn new(persona: impl Into<String>) -> Self {
        Self { messages: vec![Message::system(persona)] }
    }

    /// Append a message to the end of the history. Any role, any content —
    /// empty text is permitted at this layer.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Full ordered copy of the history as of this call. Read-only.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
