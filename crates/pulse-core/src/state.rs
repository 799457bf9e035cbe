//! UI-agnostic conversation state
//!
//! The transcript is the model behind the chat view: an append-only list of
//! entries owned by the controller. Renderers only ever project it.

use serde::{Deserialize, Serialize};

/// A chat message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            is_error: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            is_error: false,
        }
    }

    /// An assistant message rendered with error styling
    pub fn assistant_error(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            is_error: true,
        }
    }
}

/// Handle to a transcript entry, used to remove transient entries by reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BubbleId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Message(ChatMessage),
    /// Placeholder shown while a reply is pending; carries no text
    Typing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: BubbleId,
    pub kind: EntryKind,
}

/// Ordered conversation transcript plus the welcome placeholder flag
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_id: u64,
    welcome: bool,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// A fresh transcript shows the welcome placeholder and nothing else
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            welcome: true,
        }
    }

    pub fn shows_welcome(&self) -> bool {
        self.welcome
    }

    /// Hide the welcome placeholder. No-op when it is already gone.
    pub fn dismiss_welcome(&mut self) {
        self.welcome = false;
    }

    pub fn push(&mut self, message: ChatMessage) -> BubbleId {
        self.append(EntryKind::Message(message))
    }

    pub fn push_typing(&mut self) -> BubbleId {
        self.append(EntryKind::Typing)
    }

    /// Remove an entry by id. Returns false when the entry no longer exists
    /// (for instance after a clear).
    pub fn remove(&mut self, id: BubbleId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Drop every entry and restore the welcome placeholder
    pub fn clear(&mut self) {
        self.entries.clear();
        self.welcome = true;
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|e| match &e.kind {
            EntryKind::Message(m) => Some(m),
            EntryKind::Typing => None,
        })
    }

    pub fn is_typing(&self) -> bool {
        self.entries.iter().any(|e| e.kind == EntryKind::Typing)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn append(&mut self, kind: EntryKind) -> BubbleId {
        let id = BubbleId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, kind });
        id
    }
}
