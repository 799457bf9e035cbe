pub mod client;
pub mod config;
pub mod error;
pub mod state;

// Re-export main types for convenience
pub use client::{ChatClient, Health, CONNECTIVITY_MESSAGE};
pub use config::Config;
pub use error::{ChatError, ConfigError};
pub use state::{BubbleId, ChatMessage, ChatRole, Entry, EntryKind, Transcript};
