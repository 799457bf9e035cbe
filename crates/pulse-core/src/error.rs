//! Error types for the chat client and its configuration

use thiserror::Error;

use crate::client::CONNECTIVITY_MESSAGE;

/// Failure of a single chat request
#[derive(Error, Debug)]
pub enum ChatError {
    /// The backend answered with a non-success status
    #[error("server returned {status}: {detail}")]
    Server { status: u16, detail: String },

    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body could not be decoded
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The request task ended without producing a result
    #[error("request interrupted: {0}")]
    Interrupted(String),
}

impl ChatError {
    /// Text of the error bubble shown for this failure
    pub fn bubble_text(&self) -> String {
        match self {
            ChatError::Server { detail, .. } => detail.clone(),
            ChatError::Transport(_) | ChatError::Decode(_) | ChatError::Interrupted(_) => {
                CONNECTIVITY_MESSAGE.to_string()
            }
        }
    }
}

/// Configuration loading and saving errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
