// error.rs - Error types shared across the bot
//
// Command handlers return `CommandResult`; the dispatcher is the only place
// that turns a command error into a user-facing reply.

use thiserror::Error;

pub type BotResult<T> = Result<T, BotError>;

/// Result type returned by every command handler.
pub type CommandResult = Result<(), BotError>;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("discord api error: {0}")]
    Discord(#[from] serenity::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<String> for BotError {
    fn from(message: String) -> Self {
        BotError::Other(message)
    }
}

impl From<&str> for BotError {
    fn from(message: &str) -> Self {
        BotError::Other(message.to_string())
    }
}
