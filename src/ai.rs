// ai.rs - Chat-completions client and per-user conversation history
//
// The history lives in the serenity TypeMap and is never persisted; it is
// bounded both in entry count and per-entry length so a chatty user cannot
// grow memory without limit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BotError, BotResult};

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const HISTORY_LIMIT: usize = 10;
pub const MAX_ENTRY_LENGTH: usize = 250;

const API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const SYSTEM_PROMPT: &str = "You are a helpful discord bot. You like to chat and talk to users \
    happily. You remember history with users. Keep responses short and concise, do not go over \
    200 words.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The speaker: a username, or "bot".
    pub role: String,
    pub content: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserHistory {
    entries: Vec<HistoryEntry>,
}

impl UserHistory {
    pub fn push(&mut self, role: &str, content: &str) {
        let content: String = content.chars().take(MAX_ENTRY_LENGTH).collect();
        self.entries.push(HistoryEntry {
            role: role.to_string(),
            content,
            recorded_at: Utc::now(),
        });
        if self.entries.len() > HISTORY_LIMIT {
            self.entries.remove(0);
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the history as the context block the model sees.
    pub fn render_context(&self) -> String {
        if self.entries.is_empty() {
            return "none".to_string();
        }
        self.entries
            .iter()
            .map(|entry| format!("{}: {}", entry.role, entry.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

pub struct AiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl AiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// One completion round-trip: system prompt + rendered history context +
    /// the user's prompt.
    pub async fn chat(&self, prompt: &str, context: &str) -> BotResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: format!("{} Context: {}", SYSTEM_PROMPT, context),
                },
                WireMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.7,
        };

        let response = self
            .http
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| BotError::Other("completion response had no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_bounded_in_count() {
        let mut history = UserHistory::default();
        for i in 0..25 {
            history.push("user", &format!("message {}", i));
        }
        assert_eq!(history.entries().len(), HISTORY_LIMIT);
        // oldest entries were dropped first
        assert_eq!(history.entries()[0].content, "message 15");
    }

    #[test]
    fn entries_are_truncated() {
        let mut history = UserHistory::default();
        history.push("user", &"x".repeat(1000));
        assert_eq!(history.entries()[0].content.len(), MAX_ENTRY_LENGTH);
    }

    #[test]
    fn context_renders_role_prefixed_lines() {
        let mut history = UserHistory::default();
        assert_eq!(history.render_context(), "none");

        history.push("alice", "hi");
        history.push("bot", "hello!");
        assert_eq!(history.render_context(), "alice: hi\nbot: hello!");
    }
}
