// triggers.rs - Keyword auto-responder
//
// Runs on guild messages that did not dispatch as a command. The first
// matching trigger wins; matches are whole-word and case-insensitive.

use regex::Regex;
use serenity::client::Context;
use serenity::model::channel::Message;

/// Whole-word, case-insensitive match of `trigger` inside `content`.
pub fn matches(trigger: &str, content: &str) -> bool {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(trigger));
    match Regex::new(&pattern) {
        Ok(re) => re.is_match(content),
        Err(e) => {
            log::warn!("[TRIGGERS] bad trigger pattern '{}': {}", trigger, e);
            false
        }
    }
}

pub async fn respond(ctx: &Context, msg: &Message) {
    if msg.author.bot {
        return;
    }
    let Some(guild_id) = msg.guild_id else {
        return;
    };

    let triggers = {
        let data = ctx.data.read().await;
        match data.get::<crate::TriggerStoreKey>() {
            Some(store) => store.all(guild_id),
            None => return,
        }
    };
    if triggers.is_empty() {
        return;
    }

    for (trigger, response) in &triggers {
        if matches(trigger, &msg.content) {
            if let Err(e) = msg.channel_id.say(&ctx.http, response).await {
                log::warn!("[TRIGGERS] failed to send response: {}", e);
            }
            break; // stop after first match
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_whole_words_case_insensitively() {
        assert!(matches("hello", "well HELLO there"));
        assert!(matches("hello", "hello"));
    }

    #[test]
    fn does_not_match_substrings() {
        assert!(!matches("hell", "hello there"));
        assert!(!matches("art", "startled"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        assert!(!matches("a.c", "abc"));
        assert!(matches("a.c", "see a.c for details"));
    }
}
