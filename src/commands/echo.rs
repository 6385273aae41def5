// echo.rs - Repeats a message, optionally into another channel

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;

use crate::dispatch::registry::PrefixCommand;
use crate::error::CommandResult;

static CHANNEL_MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<#(\d+)>$").expect("channel mention regex is valid"));

pub struct Echo;

#[async_trait]
impl PrefixCommand for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn usage(&self) -> &'static str {
        "echo [channel] [text]"
    }

    async fn execute(&self, ctx: &Context, msg: &Message, args: &[String]) -> CommandResult {
        // first arg may be a channel mention; otherwise echo in place
        let (target, text) = match args.first().and_then(|a| CHANNEL_MENTION_RE.captures(a)) {
            Some(capture) => {
                let id = capture[1].parse::<u64>().map(ChannelId).ok();
                match id {
                    Some(id) => (id, args[1..].join(" ")),
                    None => (msg.channel_id, args.join(" ")),
                }
            }
            None => (msg.channel_id, args.join(" ")),
        };

        if text.is_empty() {
            msg.reply(&ctx.http, "❌ You need to provide something to echo.")
                .await?;
            return Ok(());
        }

        // remove the invoking message so only the echo remains
        if let Err(e) = msg.delete(&ctx.http).await {
            log::warn!("[ECHO] failed to delete invoking message: {}", e);
        }

        if target.say(&ctx.http, text).await.is_err() {
            msg.channel_id
                .say(
                    &ctx.http,
                    "❌ Could not send message. Make sure I have permission to send messages in that channel.",
                )
                .await?;
        }
        Ok(())
    }
}
