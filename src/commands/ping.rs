// ping.rs - Latency check

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;

use crate::dispatch::registry::PrefixCommand;
use crate::error::CommandResult;

pub struct Ping;

#[async_trait]
impl PrefixCommand for Ping {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn usage(&self) -> &'static str {
        "ping"
    }

    fn cooldown_secs(&self) -> u64 {
        10
    }

    async fn execute(&self, ctx: &Context, msg: &Message, _args: &[String]) -> CommandResult {
        let start = std::time::Instant::now();
        let mut sent = msg.reply(&ctx.http, "Pinging...").await?;
        let latency = start.elapsed().as_millis();

        sent.edit(&ctx.http, |m| {
            m.content(format!("🏓 Pong!\n\nLatency: {}ms", latency))
        })
        .await?;
        Ok(())
    }
}
