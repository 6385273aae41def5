// logchannel.rs - Shows the configured log channel

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;

use crate::dispatch::registry::PrefixCommand;
use crate::error::CommandResult;
use crate::LogChannelStoreKey;

pub struct LogChannel;

#[async_trait]
impl PrefixCommand for LogChannel {
    fn name(&self) -> &'static str {
        "logchannel"
    }

    fn usage(&self) -> &'static str {
        "logchannel"
    }

    async fn execute(&self, ctx: &Context, msg: &Message, _args: &[String]) -> CommandResult {
        let Some(guild_id) = msg.guild_id else {
            msg.reply(&ctx.http, "❌ This command can only be used in servers.")
                .await?;
            return Ok(());
        };

        let store = {
            let data = ctx.data.read().await;
            data.get::<LogChannelStoreKey>()
                .ok_or_else(|| crate::error::BotError::Other("log channel store missing".into()))?
                .clone()
        };

        let Some(channel_id) = store.get(guild_id) else {
            msg.reply(&ctx.http, "❌ No log channel is set. Use `setlog` to set one.")
                .await?;
            return Ok(());
        };

        // the stored channel may have been deleted since
        if ctx.cache.guild_channel(channel_id).is_none() {
            msg.reply(
                &ctx.http,
                "❌ The configured log channel no longer exists. Use `setlog` to set a new one.",
            )
            .await?;
            return Ok(());
        }

        msg.reply(
            &ctx.http,
            format!("📋 The log channel is <#{}>.", channel_id.0),
        )
        .await?;
        Ok(())
    }
}
