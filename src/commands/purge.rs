// purge.rs - Bulk message deletion

use std::time::Duration;

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::permissions::Permissions;

use crate::dispatch::registry::PrefixCommand;
use crate::error::CommandResult;
use crate::member;

pub struct Purge;

#[async_trait]
impl PrefixCommand for Purge {
    fn name(&self) -> &'static str {
        "purge"
    }

    fn usage(&self) -> &'static str {
        "purge <amount>"
    }

    async fn execute(&self, ctx: &Context, msg: &Message, args: &[String]) -> CommandResult {
        let Some(guild_id) = msg.guild_id else {
            msg.reply(&ctx.http, "❌ This command can only be used in servers.")
                .await?;
            return Ok(());
        };

        let Ok(actor) = guild_id.member(ctx, msg.author.id).await else {
            return Ok(());
        };
        if !member::has_permission(ctx, &actor, Permissions::MANAGE_MESSAGES) {
            msg.reply(&ctx.http, "❌ You need the `Manage Messages` permission.")
                .await?;
            return Ok(());
        }
        let bot = member::bot_member(ctx, guild_id).await?;
        if !member::has_permission(ctx, &bot, Permissions::MANAGE_MESSAGES) {
            msg.reply(&ctx.http, "❌ I don't have the `Manage Messages` permission.")
                .await?;
            return Ok(());
        }

        let amount = args.first().and_then(|a| a.parse::<u64>().ok());
        let Some(amount @ 1..=100) = amount else {
            msg.reply(
                &ctx.http,
                "❌ Please provide a number between **1** and **100**",
            )
            .await?;
            return Ok(());
        };

        let targets = msg
            .channel_id
            .messages(&ctx.http, |b| b.before(msg.id).limit(amount))
            .await?;
        let deleted = targets.len();
        msg.channel_id.delete_messages(&ctx.http, &targets).await?;
        if let Err(e) = msg.delete(&ctx.http).await {
            log::warn!("[PURGE] failed to delete invoking message: {}", e);
        }

        let notice = msg
            .channel_id
            .say(&ctx.http, format!("✅ Purged **{}** messages.", deleted))
            .await?;

        // the confirmation cleans itself up after a few seconds
        let http = ctx.http.clone();
        let channel = notice.channel_id.0;
        let message = notice.id.0;
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            if let Err(e) = http.delete_message(channel, message).await {
                log::debug!("[PURGE] could not delete confirmation: {}", e);
            }
        });
        Ok(())
    }
}
