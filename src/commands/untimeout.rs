// untimeout.rs - Clears an active timeout

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::permissions::Permissions;

use crate::dispatch::registry::PrefixCommand;
use crate::error::CommandResult;
use crate::member;

pub struct Untimeout;

#[async_trait]
impl PrefixCommand for Untimeout {
    fn name(&self) -> &'static str {
        "untimeout"
    }

    fn usage(&self) -> &'static str {
        "untimeout <user>"
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
        if !member::has_permission(ctx, &actor, Permissions::MODERATE_MEMBERS) {
            msg.reply(&ctx.http, "❌ You need the `Timeout Members` permission.")
                .await?;
            return Ok(());
        }
        let bot = member::bot_member(ctx, guild_id).await?;
        if !member::has_permission(ctx, &bot, Permissions::MODERATE_MEMBERS) {
            msg.reply(&ctx.http, "❌ I don't have the `Timeout Members` permission.")
                .await?;
            return Ok(());
        }

        let Some(target_arg) = args.first() else {
            msg.reply(&ctx.http, "❌ You need to provide a user to untimeout.")
                .await?;
            return Ok(());
        };

        let target =
            member::resolve_member(ctx, guild_id, msg.author.id, Some(target_arg.as_str())).await;
        let Some(mut target) = target else {
            msg.reply(&ctx.http, "❌ Could not find that user").await?;
            return Ok(());
        };

        if target.communication_disabled_until.is_none() {
            msg.reply(&ctx.http, "❌ That user is not timed out.")
                .await?;
            return Ok(());
        }

        target.enable_communication(&ctx.http).await?;
        msg.reply(
            &ctx.http,
            format!("✅ Successfully removed timeout from **{}**", target.user.tag()),
        )
        .await?;
        Ok(())
    }
}
