// kick.rs - Removes a member from the guild

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::permissions::Permissions;

use crate::dispatch::registry::PrefixCommand;
use crate::error::CommandResult;
use crate::member;

pub struct Kick;

#[async_trait]
impl PrefixCommand for Kick {
    fn name(&self) -> &'static str {
        "kick"
    }

    fn usage(&self) -> &'static str {
        "kick <user> [reason]"
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
        if !member::has_permission(ctx, &actor, Permissions::KICK_MEMBERS) {
            msg.reply(&ctx.http, "❌ You need the `Kick Members` permission.")
                .await?;
            return Ok(());
        }
        let bot = member::bot_member(ctx, guild_id).await?;
        if !member::has_permission(ctx, &bot, Permissions::KICK_MEMBERS) {
            msg.reply(&ctx.http, "❌ I don't have the `Kick Members` permission.")
                .await?;
            return Ok(());
        }

        let Some(target_arg) = args.first() else {
            msg.reply(&ctx.http, "❌ You need to provide a user to kick.")
                .await?;
            return Ok(());
        };
        let reason = if args.len() > 1 {
            args[1..].join(" ")
        } else {
            "No reason provided".to_string()
        };

        let target =
            member::resolve_member(ctx, guild_id, msg.author.id, Some(target_arg.as_str())).await;
        let Some(target) = target else {
            msg.reply(&ctx.http, "❌ Could not find that user").await?;
            return Ok(());
        };

        if target.user.id == bot.user.id {
            msg.reply(&ctx.http, "❌ Cannot kick myself.").await?;
            return Ok(());
        }
        if target.user.id == msg.author.id {
            msg.reply(&ctx.http, "❌ Cannot kick yourself.").await?;
            return Ok(());
        }
        if !member::outranks(ctx, guild_id, msg.author.id, target.user.id) {
            msg.reply(&ctx.http, "❌ User has higher or equal role than you.")
                .await?;
            return Ok(());
        }
        if !member::outranks(ctx, guild_id, bot.user.id, target.user.id) {
            msg.reply(&ctx.http, "❌ I don't have a high enough role.")
                .await?;
            return Ok(());
        }

        let guild_name = ctx
            .cache
            .guild(guild_id)
            .map(|g| g.name)
            .unwrap_or_else(|| "the server".to_string());
        member::try_dm(
            ctx,
            &target.user,
            &format!(
                "You were kicked from **{}**.\nReason: {}",
                guild_name, reason
            ),
        )
        .await;

        guild_id
            .kick_with_reason(&ctx.http, target.user.id, &reason)
            .await?;
        msg.reply(
            &ctx.http,
            format!("✅ Successfully kicked **{}**", target.user.tag()),
        )
        .await?;
        Ok(())
    }
}
