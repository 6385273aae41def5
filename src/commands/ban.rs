// ban.rs - Bans a user, members and non-members alike

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::permissions::Permissions;

use crate::dispatch::registry::PrefixCommand;
use crate::error::CommandResult;
use crate::member;

pub struct Ban;

#[async_trait]
impl PrefixCommand for Ban {
    fn name(&self) -> &'static str {
        "ban"
    }

    fn usage(&self) -> &'static str {
        "ban <user> [reason]"
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
        if !member::has_permission(ctx, &actor, Permissions::BAN_MEMBERS) {
            msg.reply(&ctx.http, "❌ You need the `Ban Members` permission.")
                .await?;
            return Ok(());
        }
        let bot = member::bot_member(ctx, guild_id).await?;
        if !member::has_permission(ctx, &bot, Permissions::BAN_MEMBERS) {
            msg.reply(&ctx.http, "❌ I don't have the `Ban Members` permission.")
                .await?;
            return Ok(());
        }

        let Some(target_arg) = args.first() else {
            msg.reply(&ctx.http, "❌ You need to provide a user to ban.")
                .await?;
            return Ok(());
        };
        let reason = if args.len() > 1 {
            args[1..].join(" ")
        } else {
            "No reason provided".to_string()
        };

        // members get the full hierarchy treatment; raw ids can be banned
        // even when the user was never in the guild
        let target =
            member::resolve_member(ctx, guild_id, msg.author.id, Some(target_arg.as_str())).await;

        let user = match &target {
            Some(target) => target.user.clone(),
            None => {
                let Some(user_id) = member::parse_user_id(target_arg) else {
                    msg.reply(&ctx.http, "❌ Could not find that user").await?;
                    return Ok(());
                };
                let Ok(user) = user_id.to_user(ctx).await else {
                    msg.reply(&ctx.http, "❌ Could not find that user").await?;
                    return Ok(());
                };
                user
            }
        };

        if user.id == bot.user.id {
            msg.reply(&ctx.http, "❌ Cannot ban myself.").await?;
            return Ok(());
        }
        if user.id == msg.author.id {
            msg.reply(&ctx.http, "❌ Cannot ban yourself.").await?;
            return Ok(());
        }

        if target.is_some() {
            if !member::outranks(ctx, guild_id, msg.author.id, user.id) {
                msg.reply(&ctx.http, "❌ User has higher or equal role than you.")
                    .await?;
                return Ok(());
            }
            if !member::outranks(ctx, guild_id, bot.user.id, user.id) {
                msg.reply(&ctx.http, "❌ I don't have a high enough role.")
                    .await?;
                return Ok(());
            }
        }

        let bans = guild_id.bans(&ctx.http).await?;
        if bans.iter().any(|ban| ban.user.id == user.id) {
            msg.reply(&ctx.http, "❌ That user is already banned.")
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
            &user,
            &format!("You were banned from **{}**.\nReason: {}", guild_name, reason),
        )
        .await;

        guild_id
            .ban_with_reason(&ctx.http, user.id, 0, &reason)
            .await?;
        msg.reply(
            &ctx.http,
            format!("✅ Successfully banned **{}**", user.tag()),
        )
        .await?;
        Ok(())
    }
}
