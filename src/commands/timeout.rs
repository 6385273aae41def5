// timeout.rs - Times out a member for a parsed duration

use async_trait::async_trait;
use chrono::Utc;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::permissions::Permissions;
use serenity::model::Timestamp;

use crate::dispatch::registry::PrefixCommand;
use crate::error::CommandResult;
use crate::member;
use crate::timeutil;

// Discord rejects timeouts longer than four weeks
const MAX_TIMEOUT_MS: i64 = 1000 * 60 * 60 * 24 * 7 * 4;

pub struct Timeout;

#[async_trait]
impl PrefixCommand for Timeout {
    fn name(&self) -> &'static str {
        "timeout"
    }

    fn usage(&self) -> &'static str {
        "timeout <user> <duration> [reason]"
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

        let (Some(target_arg), Some(duration_arg)) = (args.first(), args.get(1)) else {
            msg.reply(&ctx.http, "❌ You need to provide a user and a duration.")
                .await?;
            return Ok(());
        };
        let reason = if args.len() > 2 {
            args[2..].join(" ")
        } else {
            "No reason provided".to_string()
        };

        let Some(duration_ms) = timeutil::duration_to_ms(duration_arg) else {
            msg.reply(&ctx.http, "❌ Invalid time format. Use (5d, 6h, 4d8h).")
                .await?;
            return Ok(());
        };
        if duration_ms <= 0 || duration_ms > MAX_TIMEOUT_MS {
            msg.reply(&ctx.http, "❌ Timeout must be between 1 second and 4 weeks.")
                .await?;
            return Ok(());
        }

        let target =
            member::resolve_member(ctx, guild_id, msg.author.id, Some(target_arg.as_str())).await;
        let Some(mut target) = target else {
            msg.reply(&ctx.http, "❌ Could not find that user").await?;
            return Ok(());
        };

        if target.user.id == bot.user.id {
            msg.reply(&ctx.http, "❌ Cannot timeout myself.").await?;
            return Ok(());
        }
        if target.user.id == msg.author.id {
            msg.reply(&ctx.http, "❌ Cannot timeout yourself.").await?;
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

        let until_secs = (Utc::now().timestamp_millis() + duration_ms) / 1000;
        let until = Timestamp::from_unix_timestamp(until_secs)
            .map_err(|e| crate::error::BotError::Other(format!("invalid timestamp: {}", e)))?;

        let pretty = timeutil::ms_to_duration(duration_ms);
        member::try_dm(
            ctx,
            &target.user,
            &format!("You were timed out for `{}`.\nReason: {}", pretty, reason),
        )
        .await;

        target
            .disable_communication_until_datetime(&ctx.http, until)
            .await?;
        msg.reply(
            &ctx.http,
            format!(
                "✅ Successfully timed out **{}** for `{}` (expires {})",
                target.user.tag(),
                pretty,
                timeutil::ms_to_discord_timestamp(duration_ms, 'R')
            ),
        )
        .await?;
        Ok(())
    }
}
