// unban.rs - Lifts a ban by user id or mention

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::permissions::Permissions;

use crate::dispatch::registry::PrefixCommand;
use crate::error::CommandResult;
use crate::member;

pub struct Unban;

#[async_trait]
impl PrefixCommand for Unban {
    fn name(&self) -> &'static str {
        "unban"
    }

    fn usage(&self) -> &'static str {
        "unban <user id>"
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

        let user_id = args.first().and_then(|a| member::parse_user_id(a));
        let Some(user_id) = user_id else {
            msg.reply(&ctx.http, "❌ You need to provide a user id to unban.")
                .await?;
            return Ok(());
        };

        let bans = guild_id.bans(&ctx.http).await?;
        let Some(ban) = bans.iter().find(|ban| ban.user.id == user_id) else {
            msg.reply(&ctx.http, "❌ That user is not banned.").await?;
            return Ok(());
        };

        guild_id.unban(&ctx.http, user_id).await?;
        msg.reply(
            &ctx.http,
            format!("✅ Successfully unbanned **{}**", ban.user.tag()),
        )
        .await?;
        Ok(())
    }
}
