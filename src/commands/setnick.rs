// setnick.rs - Sets or clears a member's nickname

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::permissions::Permissions;

use crate::dispatch::registry::PrefixCommand;
use crate::error::CommandResult;
use crate::member;

pub struct SetNick;

#[async_trait]
impl PrefixCommand for SetNick {
    fn name(&self) -> &'static str {
        "setnick"
    }

    fn usage(&self) -> &'static str {
        "setnick [user] [nickname]"
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
        let bot = member::bot_member(ctx, guild_id).await?;
        if !member::has_permission(ctx, &bot, Permissions::MANAGE_NICKNAMES) {
            msg.reply(&ctx.http, "❌ I don't have the `Manage Nicknames` permission.")
                .await?;
            return Ok(());
        }

        // a leading mention or id selects the target; otherwise the author
        // renames themselves and every arg is part of the nickname
        let (target, nick) = match args.first().and_then(|a| member::parse_user_id(a)) {
            Some(user_id) => {
                let Ok(target) = guild_id.member(ctx, user_id).await else {
                    msg.reply(&ctx.http, "❌ Could not find that user").await?;
                    return Ok(());
                };
                (target, args[1..].join(" "))
            }
            None => (actor.clone(), args.join(" ")),
        };

        if target.user.id != msg.author.id {
            if !member::has_permission(ctx, &actor, Permissions::MANAGE_NICKNAMES) {
                msg.reply(&ctx.http, "❌ You need the `Manage Nicknames` permission.")
                    .await?;
                return Ok(());
            }
            if !member::outranks(ctx, guild_id, msg.author.id, target.user.id) {
                msg.reply(&ctx.http, "❌ User has higher or equal role than you.")
                    .await?;
                return Ok(());
            }
        }
        if target.user.id == bot.user.id
            || !member::outranks(ctx, guild_id, bot.user.id, target.user.id)
        {
            msg.reply(&ctx.http, "❌ I don't have a high enough role.")
                .await?;
            return Ok(());
        }
        if nick.len() > 32 {
            msg.reply(&ctx.http, "❌ Nicknames cannot be longer than 32 characters.")
                .await?;
            return Ok(());
        }

        guild_id
            .edit_member(&ctx.http, target.user.id, |m| m.nickname(&nick))
            .await?;
        if nick.is_empty() {
            msg.reply(
                &ctx.http,
                format!("✅ Reset **{}**'s nickname", target.user.tag()),
            )
            .await?;
        } else {
            msg.reply(
                &ctx.http,
                format!("✅ Set **{}**'s nickname to **{}**", target.user.tag(), nick),
            )
            .await?;
        }
        Ok(())
    }
}
