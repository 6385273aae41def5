// avatar.rs - Shows a user's avatar

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;

use crate::dispatch::registry::PrefixCommand;
use crate::embeds;
use crate::error::CommandResult;
use crate::member;

pub struct Avatar;

#[async_trait]
impl PrefixCommand for Avatar {
    fn name(&self) -> &'static str {
        "avatar"
    }

    fn usage(&self) -> &'static str {
        "avatar [user]"
    }

    async fn execute(&self, ctx: &Context, msg: &Message, args: &[String]) -> CommandResult {
        let Some(guild_id) = msg.guild_id else {
            msg.reply(&ctx.http, "❌ This command can only be used in servers.")
                .await?;
            return Ok(());
        };

        let target =
            member::resolve_member(ctx, guild_id, msg.author.id, args.first().map(String::as_str))
                .await;
        let Some(target) = target else {
            msg.reply(&ctx.http, "❌ Could not find that user").await?;
            return Ok(());
        };

        let title = format!("{}'s Avatar", target.user.name);
        let image = target.user.face();

        msg.channel_id
            .send_message(&ctx.http, |m| {
                m.reference_message(msg).embed(|e| {
                    embeds::base_embed(e, Some(&title), None, embeds::INFO, Some(&msg.author))
                        .image(image)
                })
            })
            .await?;
        Ok(())
    }
}
