// info.rs - About the bot

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;

use crate::dispatch::registry::PrefixCommand;
use crate::embeds;
use crate::error::CommandResult;

pub struct Info;

#[async_trait]
impl PrefixCommand for Info {
    fn name(&self) -> &'static str {
        "info"
    }

    fn usage(&self) -> &'static str {
        "info"
    }

    async fn execute(&self, ctx: &Context, msg: &Message, _args: &[String]) -> CommandResult {
        let guild_count = ctx.cache.guild_count();

        msg.channel_id
            .send_message(&ctx.http, |m| {
                m.reference_message(msg).embed(|e| {
                    embeds::base_embed(
                        e,
                        Some("Castellan Info"),
                        Some("A general-purpose moderation and utility bot."),
                        embeds::INFO,
                        Some(&msg.author),
                    )
                    .field("Servers", guild_count.to_string(), true)
                    .field("Commands", "See `help`", true)
                })
            })
            .await?;
        Ok(())
    }
}
