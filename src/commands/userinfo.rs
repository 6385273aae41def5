// userinfo.rs - Member details embed

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;

use crate::dispatch::registry::PrefixCommand;
use crate::embeds;
use crate::error::CommandResult;
use crate::member;
use crate::timeutil::secs_to_discord_timestamp;

pub struct UserInfo;

#[async_trait]
impl PrefixCommand for UserInfo {
    fn name(&self) -> &'static str {
        "userinfo"
    }

    fn usage(&self) -> &'static str {
        "userinfo [user]"
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

        let created = secs_to_discord_timestamp(target.user.created_at().unix_timestamp(), 'F');
        let joined = target
            .joined_at
            .map(|at| secs_to_discord_timestamp(at.unix_timestamp(), 'F'))
            .unwrap_or_else(|| "[Unknown]".to_string());
        let nickname = target.nick.clone().unwrap_or_else(|| "None".to_string());
        let roles = if target.roles.is_empty() {
            "None".to_string()
        } else {
            target
                .roles
                .iter()
                .map(|role| format!("<@&{}>", role.0))
                .collect::<Vec<_>>()
                .join(" ")
        };

        let title = target.user.tag();
        let thumbnail = target.user.face();

        msg.channel_id
            .send_message(&ctx.http, |m| {
                m.reference_message(msg).embed(|e| {
                    embeds::base_embed(e, Some(&title), None, embeds::INFO, Some(&msg.author))
                        .thumbnail(thumbnail)
                        .field("ID", target.user.id.0.to_string(), false)
                        .field("Bot?", if target.user.bot { "Yes" } else { "No" }, false)
                        .field("Account Created", created, false)
                        .field("Joined Server", joined, false)
                        .field("Nickname", nickname, false)
                        .field("Roles", roles, false)
                })
            })
            .await?;
        Ok(())
    }
}
