// serverinfo.rs - Guild details embed

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;

use crate::dispatch::registry::PrefixCommand;
use crate::embeds;
use crate::error::CommandResult;
use crate::timeutil::secs_to_discord_timestamp;

pub struct ServerInfo;

#[async_trait]
impl PrefixCommand for ServerInfo {
    fn name(&self) -> &'static str {
        "serverinfo"
    }

    fn usage(&self) -> &'static str {
        "serverinfo"
    }

    async fn execute(&self, ctx: &Context, msg: &Message, _args: &[String]) -> CommandResult {
        let guild = msg.guild_id.and_then(|id| ctx.cache.guild(id));
        let Some(guild) = guild else {
            msg.reply(&ctx.http, "❌ This command can only be used in servers.")
                .await?;
            return Ok(());
        };

        let title = format!("{} Server Info", guild.name);
        let thumbnail = guild.icon_url();
        let boosts = format!(
            "{} (Level {})",
            guild.premium_subscription_count,
            guild.premium_tier.num()
        );
        let created = secs_to_discord_timestamp(guild.id.created_at().unix_timestamp(), 'F');

        msg.channel_id
            .send_message(&ctx.http, |m| {
                m.reference_message(msg).embed(|e| {
                    let embed = embeds::base_embed(
                        e,
                        Some(&title),
                        None,
                        embeds::INFO,
                        Some(&msg.author),
                    );
                    if let Some(icon) = thumbnail {
                        embed.thumbnail(icon);
                    }
                    embed
                        .field("Server ID", guild.id.0.to_string(), false)
                        .field("Owner", format!("<@{}>", guild.owner_id.0), true)
                        .field("Boosts", boosts, true)
                        .field("Members", guild.member_count.to_string(), true)
                        .field("Roles", guild.roles.len().to_string(), true)
                        .field("Channels", guild.channels.len().to_string(), true)
                        .field("Created On", created, false)
                })
            })
            .await?;
        Ok(())
    }
}
