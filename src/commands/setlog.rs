// setlog.rs - Sets or removes the guild's event log channel

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::model::permissions::Permissions;

use crate::dispatch::registry::PrefixCommand;
use crate::embeds;
use crate::error::CommandResult;
use crate::member;
use crate::LogChannelStoreKey;

static CHANNEL_MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<#(\d+)>$").expect("channel mention regex is valid"));

pub struct SetLog;

#[async_trait]
impl PrefixCommand for SetLog {
    fn name(&self) -> &'static str {
        "setlog"
    }

    fn usage(&self) -> &'static str {
        "setlog [channel]"
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
        if !member::has_permission(ctx, &actor, Permissions::MANAGE_GUILD) {
            msg.reply(&ctx.http, "❌ You need the `Manage Server` permission.")
                .await?;
            return Ok(());
        }

        // defaults to the channel the command was issued in
        let target = match args.first() {
            Some(arg) => match CHANNEL_MENTION_RE
                .captures(arg)
                .and_then(|c| c[1].parse::<u64>().ok())
            {
                Some(id) => ChannelId(id),
                None => {
                    msg.reply(&ctx.http, "❌ That doesn't look like a channel mention.")
                        .await?;
                    return Ok(());
                }
            },
            None => msg.channel_id,
        };

        let store = {
            let data = ctx.data.read().await;
            data.get::<LogChannelStoreKey>()
                .ok_or_else(|| crate::error::BotError::Other("log channel store missing".into()))?
                .clone()
        };

        // selecting the current log channel again turns logging off
        if store.get(guild_id) == Some(target) {
            store.set(guild_id, None)?;
            msg.channel_id
                .send_message(&ctx.http, |m| {
                    m.reference_message(msg).embed(|e| {
                        embeds::base_embed(
                            e,
                            Some("🗑️ Log Channel Removed"),
                            Some(&format!("<#{}> is no longer the log channel.", target.0)),
                            embeds::ERROR,
                            Some(&msg.author),
                        )
                    })
                })
                .await?;
            return Ok(());
        }

        store.set(guild_id, Some(target))?;
        msg.channel_id
            .send_message(&ctx.http, |m| {
                m.reference_message(msg).embed(|e| {
                    embeds::base_embed(
                        e,
                        Some("✅ Log Channel Set"),
                        Some(&format!("Guild events will be logged in <#{}>.", target.0)),
                        embeds::SUCCESS,
                        Some(&msg.author),
                    )
                })
            })
            .await?;
        Ok(())
    }
}
