// logmirror.rs - Mirrors guild events into the configured log channel
//
// Everything here is best-effort: a missing log channel, an uncached
// message, or a failed send just means no log line for that event.

use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::guild::Member;
use serenity::model::id::{ChannelId, GuildId, MessageId};

use crate::embeds;

const BAD_COLOUR: serenity::utils::Colour = serenity::utils::Colour(0xff0000);
const MEDIUM_COLOUR: serenity::utils::Colour = serenity::utils::Colour(0xffff00);

async fn log_channel(ctx: &Context, guild_id: GuildId) -> Option<ChannelId> {
    let data = ctx.data.read().await;
    data.get::<crate::LogChannelStoreKey>()?.get(guild_id)
}

async fn welcome_channel(ctx: &Context, guild_id: GuildId) -> Option<ChannelId> {
    let data = ctx.data.read().await;
    data.get::<crate::WelcomeChannelStoreKey>()?.get(guild_id)
}

pub async fn message_deleted(
    ctx: &Context,
    channel_id: ChannelId,
    message_id: MessageId,
    guild_id: Option<GuildId>,
) {
    let Some(guild_id) = guild_id else { return };
    // only cached messages can be reported with content
    let Some(msg) = ctx.cache.message(channel_id, message_id) else {
        return;
    };
    if msg.author.bot {
        return;
    }
    let Some(target) = log_channel(ctx, guild_id).await else {
        return;
    };

    let content = if msg.content.is_empty() {
        "[No Text]".to_string()
    } else {
        msg.content.clone()
    };

    let result = target
        .send_message(&ctx.http, |m| {
            m.embed(|e| {
                embeds::base_embed(e, Some("🗑️ Message Deleted"), None, BAD_COLOUR, None)
                    .thumbnail(msg.author.face())
                    .field("User", msg.author.tag(), true)
                    .field("Channel", format!("<#{}>", channel_id.0), true)
                    .field("Content", content, false)
                    .footer(|f| f.text(msg.author.id.0.to_string()))
            })
        })
        .await;
    if let Err(e) = result {
        log::warn!("[LOG] failed to mirror deleted message: {}", e);
    }
}

pub async fn message_edited(ctx: &Context, old: Option<Message>, new: Option<Message>) {
    let Some(new) = new else { return };
    let Some(guild_id) = new.guild_id else { return };
    if new.author.bot {
        return;
    }
    let Some(target) = log_channel(ctx, guild_id).await else {
        return;
    };

    let before = old
        .map(|m| m.content)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "[No Text]".to_string());
    let after = if new.content.is_empty() {
        "[No Text]".to_string()
    } else {
        new.content.clone()
    };

    let result = target
        .send_message(&ctx.http, |m| {
            m.embed(|e| {
                embeds::base_embed(e, Some("✏️ Message Edited"), None, MEDIUM_COLOUR, None)
                    .thumbnail(new.author.face())
                    .field("User", new.author.tag(), true)
                    .field("Channel", format!("<#{}>", new.channel_id.0), true)
                    .field("Before", before, false)
                    .field("After", after, false)
                    .footer(|f| f.text(new.author.id.0.to_string()))
            })
        })
        .await;
    if let Err(e) = result {
        log::warn!("[LOG] failed to mirror edited message: {}", e);
    }
}

pub async fn member_updated(ctx: &Context, old: Option<Member>, new: Member) {
    let Some(old) = old else { return };
    let Some(target) = log_channel(ctx, new.guild_id).await else {
        return;
    };

    // nickname change
    if old.nick != new.nick {
        let old_nick = old.nick.clone().unwrap_or_else(|| "[None]".to_string());
        let new_nick = new.nick.clone().unwrap_or_else(|| "[None]".to_string());

        let result = target
            .send_message(&ctx.http, |m| {
                m.embed(|e| {
                    embeds::base_embed(e, Some("✏️ Nickname Changed"), None, MEDIUM_COLOUR, None)
                        .thumbnail(new.user.face())
                        .field("User", new.user.tag(), false)
                        .field("Old Nickname", old_nick, false)
                        .field("New Nickname", new_nick, false)
                        .footer(|f| f.text(new.user.id.0.to_string()))
                })
            })
            .await;
        if let Err(e) = result {
            log::warn!("[LOG] failed to mirror nickname change: {}", e);
        }
    }

    // role changes
    let added: Vec<String> = new
        .roles
        .iter()
        .filter(|role| !old.roles.contains(role))
        .map(|role| format!("<@&{}>", role.0))
        .collect();
    let removed: Vec<String> = old
        .roles
        .iter()
        .filter(|role| !new.roles.contains(role))
        .map(|role| format!("<@&{}>", role.0))
        .collect();

    if !added.is_empty() || !removed.is_empty() {
        let added = if added.is_empty() {
            "[None]".to_string()
        } else {
            added.join(" ")
        };
        let removed = if removed.is_empty() {
            "[None]".to_string()
        } else {
            removed.join(" ")
        };

        let result = target
            .send_message(&ctx.http, |m| {
                m.embed(|e| {
                    embeds::base_embed(e, Some("⚙️ Roles Updated"), None, MEDIUM_COLOUR, None)
                        .thumbnail(new.user.face())
                        .field("User", format!("<@{}>", new.user.id.0), false)
                        .field("Added Roles", added, false)
                        .field("Removed Roles", removed, false)
                        .footer(|f| f.text(new.user.id.0.to_string()))
                })
            })
            .await;
        if let Err(e) = result {
            log::warn!("[LOG] failed to mirror role change: {}", e);
        }
    }
}

pub async fn member_joined(ctx: &Context, member: &Member) {
    let Some(target) = welcome_channel(ctx, member.guild_id).await else {
        return;
    };

    let guild_name = ctx
        .cache
        .guild(member.guild_id)
        .map(|g| g.name)
        .unwrap_or_else(|| "the server".to_string());

    let greeting = format!("👋 Welcome <@{}> to **{}**!", member.user.id.0, guild_name);
    if let Err(e) = target.say(&ctx.http, greeting).await {
        log::warn!("[LOG] failed to send welcome message: {}", e);
    }
}
