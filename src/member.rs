// member.rs - Member resolution and moderation guards
//
// Resolution order mirrors what users expect to type: a mention, a raw id,
// then a username/nickname search (exact username, exact nickname, partial).

use once_cell::sync::Lazy;
use regex::Regex;
use serenity::client::Context;
use serenity::model::guild::Member;
use serenity::model::id::{GuildId, UserId};
use serenity::model::permissions::Permissions;
use serenity::model::user::User;

use crate::error::BotResult;

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<@!?(\d+)>$").expect("mention regex is valid"));

/// Pulls a raw user id out of a mention or plain-digits token.
pub fn parse_user_id(input: &str) -> Option<UserId> {
    if let Some(capture) = MENTION_RE.captures(input) {
        return capture[1].parse::<u64>().ok().map(UserId);
    }
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return input.parse::<u64>().ok().map(UserId);
    }
    None
}

/// Resolves a guild member from user input; defaults to the author when no
/// input is given. Returns `None` when nothing matches.
pub async fn resolve_member(
    ctx: &Context,
    guild_id: GuildId,
    author_id: UserId,
    input: Option<&str>,
) -> Option<Member> {
    let input = match input {
        None => return guild_id.member(ctx, author_id).await.ok(),
        Some(input) if input.is_empty() => return guild_id.member(ctx, author_id).await.ok(),
        Some(input) => input,
    };

    // 1. mention or raw id
    if let Some(user_id) = parse_user_id(input) {
        if let Ok(member) = guild_id.member(ctx, user_id).await {
            return Some(member);
        }
    }

    // 2. username / nickname search
    let found = guild_id
        .search_members(&ctx.http, input, Some(50))
        .await
        .ok()?;
    if found.is_empty() {
        return None;
    }
    let needle = input.to_lowercase();

    // 2a. exact username match
    if let Some(member) = found
        .iter()
        .find(|m| m.user.name.to_lowercase() == needle)
    {
        return Some(member.clone());
    }

    // 2b. exact nickname match
    if let Some(member) = found.iter().find(|m| {
        m.nick
            .as_ref()
            .map_or(false, |nick| nick.to_lowercase() == needle)
    }) {
        return Some(member.clone());
    }

    // 2c. partial match
    found
        .iter()
        .find(|m| {
            m.user.name.to_lowercase().contains(&needle)
                || m.nick
                    .as_ref()
                    .map_or(false, |nick| nick.to_lowercase().contains(&needle))
        })
        .cloned()
}

/// The bot's own membership in a guild.
pub async fn bot_member(ctx: &Context, guild_id: GuildId) -> BotResult<Member> {
    let bot_id = ctx.cache.current_user_id();
    Ok(guild_id.member(ctx, bot_id).await?)
}

/// Cache-derived guild permissions; administrators pass every check.
pub fn has_permission(ctx: &Context, member: &Member, permission: Permissions) -> bool {
    member
        .permissions(&ctx.cache)
        .map_or(false, |p| p.administrator() || p.contains(permission))
}

/// True when `actor` sits strictly above `target` in the role hierarchy.
/// The guild owner outranks everyone.
pub fn outranks(ctx: &Context, guild_id: GuildId, actor: UserId, target: UserId) -> bool {
    ctx.cache
        .guild(guild_id)
        .and_then(|guild| guild.greater_member_hierarchy(&ctx.cache, actor, target))
        == Some(actor)
}

/// Best-effort DM; moderation notices should never fail the action itself.
pub async fn try_dm(ctx: &Context, user: &User, content: &str) {
    if let Err(e) = user.dm(ctx, |m| m.content(content)).await {
        log::warn!("[DM] could not DM {}: {}", user.tag(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mentions_and_ids() {
        assert_eq!(parse_user_id("<@123>"), Some(UserId(123)));
        assert_eq!(parse_user_id("<@!456>"), Some(UserId(456)));
        assert_eq!(parse_user_id("789"), Some(UserId(789)));
    }

    #[test]
    fn rejects_non_user_tokens() {
        assert_eq!(parse_user_id("someone"), None);
        assert_eq!(parse_user_id("<#123>"), None);
        assert_eq!(parse_user_id("<@&123>"), None);
        assert_eq!(parse_user_id(""), None);
    }
}
