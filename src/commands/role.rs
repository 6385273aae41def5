// role.rs - Toggles a role on a member

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::guild::Role as GuildRole;
use serenity::model::id::{GuildId, RoleId};
use serenity::model::permissions::Permissions;

use crate::dispatch::registry::PrefixCommand;
use crate::error::CommandResult;
use crate::member;

static ROLE_MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<@&(\d+)>$").expect("role mention regex is valid"));

fn find_role(ctx: &Context, guild_id: GuildId, input: &str) -> Option<GuildRole> {
    let guild = ctx.cache.guild(guild_id)?;

    if let Some(capture) = ROLE_MENTION_RE.captures(input) {
        let id = capture[1].parse::<u64>().ok().map(RoleId)?;
        return guild.roles.get(&id).cloned();
    }
    if input.chars().all(|c| c.is_ascii_digit()) && !input.is_empty() {
        if let Ok(id) = input.parse::<u64>() {
            if let Some(role) = guild.roles.get(&RoleId(id)) {
                return Some(role.clone());
            }
        }
    }
    let needle = input.to_lowercase();
    guild
        .roles
        .values()
        .find(|role| role.name.to_lowercase() == needle)
        .cloned()
}

pub struct Role;

#[async_trait]
impl PrefixCommand for Role {
    fn name(&self) -> &'static str {
        "role"
    }

    fn usage(&self) -> &'static str {
        "role <user> <role>"
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
        if !member::has_permission(ctx, &actor, Permissions::MANAGE_ROLES) {
            msg.reply(&ctx.http, "❌ You need the `Manage Roles` permission.")
                .await?;
            return Ok(());
        }
        let bot = member::bot_member(ctx, guild_id).await?;
        if !member::has_permission(ctx, &bot, Permissions::MANAGE_ROLES) {
            msg.reply(&ctx.http, "❌ I don't have the `Manage Roles` permission.")
                .await?;
            return Ok(());
        }

        let (Some(target_arg), Some(_)) = (args.first(), args.get(1)) else {
            msg.reply(&ctx.http, "❌ You need to provide a user and a role.")
                .await?;
            return Ok(());
        };

        let target =
            member::resolve_member(ctx, guild_id, msg.author.id, Some(target_arg.as_str())).await;
        let Some(mut target) = target else {
            msg.reply(&ctx.http, "❌ Could not find that user").await?;
            return Ok(());
        };

        let role_input = args[1..].join(" ");
        let Some(role) = find_role(ctx, guild_id, &role_input) else {
            msg.reply(&ctx.http, "❌ Could not find that role.").await?;
            return Ok(());
        };

        // the role itself must sit below both top roles
        let actor_top = actor
            .highest_role_info(&ctx.cache)
            .map(|(_, pos)| pos)
            .unwrap_or(0);
        let bot_top = bot
            .highest_role_info(&ctx.cache)
            .map(|(_, pos)| pos)
            .unwrap_or(0);
        let is_owner = ctx
            .cache
            .guild(guild_id)
            .map_or(false, |g| g.owner_id == msg.author.id);
        if role.position >= actor_top && !is_owner {
            msg.reply(&ctx.http, "❌ That role is higher or equal to your highest role.")
                .await?;
            return Ok(());
        }
        if role.position >= bot_top {
            msg.reply(&ctx.http, "❌ That role is higher or equal to my highest role.")
                .await?;
            return Ok(());
        }

        if target.roles.contains(&role.id) {
            target.remove_role(&ctx.http, role.id).await?;
            msg.reply(
                &ctx.http,
                format!(
                    "✅ Removed **{}** from **{}**",
                    role.name,
                    target.user.tag()
                ),
            )
            .await?;
        } else {
            target.add_role(&ctx.http, role.id).await?;
            msg.reply(
                &ctx.http,
                format!("✅ Added **{}** to **{}**", role.name, target.user.tag()),
            )
            .await?;
        }
        Ok(())
    }
}
