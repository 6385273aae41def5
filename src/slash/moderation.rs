// moderation.rs - The /mod command and its subcommands
//
// Every subcommand defers first (bans and member edits hit the REST API) and
// answers through the original-response edit. Guard texts match the prefix
// moderation commands so both surfaces read the same.

use async_trait::async_trait;
use chrono::Utc;
use serenity::builder::CreateApplicationCommand;
use serenity::client::Context;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::model::guild::Member;
use serenity::model::id::GuildId;
use serenity::model::permissions::Permissions;
use serenity::model::user::User;
use serenity::model::Timestamp;

use crate::dispatch::registry::SlashCommand;
use crate::error::{BotError, CommandResult};
use crate::member;
use crate::slash;
use crate::timeutil;

const MAX_TIMEOUT_MS: i64 = 1000 * 60 * 60 * 24 * 7 * 4;

pub struct Moderation;

#[async_trait]
impl SlashCommand for Moderation {
    fn name(&self) -> &'static str {
        "mod"
    }

    fn register<'a>(
        &self,
        command: &'a mut CreateApplicationCommand,
    ) -> &'a mut CreateApplicationCommand {
        command
            .name("mod")
            .description("Moderation actions")
            .create_option(|option| {
                option
                    .name("ban")
                    .description("Ban a user")
                    .kind(CommandOptionType::SubCommand)
                    .create_sub_option(|sub| {
                        sub.name("user")
                            .description("Who to ban")
                            .kind(CommandOptionType::User)
                            .required(true)
                    })
                    .create_sub_option(|sub| {
                        sub.name("reason")
                            .description("Why")
                            .kind(CommandOptionType::String)
                    })
            })
            .create_option(|option| {
                option
                    .name("kick")
                    .description("Kick a member")
                    .kind(CommandOptionType::SubCommand)
                    .create_sub_option(|sub| {
                        sub.name("user")
                            .description("Who to kick")
                            .kind(CommandOptionType::User)
                            .required(true)
                    })
                    .create_sub_option(|sub| {
                        sub.name("reason")
                            .description("Why")
                            .kind(CommandOptionType::String)
                    })
            })
            .create_option(|option| {
                option
                    .name("unban")
                    .description("Lift a ban")
                    .kind(CommandOptionType::SubCommand)
                    .create_sub_option(|sub| {
                        sub.name("user")
                            .description("Who to unban")
                            .kind(CommandOptionType::User)
                            .required(true)
                    })
            })
            .create_option(|option| {
                option
                    .name("timeout")
                    .description("Time out a member")
                    .kind(CommandOptionType::SubCommand)
                    .create_sub_option(|sub| {
                        sub.name("user")
                            .description("Who to time out")
                            .kind(CommandOptionType::User)
                            .required(true)
                    })
                    .create_sub_option(|sub| {
                        sub.name("duration")
                            .description("How long, e.g. 5d, 6h, 4d8h")
                            .kind(CommandOptionType::String)
                            .required(true)
                    })
                    .create_sub_option(|sub| {
                        sub.name("reason")
                            .description("Why")
                            .kind(CommandOptionType::String)
                    })
            })
            .create_option(|option| {
                option
                    .name("untimeout")
                    .description("Clear a member's timeout")
                    .kind(CommandOptionType::SubCommand)
                    .create_sub_option(|sub| {
                        sub.name("user")
                            .description("Whose timeout to clear")
                            .kind(CommandOptionType::User)
                            .required(true)
                    })
            })
            .create_option(|option| {
                option
                    .name("setnick")
                    .description("Set or clear a member's nickname")
                    .kind(CommandOptionType::SubCommand)
                    .create_sub_option(|sub| {
                        sub.name("user")
                            .description("Whose nickname")
                            .kind(CommandOptionType::User)
                            .required(true)
                    })
                    .create_sub_option(|sub| {
                        sub.name("nickname")
                            .description("The new nickname; omit to reset")
                            .kind(CommandOptionType::String)
                    })
            })
            .create_option(|option| {
                option
                    .name("setrole")
                    .description("Toggle a role on a member")
                    .kind(CommandOptionType::SubCommand)
                    .create_sub_option(|sub| {
                        sub.name("user")
                            .description("Whose roles")
                            .kind(CommandOptionType::User)
                            .required(true)
                    })
                    .create_sub_option(|sub| {
                        sub.name("role")
                            .description("The role to add or remove")
                            .kind(CommandOptionType::Role)
                            .required(true)
                    })
            })
    }

    async fn execute(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
    ) -> CommandResult {
        let Some(guild_id) = interaction.guild_id else {
            slash::respond_ephemeral(
                ctx,
                interaction,
                "❌ This command can only be used in servers.",
            )
            .await?;
            return Ok(());
        };
        let Some(sub) = interaction.data.options.first() else {
            slash::respond_ephemeral(ctx, interaction, "❌ Unknown subcommand.").await?;
            return Ok(());
        };

        slash::defer(ctx, interaction).await?;

        let env = ModEnv {
            guild_id,
            actor: guild_id.member(ctx, interaction.user.id).await?,
            bot: member::bot_member(ctx, guild_id).await?,
        };

        match sub.name.as_str() {
            "ban" => self.ban(ctx, interaction, &env, &sub.options).await,
            "kick" => self.kick(ctx, interaction, &env, &sub.options).await,
            "unban" => self.unban(ctx, interaction, &env, &sub.options).await,
            "timeout" => self.timeout(ctx, interaction, &env, &sub.options).await,
            "untimeout" => self.untimeout(ctx, interaction, &env, &sub.options).await,
            "setnick" => self.setnick(ctx, interaction, &env, &sub.options).await,
            "setrole" => self.setrole(ctx, interaction, &env, &sub.options).await,
            other => {
                log::warn!("[MOD] unknown subcommand: {}", other);
                slash::edit_response(ctx, interaction, "❌ Unknown subcommand.").await
            }
        }
    }
}

struct ModEnv {
    guild_id: GuildId,
    actor: Member,
    bot: Member,
}

impl ModEnv {
    /// Both sides need the permission; replies with the right guard text and
    /// returns false when either is missing it.
    async fn check_permission(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        permission: Permissions,
        label: &str,
    ) -> Result<bool, BotError> {
        if !member::has_permission(ctx, &self.actor, permission) {
            slash::edit_response(
                ctx,
                interaction,
                format!("❌ You need the `{}` permission.", label),
            )
            .await?;
            return Ok(false);
        }
        if !member::has_permission(ctx, &self.bot, permission) {
            slash::edit_response(
                ctx,
                interaction,
                format!("❌ I don't have the `{}` permission.", label),
            )
            .await?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Self-targeting and hierarchy guards shared by the member-editing subs.
    async fn check_target(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        target: &User,
        verb: &str,
    ) -> Result<bool, BotError> {
        if target.id == self.bot.user.id {
            slash::edit_response(ctx, interaction, format!("❌ Cannot {} myself.", verb)).await?;
            return Ok(false);
        }
        if target.id == self.actor.user.id {
            slash::edit_response(ctx, interaction, format!("❌ Cannot {} yourself.", verb))
                .await?;
            return Ok(false);
        }
        if !member::outranks(ctx, self.guild_id, self.actor.user.id, target.id) {
            slash::edit_response(ctx, interaction, "❌ User has higher or equal role than you.")
                .await?;
            return Ok(false);
        }
        if !member::outranks(ctx, self.guild_id, self.bot.user.id, target.id) {
            slash::edit_response(ctx, interaction, "❌ I don't have a high enough role.").await?;
            return Ok(false);
        }
        Ok(true)
    }

    fn guild_name(&self, ctx: &Context) -> String {
        ctx.cache
            .guild(self.guild_id)
            .map(|g| g.name)
            .unwrap_or_else(|| "the server".to_string())
    }
}

fn reason_of(options: &[CommandDataOption]) -> String {
    slash::find_str(options, "reason")
        .unwrap_or("No reason provided")
        .to_string()
}

impl Moderation {
    async fn ban(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        env: &ModEnv,
        options: &[CommandDataOption],
    ) -> CommandResult {
        if !env
            .check_permission(ctx, interaction, Permissions::BAN_MEMBERS, "Ban Members")
            .await?
        {
            return Ok(());
        }
        let Some(user) = slash::find_user(options, "user") else {
            slash::edit_response(ctx, interaction, "❌ Could not find that user").await?;
            return Ok(());
        };
        let reason = reason_of(options);

        // hierarchy only applies when the target is still a member
        let is_member = env.guild_id.member(ctx, user.id).await.is_ok();
        if user.id == env.bot.user.id {
            slash::edit_response(ctx, interaction, "❌ Cannot ban myself.").await?;
            return Ok(());
        }
        if user.id == env.actor.user.id {
            slash::edit_response(ctx, interaction, "❌ Cannot ban yourself.").await?;
            return Ok(());
        }
        if is_member && !env.check_target(ctx, interaction, user, "ban").await? {
            return Ok(());
        }

        let bans = env.guild_id.bans(&ctx.http).await?;
        if bans.iter().any(|ban| ban.user.id == user.id) {
            slash::edit_response(ctx, interaction, "❌ That user is already banned.").await?;
            return Ok(());
        }

        member::try_dm(
            ctx,
            user,
            &format!(
                "You were banned from **{}**.\nReason: {}",
                env.guild_name(ctx),
                reason
            ),
        )
        .await;
        env.guild_id
            .ban_with_reason(&ctx.http, user.id, 0, &reason)
            .await?;
        slash::edit_response(
            ctx,
            interaction,
            format!("✅ Successfully banned **{}**", user.tag()),
        )
        .await?;
        Ok(())
    }

    async fn kick(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        env: &ModEnv,
        options: &[CommandDataOption],
    ) -> CommandResult {
        if !env
            .check_permission(ctx, interaction, Permissions::KICK_MEMBERS, "Kick Members")
            .await?
        {
            return Ok(());
        }
        let Some(user) = slash::find_user(options, "user") else {
            slash::edit_response(ctx, interaction, "❌ Could not find that user").await?;
            return Ok(());
        };
        if env.guild_id.member(ctx, user.id).await.is_err() {
            slash::edit_response(ctx, interaction, "❌ That user is not in this server.").await?;
            return Ok(());
        }
        let reason = reason_of(options);
        if !env.check_target(ctx, interaction, user, "kick").await? {
            return Ok(());
        }

        member::try_dm(
            ctx,
            user,
            &format!(
                "You were kicked from **{}**.\nReason: {}",
                env.guild_name(ctx),
                reason
            ),
        )
        .await;
        env.guild_id
            .kick_with_reason(&ctx.http, user.id, &reason)
            .await?;
        slash::edit_response(
            ctx,
            interaction,
            format!("✅ Successfully kicked **{}**", user.tag()),
        )
        .await?;
        Ok(())
    }

    async fn unban(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        env: &ModEnv,
        options: &[CommandDataOption],
    ) -> CommandResult {
        if !env
            .check_permission(ctx, interaction, Permissions::BAN_MEMBERS, "Ban Members")
            .await?
        {
            return Ok(());
        }
        let Some(user) = slash::find_user(options, "user") else {
            slash::edit_response(ctx, interaction, "❌ Could not find that user").await?;
            return Ok(());
        };

        let bans = env.guild_id.bans(&ctx.http).await?;
        if !bans.iter().any(|ban| ban.user.id == user.id) {
            slash::edit_response(ctx, interaction, "❌ That user is not banned.").await?;
            return Ok(());
        }

        env.guild_id.unban(&ctx.http, user.id).await?;
        slash::edit_response(
            ctx,
            interaction,
            format!("✅ Successfully unbanned **{}**", user.tag()),
        )
        .await?;
        Ok(())
    }

    async fn timeout(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        env: &ModEnv,
        options: &[CommandDataOption],
    ) -> CommandResult {
        if !env
            .check_permission(
                ctx,
                interaction,
                Permissions::MODERATE_MEMBERS,
                "Timeout Members",
            )
            .await?
        {
            return Ok(());
        }
        let Some(user) = slash::find_user(options, "user") else {
            slash::edit_response(ctx, interaction, "❌ Could not find that user").await?;
            return Ok(());
        };
        let Some(duration_arg) = slash::find_str(options, "duration") else {
            slash::edit_response(ctx, interaction, "❌ You need to provide a duration.").await?;
            return Ok(());
        };
        let reason = reason_of(options);

        let Some(duration_ms) = timeutil::duration_to_ms(duration_arg) else {
            slash::edit_response(ctx, interaction, "❌ Invalid time format. Use (5d, 6h, 4d8h).")
                .await?;
            return Ok(());
        };
        if duration_ms <= 0 || duration_ms > MAX_TIMEOUT_MS {
            slash::edit_response(
                ctx,
                interaction,
                "❌ Timeout must be between 1 second and 4 weeks.",
            )
            .await?;
            return Ok(());
        }

        let Ok(mut target) = env.guild_id.member(ctx, user.id).await else {
            slash::edit_response(ctx, interaction, "❌ That user is not in this server.").await?;
            return Ok(());
        };
        if !env.check_target(ctx, interaction, user, "timeout").await? {
            return Ok(());
        }

        let until_secs = (Utc::now().timestamp_millis() + duration_ms) / 1000;
        let until = Timestamp::from_unix_timestamp(until_secs)
            .map_err(|e| BotError::Other(format!("invalid timestamp: {}", e)))?;
        let pretty = timeutil::ms_to_duration(duration_ms);

        member::try_dm(
            ctx,
            user,
            &format!("You were timed out for `{}`.\nReason: {}", pretty, reason),
        )
        .await;
        target
            .disable_communication_until_datetime(&ctx.http, until)
            .await?;
        slash::edit_response(
            ctx,
            interaction,
            format!(
                "✅ Successfully timed out **{}** for `{}` (expires {})",
                user.tag(),
                pretty,
                timeutil::ms_to_discord_timestamp(duration_ms, 'R')
            ),
        )
        .await?;
        Ok(())
    }

    async fn untimeout(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        env: &ModEnv,
        options: &[CommandDataOption],
    ) -> CommandResult {
        if !env
            .check_permission(
                ctx,
                interaction,
                Permissions::MODERATE_MEMBERS,
                "Timeout Members",
            )
            .await?
        {
            return Ok(());
        }
        let Some(user) = slash::find_user(options, "user") else {
            slash::edit_response(ctx, interaction, "❌ Could not find that user").await?;
            return Ok(());
        };
        let Ok(mut target) = env.guild_id.member(ctx, user.id).await else {
            slash::edit_response(ctx, interaction, "❌ That user is not in this server.").await?;
            return Ok(());
        };

        if target.communication_disabled_until.is_none() {
            slash::edit_response(ctx, interaction, "❌ That user is not timed out.").await?;
            return Ok(());
        }

        target.enable_communication(&ctx.http).await?;
        slash::edit_response(
            ctx,
            interaction,
            format!("✅ Successfully removed timeout from **{}**", user.tag()),
        )
        .await?;
        Ok(())
    }

    async fn setnick(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        env: &ModEnv,
        options: &[CommandDataOption],
    ) -> CommandResult {
        if !env
            .check_permission(
                ctx,
                interaction,
                Permissions::MANAGE_NICKNAMES,
                "Manage Nicknames",
            )
            .await?
        {
            return Ok(());
        }
        let Some(user) = slash::find_user(options, "user") else {
            slash::edit_response(ctx, interaction, "❌ Could not find that user").await?;
            return Ok(());
        };
        let nick = slash::find_str(options, "nickname").unwrap_or("").to_string();
        if nick.len() > 32 {
            slash::edit_response(
                ctx,
                interaction,
                "❌ Nicknames cannot be longer than 32 characters.",
            )
            .await?;
            return Ok(());
        }
        if env.guild_id.member(ctx, user.id).await.is_err() {
            slash::edit_response(ctx, interaction, "❌ That user is not in this server.").await?;
            return Ok(());
        }
        if user.id != env.actor.user.id
            && !member::outranks(ctx, env.guild_id, env.actor.user.id, user.id)
        {
            slash::edit_response(ctx, interaction, "❌ User has higher or equal role than you.")
                .await?;
            return Ok(());
        }
        if user.id == env.bot.user.id
            || !member::outranks(ctx, env.guild_id, env.bot.user.id, user.id)
        {
            slash::edit_response(ctx, interaction, "❌ I don't have a high enough role.").await?;
            return Ok(());
        }

        env.guild_id
            .edit_member(&ctx.http, user.id, |m| m.nickname(&nick))
            .await?;
        let confirmation = if nick.is_empty() {
            format!("✅ Reset **{}**'s nickname", user.tag())
        } else {
            format!("✅ Set **{}**'s nickname to **{}**", user.tag(), nick)
        };
        slash::edit_response(ctx, interaction, confirmation).await?;
        Ok(())
    }

    async fn setrole(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        env: &ModEnv,
        options: &[CommandDataOption],
    ) -> CommandResult {
        if !env
            .check_permission(ctx, interaction, Permissions::MANAGE_ROLES, "Manage Roles")
            .await?
        {
            return Ok(());
        }
        let Some(user) = slash::find_user(options, "user") else {
            slash::edit_response(ctx, interaction, "❌ Could not find that user").await?;
            return Ok(());
        };
        let Some(role) = slash::find_role(options, "role") else {
            slash::edit_response(ctx, interaction, "❌ Could not find that role.").await?;
            return Ok(());
        };
        let Ok(mut target) = env.guild_id.member(ctx, user.id).await else {
            slash::edit_response(ctx, interaction, "❌ That user is not in this server.").await?;
            return Ok(());
        };

        let actor_top = env
            .actor
            .highest_role_info(&ctx.cache)
            .map(|(_, pos)| pos)
            .unwrap_or(0);
        let bot_top = env
            .bot
            .highest_role_info(&ctx.cache)
            .map(|(_, pos)| pos)
            .unwrap_or(0);
        let is_owner = ctx
            .cache
            .guild(env.guild_id)
            .map_or(false, |g| g.owner_id == env.actor.user.id);
        if role.position >= actor_top && !is_owner {
            slash::edit_response(
                ctx,
                interaction,
                "❌ That role is higher or equal to your highest role.",
            )
            .await?;
            return Ok(());
        }
        if role.position >= bot_top {
            slash::edit_response(
                ctx,
                interaction,
                "❌ That role is higher or equal to my highest role.",
            )
            .await?;
            return Ok(());
        }

        if target.roles.contains(&role.id) {
            target.remove_role(&ctx.http, role.id).await?;
            slash::edit_response(
                ctx,
                interaction,
                format!("✅ Removed **{}** from **{}**", role.name, user.tag()),
            )
            .await?;
        } else {
            target.add_role(&ctx.http, role.id).await?;
            slash::edit_response(
                ctx,
                interaction,
                format!("✅ Added **{}** to **{}**", role.name, user.tag()),
            )
            .await?;
        }
        Ok(())
    }
}
