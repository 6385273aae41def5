// prefixes.rs - The /prefixes command: per-guild prefix management

use async_trait::async_trait;
use serenity::builder::CreateApplicationCommand;
use serenity::client::Context;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};
use serenity::model::id::GuildId;
use serenity::model::permissions::Permissions;

use crate::db::{AddOutcome, PrefixStore, MAX_PREFIX_AMOUNT, MAX_PREFIX_LENGTH};
use crate::dispatch::registry::SlashCommand;
use crate::error::{BotError, CommandResult};
use crate::member;
use crate::slash;
use crate::PrefixStoreKey;

pub struct Prefixes;

#[async_trait]
impl SlashCommand for Prefixes {
    fn name(&self) -> &'static str {
        "prefixes"
    }

    fn register<'a>(
        &self,
        command: &'a mut CreateApplicationCommand,
    ) -> &'a mut CreateApplicationCommand {
        command
            .name("prefixes")
            .description("Manage this server's command prefixes")
            .create_option(|option| {
                option
                    .name("add")
                    .description("Add a prefix")
                    .kind(CommandOptionType::SubCommand)
                    .create_sub_option(|sub| {
                        sub.name("prefix")
                            .description("The prefix to add")
                            .kind(CommandOptionType::String)
                            .required(true)
                    })
            })
            .create_option(|option| {
                option
                    .name("remove")
                    .description("Remove a prefix")
                    .kind(CommandOptionType::SubCommand)
                    .create_sub_option(|sub| {
                        sub.name("prefix")
                            .description("The prefix to remove")
                            .kind(CommandOptionType::String)
                            .required(true)
                    })
            })
            .create_option(|option| {
                option
                    .name("list")
                    .description("List this server's prefixes")
                    .kind(CommandOptionType::SubCommand)
            })
            .create_option(|option| {
                option
                    .name("toggle")
                    .description("Enable or disable a prefix")
                    .kind(CommandOptionType::SubCommand)
                    .create_sub_option(|sub| {
                        sub.name("prefix")
                            .description("The prefix to toggle")
                            .kind(CommandOptionType::String)
                            .required(true)
                    })
            })
            .create_option(|option| {
                option
                    .name("clear")
                    .description("Remove every prefix")
                    .kind(CommandOptionType::SubCommand)
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

        let actor = guild_id.member(ctx, interaction.user.id).await?;
        if !member::has_permission(ctx, &actor, Permissions::MANAGE_GUILD) {
            slash::respond_ephemeral(
                ctx,
                interaction,
                "❌ You need the `Manage Server` permission.",
            )
            .await?;
            return Ok(());
        }

        let Some(sub) = interaction.data.options.first() else {
            slash::respond_ephemeral(ctx, interaction, "❌ Unknown subcommand.").await?;
            return Ok(());
        };

        let store = {
            let data = ctx.data.read().await;
            data.get::<PrefixStoreKey>()
                .ok_or_else(|| BotError::Other("prefix store missing".into()))?
                .clone()
        };

        match sub.name.as_str() {
            "add" => self.add(ctx, interaction, &store, guild_id, &sub.options).await,
            "remove" => self.remove(ctx, interaction, &store, guild_id, &sub.options).await,
            "list" => self.list(ctx, interaction, &store, guild_id).await,
            "toggle" => self.toggle(ctx, interaction, &store, guild_id, &sub.options).await,
            "clear" => self.clear(ctx, interaction, &store, guild_id).await,
            other => {
                log::warn!("[PREFIXES] unknown subcommand: {}", other);
                slash::respond_ephemeral(ctx, interaction, "❌ Unknown subcommand.").await
            }
        }
    }
}

impl Prefixes {
    async fn add(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        store: &PrefixStore,
        guild_id: GuildId,
        options: &[CommandDataOption],
    ) -> CommandResult {
        let Some(prefix) = slash::find_str(options, "prefix") else {
            slash::respond_ephemeral(ctx, interaction, "❌ You need to provide a prefix.").await?;
            return Ok(());
        };
        let prefix = prefix.trim();
        if prefix.is_empty() {
            slash::respond_ephemeral(ctx, interaction, "❌ A prefix cannot be empty.").await?;
            return Ok(());
        }
        if prefix.len() > MAX_PREFIX_LENGTH {
            slash::respond_ephemeral(
                ctx,
                interaction,
                format!(
                    "❌ Prefixes cannot be longer than {} characters.",
                    MAX_PREFIX_LENGTH
                ),
            )
            .await?;
            return Ok(());
        }
        if store.count(guild_id).await? >= MAX_PREFIX_AMOUNT {
            slash::respond_ephemeral(
                ctx,
                interaction,
                format!("❌ A server cannot have more than {} prefixes.", MAX_PREFIX_AMOUNT),
            )
            .await?;
            return Ok(());
        }

        match store.add(guild_id, prefix).await? {
            AddOutcome::Added => {
                slash::respond(ctx, interaction, format!("✅ Added prefix `{}`", prefix)).await?;
            }
            AddOutcome::Duplicate => {
                slash::respond_ephemeral(
                    ctx,
                    interaction,
                    "❌ Prefix already exists for this server",
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn remove(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        store: &PrefixStore,
        guild_id: GuildId,
        options: &[CommandDataOption],
    ) -> CommandResult {
        let Some(prefix) = slash::find_str(options, "prefix") else {
            slash::respond_ephemeral(ctx, interaction, "❌ You need to provide a prefix.").await?;
            return Ok(());
        };
        if store.remove(guild_id, prefix.trim()).await? {
            slash::respond(ctx, interaction, format!("✅ Removed prefix `{}`", prefix.trim()))
                .await?;
        } else {
            slash::respond_ephemeral(ctx, interaction, "❌ That prefix doesn't exist.").await?;
        }
        Ok(())
    }

    async fn list(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        store: &PrefixStore,
        guild_id: GuildId,
    ) -> CommandResult {
        let rows = store.list(guild_id).await?;
        if rows.is_empty() {
            slash::respond_ephemeral(ctx, interaction, "❌ This server has no custom prefixes.")
                .await?;
            return Ok(());
        }
        let listing = rows
            .iter()
            .map(|row| {
                let state = if row.enabled { "enabled" } else { "disabled" };
                format!("`{}` ({})", row.prefix, state)
            })
            .collect::<Vec<_>>()
            .join("\n");
        slash::respond(
            ctx,
            interaction,
            format!("📋 Prefixes for this server:\n{}", listing),
        )
        .await?;
        Ok(())
    }

    async fn toggle(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        store: &PrefixStore,
        guild_id: GuildId,
        options: &[CommandDataOption],
    ) -> CommandResult {
        let Some(prefix) = slash::find_str(options, "prefix") else {
            slash::respond_ephemeral(ctx, interaction, "❌ You need to provide a prefix.").await?;
            return Ok(());
        };
        match store.toggle(guild_id, prefix.trim()).await? {
            Some(true) => {
                slash::respond(ctx, interaction, format!("✅ Enabled prefix `{}`", prefix.trim()))
                    .await?;
            }
            Some(false) => {
                slash::respond(
                    ctx,
                    interaction,
                    format!("✅ Disabled prefix `{}`", prefix.trim()),
                )
                .await?;
            }
            None => {
                slash::respond_ephemeral(ctx, interaction, "❌ That prefix doesn't exist.")
                    .await?;
            }
        }
        Ok(())
    }

    async fn clear(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        store: &PrefixStore,
        guild_id: GuildId,
    ) -> CommandResult {
        let removed = store.clear(guild_id).await?;
        if removed == 0 {
            slash::respond_ephemeral(ctx, interaction, "❌ This server has no custom prefixes.")
                .await?;
        } else {
            slash::respond(
                ctx,
                interaction,
                format!("✅ Removed **{}** prefixes.", removed),
            )
            .await?;
        }
        Ok(())
    }
}
