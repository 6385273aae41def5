// slash - Slash command modules, registration, and interaction helpers

pub mod ai;
pub mod moderation;
pub mod ping;
pub mod prefixes;

use std::sync::Arc;

use serenity::client::Context;
use serenity::http::Http;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption, CommandDataOptionValue,
};
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::guild::Role;
use serenity::model::user::User;

use crate::dispatch::registry::{Registry, SlashCommand};
use crate::error::BotResult;

/// The full slash command table; same last-wins collision rule as the prefix
/// table.
pub fn registry() -> Registry<dyn SlashCommand> {
    let mut registry: Registry<dyn SlashCommand> = Registry::new();
    registry.add(Arc::new(ping::Ping));
    registry.add(Arc::new(ai::Ai));
    registry.add(Arc::new(moderation::Moderation));
    registry.add(Arc::new(prefixes::Prefixes));
    registry
}

/// Pushes every registered command schema to the platform as global commands.
pub async fn register_with_discord(
    http: &Http,
    registry: &Registry<dyn SlashCommand>,
) -> BotResult<()> {
    for command in registry.iter() {
        Command::create_global_application_command(http, |c| command.register(c)).await?;
        log::info!("[SLASH] registered /{}", command.name());
    }
    Ok(())
}

pub fn find_str<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match option.resolved.as_ref()? {
            CommandDataOptionValue::String(value) => Some(value.as_str()),
            _ => None,
        })
}

pub fn find_user<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a User> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match option.resolved.as_ref()? {
            CommandDataOptionValue::User(user, _) => Some(user),
            _ => None,
        })
}

pub fn find_role<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a Role> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match option.resolved.as_ref()? {
            CommandDataOptionValue::Role(role) => Some(role),
            _ => None,
        })
}

pub async fn respond(
    ctx: &Context,
    interaction: &ApplicationCommandInteraction,
    content: impl ToString,
) -> BotResult<()> {
    interaction
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content))
        })
        .await?;
    Ok(())
}

pub async fn respond_ephemeral(
    ctx: &Context,
    interaction: &ApplicationCommandInteraction,
    content: impl ToString,
) -> BotResult<()> {
    interaction
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content).ephemeral(true))
        })
        .await?;
    Ok(())
}

/// Buys time for handlers that hit the network before they can answer.
pub async fn defer(ctx: &Context, interaction: &ApplicationCommandInteraction) -> BotResult<()> {
    interaction
        .create_interaction_response(&ctx.http, |response| {
            response.kind(InteractionResponseType::DeferredChannelMessageWithSource)
        })
        .await?;
    Ok(())
}

pub async fn edit_response(
    ctx: &Context,
    interaction: &ApplicationCommandInteraction,
    content: impl ToString,
) -> BotResult<()> {
    interaction
        .edit_original_interaction_response(&ctx.http, |message| message.content(content))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_table_is_complete() {
        let registry = registry();
        assert_eq!(registry.len(), 4);
        for name in ["ping", "ai", "mod", "prefixes"] {
            assert!(registry.get(name).is_some(), "missing command: {}", name);
        }
    }

    #[test]
    fn ping_and_ai_carry_cooldowns() {
        let registry = registry();
        assert_eq!(registry.get("ping").expect("ping").cooldown_secs(), 10);
        assert_eq!(registry.get("ai").expect("ai").cooldown_secs(), 15);
        assert_eq!(registry.get("mod").expect("mod").cooldown_secs(), 0);
    }
}
