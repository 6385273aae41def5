// ai.rs - Chat completion command backed by the Groq API

use async_trait::async_trait;
use serenity::builder::CreateApplicationCommand;
use serenity::client::Context;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::{
    ApplicationCommandInteraction, CommandDataOption,
};

use crate::ai::UserHistory;
use crate::dispatch::registry::SlashCommand;
use crate::error::CommandResult;
use crate::slash;
use crate::{AiClientKey, AiHistoryKey};

pub struct Ai;

#[async_trait]
impl SlashCommand for Ai {
    fn name(&self) -> &'static str {
        "ai"
    }

    fn cooldown_secs(&self) -> u64 {
        15
    }

    fn register<'a>(
        &self,
        command: &'a mut CreateApplicationCommand,
    ) -> &'a mut CreateApplicationCommand {
        command
            .name("ai")
            .description("Chat with the bot")
            .create_option(|option| {
                option
                    .name("prompt")
                    .description("Ask the bot something")
                    .kind(CommandOptionType::SubCommand)
                    .create_sub_option(|sub| {
                        sub.name("prompt")
                            .description("What to ask")
                            .kind(CommandOptionType::String)
                            .required(true)
                    })
            })
            .create_option(|option| {
                option
                    .name("reset-history")
                    .description("Forget your conversation history")
                    .kind(CommandOptionType::SubCommand)
            })
            .create_option(|option| {
                option
                    .name("view-history")
                    .description("Show your saved conversation history")
                    .kind(CommandOptionType::SubCommand)
            })
    }

    async fn execute(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
    ) -> CommandResult {
        let Some(sub) = interaction.data.options.first() else {
            slash::respond_ephemeral(ctx, interaction, "❌ Unknown subcommand.").await?;
            return Ok(());
        };

        match sub.name.as_str() {
            "prompt" => self.prompt(ctx, interaction, &sub.options).await,
            "reset-history" => self.reset_history(ctx, interaction).await,
            "view-history" => self.view_history(ctx, interaction).await,
            other => {
                log::warn!("[AI] unknown subcommand: {}", other);
                slash::respond_ephemeral(ctx, interaction, "❌ Unknown subcommand.").await
            }
        }
    }
}

impl Ai {
    async fn prompt(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
        options: &[CommandDataOption],
    ) -> CommandResult {
        let Some(prompt) = slash::find_str(options, "prompt") else {
            slash::respond_ephemeral(ctx, interaction, "❌ You need to provide a prompt.").await?;
            return Ok(());
        };
        let prompt = prompt.to_string();

        let client = {
            let data = ctx.data.read().await;
            data.get::<AiClientKey>().cloned()
        };
        let Some(client) = client else {
            slash::respond_ephemeral(
                ctx,
                interaction,
                "❌ The AI feature is not configured on this bot.",
            )
            .await?;
            return Ok(());
        };

        // the completion round-trip can easily exceed the reply deadline
        slash::defer(ctx, interaction).await?;

        let context = {
            let data = ctx.data.read().await;
            data.get::<AiHistoryKey>()
                .and_then(|histories| histories.get(&interaction.user.id))
                .map(UserHistory::render_context)
                .unwrap_or_else(|| "none".to_string())
        };

        let answer = client.chat(&prompt, &context).await?;

        {
            let mut data = ctx.data.write().await;
            if let Some(histories) = data.get_mut::<AiHistoryKey>() {
                let history = histories.entry(interaction.user.id).or_default();
                history.push(&interaction.user.name, &prompt);
                history.push("bot", &answer);
            }
        }

        slash::edit_response(ctx, interaction, answer).await?;
        Ok(())
    }

    async fn reset_history(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
    ) -> CommandResult {
        let removed = {
            let mut data = ctx.data.write().await;
            data.get_mut::<AiHistoryKey>()
                .and_then(|histories| histories.remove(&interaction.user.id))
                .is_some()
        };
        let content = if removed {
            "✅ Your conversation history has been reset."
        } else {
            "❌ You have no saved history."
        };
        slash::respond_ephemeral(ctx, interaction, content).await?;
        Ok(())
    }

    async fn view_history(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
    ) -> CommandResult {
        let rendered = {
            let data = ctx.data.read().await;
            data.get::<AiHistoryKey>()
                .and_then(|histories| histories.get(&interaction.user.id))
                .filter(|history| !history.is_empty())
                .map(UserHistory::render_context)
        };
        let content = match rendered {
            Some(lines) => format!("📜 Your conversation history:\n```\n{}\n```", lines),
            None => "❌ You have no saved history.".to_string(),
        };
        slash::respond_ephemeral(ctx, interaction, content).await?;
        Ok(())
    }
}
