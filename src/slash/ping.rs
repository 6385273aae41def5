// ping.rs - Round-trip latency check

use std::time::Instant;

use async_trait::async_trait;
use serenity::builder::CreateApplicationCommand;
use serenity::client::Context;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;

use crate::dispatch::registry::SlashCommand;
use crate::error::CommandResult;
use crate::slash;

pub struct Ping;

#[async_trait]
impl SlashCommand for Ping {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn cooldown_secs(&self) -> u64 {
        10
    }

    fn register<'a>(
        &self,
        command: &'a mut CreateApplicationCommand,
    ) -> &'a mut CreateApplicationCommand {
        command.name("ping").description("Check the bot's latency")
    }

    async fn execute(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
    ) -> CommandResult {
        let started = Instant::now();
        slash::respond(ctx, interaction, "Pinging...").await?;
        let latency_ms = started.elapsed().as_millis();
        slash::edit_response(
            ctx,
            interaction,
            format!("🏓 Pong!\n\nLatency: {}ms", latency_ms),
        )
        .await?;
        Ok(())
    }
}
