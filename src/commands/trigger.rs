// trigger.rs - Keyword auto-responder management
//
// Three commands share this module: addtrigger, removetrigger, listtriggers.
// Trigger words are stored lowercased; matching happens on word boundaries
// in triggers::respond.

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;
use serenity::model::permissions::Permissions;

use crate::dispatch::registry::PrefixCommand;
use crate::embeds;
use crate::error::{BotError, CommandResult};
use crate::member;
use crate::TriggerStoreKey;

async fn trigger_store(ctx: &Context) -> Result<crate::store::TriggerStore, BotError> {
    let data = ctx.data.read().await;
    Ok(data
        .get::<TriggerStoreKey>()
        .ok_or_else(|| BotError::Other("trigger store missing".into()))?
        .clone())
}

async fn require_manage_guild(ctx: &Context, msg: &Message) -> Result<bool, BotError> {
    let Some(guild_id) = msg.guild_id else {
        msg.reply(&ctx.http, "❌ This command can only be used in servers.")
            .await?;
        return Ok(false);
    };
    let Ok(actor) = guild_id.member(ctx, msg.author.id).await else {
        return Ok(false);
    };
    if !member::has_permission(ctx, &actor, Permissions::MANAGE_GUILD) {
        msg.reply(&ctx.http, "❌ You need the `Manage Server` permission.")
            .await?;
        return Ok(false);
    }
    Ok(true)
}

pub struct AddTrigger;

#[async_trait]
impl PrefixCommand for AddTrigger {
    fn name(&self) -> &'static str {
        "addtrigger"
    }

    fn usage(&self) -> &'static str {
        "addtrigger <word> <response>"
    }

    async fn execute(&self, ctx: &Context, msg: &Message, args: &[String]) -> CommandResult {
        if !require_manage_guild(ctx, msg).await? {
            return Ok(());
        }
        let guild_id = msg.guild_id.ok_or_else(|| BotError::Other("no guild".into()))?;

        if args.len() < 2 {
            msg.reply(&ctx.http, "❌ You need to provide a trigger word and a response.")
                .await?;
            return Ok(());
        }
        let word = &args[0];
        let response = args[1..].join(" ");

        let store = trigger_store(ctx).await?;
        store.add(guild_id, word, &response)?;
        msg.reply(
            &ctx.http,
            format!("✅ Added trigger **{}**", word.to_lowercase()),
        )
        .await?;
        Ok(())
    }
}

pub struct RemoveTrigger;

#[async_trait]
impl PrefixCommand for RemoveTrigger {
    fn name(&self) -> &'static str {
        "removetrigger"
    }

    fn usage(&self) -> &'static str {
        "removetrigger <word>"
    }

    async fn execute(&self, ctx: &Context, msg: &Message, args: &[String]) -> CommandResult {
        if !require_manage_guild(ctx, msg).await? {
            return Ok(());
        }
        let guild_id = msg.guild_id.ok_or_else(|| BotError::Other("no guild".into()))?;

        let Some(word) = args.first() else {
            msg.reply(&ctx.http, "❌ You need to provide a trigger word to remove.")
                .await?;
            return Ok(());
        };

        let store = trigger_store(ctx).await?;
        if store.remove(guild_id, word)? {
            msg.reply(
                &ctx.http,
                format!("✅ Removed trigger **{}**", word.to_lowercase()),
            )
            .await?;
        } else {
            msg.reply(&ctx.http, "❌ That trigger doesn't exist.").await?;
        }
        Ok(())
    }
}

pub struct ListTriggers;

#[async_trait]
impl PrefixCommand for ListTriggers {
    fn name(&self) -> &'static str {
        "listtriggers"
    }

    fn usage(&self) -> &'static str {
        "listtriggers"
    }

    async fn execute(&self, ctx: &Context, msg: &Message, _args: &[String]) -> CommandResult {
        let Some(guild_id) = msg.guild_id else {
            msg.reply(&ctx.http, "❌ This command can only be used in servers.")
                .await?;
            return Ok(());
        };

        let store = trigger_store(ctx).await?;
        let triggers = store.all(guild_id);
        if triggers.is_empty() {
            msg.reply(&ctx.http, "❌ This server has no triggers.").await?;
            return Ok(());
        }

        let listing = triggers
            .iter()
            .map(|(word, response)| format!("**{}** → {}", word, response))
            .collect::<Vec<_>>()
            .join("\n");

        msg.channel_id
            .send_message(&ctx.http, |m| {
                m.reference_message(msg).embed(|e| {
                    embeds::base_embed(
                        e,
                        Some("Triggers"),
                        Some(&listing),
                        embeds::INFO,
                        Some(&msg.author),
                    )
                })
            })
            .await?;
        Ok(())
    }
}
