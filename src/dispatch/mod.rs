// dispatch - Inbound event routing
//
// One Dispatcher instance owns both command tables and both cooldown maps.
// Per event the flow is: parse -> registry lookup -> cooldown gate ->
// execute, with every handler failure contained to its own event.

pub mod cooldown;
pub mod registry;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serenity::client::Context;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::Message;

use crate::timeutil::ms_to_duration;
use cooldown::{CooldownCheck, CooldownTracker};
use registry::{PrefixCommand, Registry, SlashCommand};

/// Seconds before a cooldown notice in a text channel deletes itself.
const COOLDOWN_NOTICE_SECS: u64 = 5;

/// What became of a text message handed to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// A known command was routed (whether it then succeeded or not).
    Dispatched,
    /// Recognized prefix but unknown command name; dropped silently.
    Unroutable,
    /// No recognized prefix; not a command at all.
    NotACommand,
}

pub struct Dispatcher {
    default_prefix: String,
    prefix_commands: Registry<dyn PrefixCommand>,
    slash_commands: Registry<dyn SlashCommand>,
    // independent trackers: a text `ping` cooldown never blocks `/ping`
    prefix_cooldowns: Mutex<CooldownTracker>,
    slash_cooldowns: Mutex<CooldownTracker>,
}

impl Dispatcher {
    pub fn new(
        default_prefix: String,
        prefix_commands: Registry<dyn PrefixCommand>,
        slash_commands: Registry<dyn SlashCommand>,
    ) -> Self {
        Self {
            default_prefix,
            prefix_commands,
            slash_commands,
            prefix_cooldowns: Mutex::new(CooldownTracker::new()),
            slash_cooldowns: Mutex::new(CooldownTracker::new()),
        }
    }

    pub fn default_prefix(&self) -> &str {
        &self.default_prefix
    }

    pub fn slash_commands(&self) -> &Registry<dyn SlashCommand> {
        &self.slash_commands
    }

    /// Entry point for every gateway text message.
    pub async fn dispatch_message(&self, ctx: &Context, msg: &Message) -> MessageOutcome {
        if msg.author.bot {
            return MessageOutcome::NotACommand;
        }
        let Some(guild_id) = msg.guild_id else {
            return MessageOutcome::NotACommand;
        };

        // recognized prefixes: the configured default, the bot's mention,
        // then this guild's enabled prefixes from the database
        let bot_id = ctx.cache.current_user_id();
        let mut prefixes = vec![
            self.default_prefix.clone(),
            format!("<@{}>", bot_id),
            format!("<@!{}>", bot_id),
        ];
        {
            let data = ctx.data.read().await;
            if let Some(store) = data.get::<crate::PrefixStoreKey>() {
                match store.enabled_prefixes(guild_id).await {
                    Ok(extra) => prefixes.extend(extra),
                    Err(e) => log::error!("[DISPATCH] failed to load guild prefixes: {}", e),
                }
            }
        }

        let Some((name, args)) = parse_invocation(&msg.content, &prefixes) else {
            return MessageOutcome::NotACommand;
        };

        // unknown text commands are dropped without a reply
        let Some(command) = self.prefix_commands.get(&name) else {
            return MessageOutcome::Unroutable;
        };
        let command = Arc::clone(command);

        let verdict = lock_tracker(&self.prefix_cooldowns).check(
            msg.author.id.0,
            &name,
            command.cooldown_secs(),
        );

        match verdict {
            CooldownCheck::Allowed => {
                if let Err(e) = command.execute(ctx, msg, &args).await {
                    log::error!(
                        "[DISPATCH] command '{}' failed for user {} ({}): {}",
                        name,
                        msg.author.name,
                        msg.author.id,
                        e
                    );
                    let notice =
                        format!("✗ Error executing command.\n**Usage:** `{}`", command.usage());
                    if let Err(e) = msg.reply(&ctx.http, notice).await {
                        log::error!("[DISPATCH] failed to send failure notice: {}", e);
                    }
                }
            }
            CooldownCheck::Denied { remaining_ms } => {
                self.send_cooldown_notice(ctx, msg, remaining_ms).await;
            }
        }
        MessageOutcome::Dispatched
    }

    // Transient notice; deleted after a short delay to avoid channel clutter.
    async fn send_cooldown_notice(&self, ctx: &Context, msg: &Message, remaining_ms: u64) {
        let notice = format!("⏳ Try again in `{}`", ms_to_duration(remaining_ms as i64));
        match msg.reply(&ctx.http, notice).await {
            Ok(reply) => {
                let http = ctx.http.clone();
                let channel_id = reply.channel_id.0;
                let message_id = reply.id.0;
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(COOLDOWN_NOTICE_SECS)).await;
                    if let Err(e) = http.delete_message(channel_id, message_id).await {
                        log::warn!("[DISPATCH] failed to delete cooldown notice: {}", e);
                    }
                });
            }
            Err(e) => log::error!("[DISPATCH] failed to send cooldown notice: {}", e),
        }
    }

    /// Entry point for every slash-command interaction.
    pub async fn dispatch_interaction(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
    ) {
        let name = interaction.data.name.to_lowercase();

        let Some(command) = self.slash_commands.get(&name) else {
            log::warn!("[DISPATCH] unknown slash command: {}", interaction.data.name);
            return;
        };
        let command = Arc::clone(command);

        let verdict = lock_tracker(&self.slash_cooldowns).check(
            interaction.user.id.0,
            &name,
            command.cooldown_secs(),
        );

        match verdict {
            CooldownCheck::Allowed => {
                if let Err(e) = command.execute(ctx, interaction).await {
                    log::error!(
                        "[DISPATCH] slash command '{}' failed for user {} ({}): {}",
                        name,
                        interaction.user.name,
                        interaction.user.id,
                        e
                    );
                    self.send_interaction_failure(ctx, interaction).await;
                }
            }
            CooldownCheck::Denied { remaining_ms } => {
                let content = format!("⏳ Try again in `{}`", ms_to_duration(remaining_ms as i64));
                let result = interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content(content).ephemeral(true)
                            })
                    })
                    .await;
                if let Err(e) = result {
                    log::error!("[DISPATCH] failed to send cooldown notice: {}", e);
                }
            }
        }
    }

    // The platform forbids double-replying: when the handler already sent a
    // deferred or partial reply, the fresh reply fails and we fall back to a
    // follow-up message.
    async fn send_interaction_failure(
        &self,
        ctx: &Context,
        interaction: &ApplicationCommandInteraction,
    ) {
        let content = "✗ An error occurred executing this command";

        let fresh = interaction
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| message.content(content).ephemeral(true))
            })
            .await;

        if fresh.is_err() {
            let followup = interaction
                .create_followup_message(&ctx.http, |message| {
                    message.content(content).ephemeral(true)
                })
                .await;
            if let Err(e) = followup {
                log::error!("[DISPATCH] failed to deliver failure notice: {}", e);
            }
        }
    }
}

fn lock_tracker(tracker: &Mutex<CooldownTracker>) -> MutexGuard<'_, CooldownTracker> {
    tracker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Splits a raw message into (command name, args) if it starts with one of
/// the recognized prefixes. The prefix match and the command name are
/// case-insensitive; argument casing is preserved.
fn parse_invocation(content: &str, prefixes: &[String]) -> Option<(String, Vec<String>)> {
    let content = content.trim();

    let rest = prefixes.iter().find_map(|prefix| {
        if prefix.is_empty() {
            return None;
        }
        content
            .get(..prefix.len())
            .filter(|head| head.eq_ignore_ascii_case(prefix))
            .map(|_| &content[prefix.len()..])
    })?;

    let mut tokens = rest.split_whitespace();
    let name = tokens.next()?.to_lowercase();
    let args = tokens.map(str::to_string).collect();
    Some((name, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn strips_prefix_and_splits_args() {
        let parsed = parse_invocation("$ban @someone being rude", &prefixes(&["$"]));
        let (name, args) = parsed.expect("should parse");
        assert_eq!(name, "ban");
        assert_eq!(args, vec!["@someone", "being", "rude"]);
    }

    #[test]
    fn prefix_match_is_case_insensitive_and_preserves_arg_casing() {
        let parsed = parse_invocation("!BAN Someone Some Reason", &prefixes(&["!"]));
        let (name, args) = parsed.expect("should parse");
        assert_eq!(name, "ban");
        assert_eq!(args, vec!["Someone", "Some", "Reason"]);
    }

    #[test]
    fn mention_prefix_works() {
        let parsed = parse_invocation("<@123> ping", &prefixes(&["$", "<@123>"]));
        let (name, args) = parsed.expect("should parse");
        assert_eq!(name, "ping");
        assert!(args.is_empty());
    }

    #[test]
    fn no_prefix_means_no_command() {
        assert_eq!(parse_invocation("hello there", &prefixes(&["$"])), None);
    }

    #[test]
    fn bare_prefix_without_name_is_ignored() {
        assert_eq!(parse_invocation("$", &prefixes(&["$"])), None);
        assert_eq!(parse_invocation("$   ", &prefixes(&["$"])), None);
    }

    #[test]
    fn first_matching_prefix_wins() {
        let parsed = parse_invocation("!!ping", &prefixes(&["!", "!!"]));
        let (name, _) = parsed.expect("should parse");
        // "!" matches first, leaving "!ping" whose first token is "!ping"
        assert_eq!(name, "!ping");
    }
}
