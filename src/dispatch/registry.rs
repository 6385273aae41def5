// registry.rs - Command descriptors and the name-keyed lookup table
//
// Commands are enumerated explicitly at startup (see commands::registry and
// slash::registry); there is no runtime discovery and no mutation after load.
// A bad descriptor is skipped with a warning rather than aborting startup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serenity::builder::CreateApplicationCommand;
use serenity::client::Context;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::channel::Message;

use crate::error::CommandResult;

/// A plain-text command invoked as `<prefix><name> [args...]`.
#[async_trait]
pub trait PrefixCommand: Send + Sync {
    fn name(&self) -> &'static str;

    /// Usage line shown in the generic failure reply.
    fn usage(&self) -> &'static str;

    fn cooldown_secs(&self) -> u64 {
        0
    }

    async fn execute(&self, ctx: &Context, msg: &Message, args: &[String]) -> CommandResult;
}

/// A slash command. `register` declares the name/option schema sent to the
/// platform; `execute` handles the inbound interaction.
#[async_trait]
pub trait SlashCommand: Send + Sync {
    fn name(&self) -> &'static str;

    fn cooldown_secs(&self) -> u64 {
        0
    }

    fn register<'a>(
        &self,
        command: &'a mut CreateApplicationCommand,
    ) -> &'a mut CreateApplicationCommand;

    async fn execute(&self, ctx: &Context, interaction: &ApplicationCommandInteraction)
        -> CommandResult;
}

/// Case-insensitive name -> command table. Built once at startup, read-only
/// afterwards.
pub struct Registry<C: ?Sized> {
    by_name: HashMap<String, Arc<C>>,
}

impl<C: ?Sized> Registry<C> {
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, command: Arc<C>) {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            log::warn!("[REGISTRY] skipping command with an empty name");
            return;
        }
        if self.by_name.insert(key.clone(), command).is_some() {
            // deterministic last-wins: registration order is fixed in code
            log::warn!(
                "[REGISTRY] duplicate command name '{}', keeping the later registration",
                key
            );
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<C>> {
        self.by_name.get(&name.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<C>> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl<C: ?Sized> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry<dyn PrefixCommand> {
    pub fn add(&mut self, command: Arc<dyn PrefixCommand>) {
        self.register(command.name(), command);
    }
}

impl Registry<dyn SlashCommand> {
    pub fn add(&mut self, command: Arc<dyn SlashCommand>) {
        self.register(command.name(), command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        name: &'static str,
        marker: u64,
    }

    #[async_trait]
    impl PrefixCommand for Stub {
        fn name(&self) -> &'static str {
            self.name
        }

        fn usage(&self) -> &'static str {
            self.name
        }

        fn cooldown_secs(&self) -> u64 {
            self.marker
        }

        async fn execute(&self, _ctx: &Context, _msg: &Message, _args: &[String]) -> CommandResult {
            Ok(())
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut registry: Registry<dyn PrefixCommand> = Registry::new();
        registry.add(Arc::new(Stub {
            name: "Ping",
            marker: 1,
        }));

        assert!(registry.get("ping").is_some());
        assert!(registry.get("PING").is_some());
        assert!(registry.get("pong").is_none());
    }

    #[test]
    fn empty_names_are_skipped_not_fatal() {
        let mut registry: Registry<dyn PrefixCommand> = Registry::new();
        registry.add(Arc::new(Stub {
            name: "  ",
            marker: 1,
        }));
        registry.add(Arc::new(Stub {
            name: "ping",
            marker: 2,
        }));

        assert_eq!(registry.len(), 1);
        assert!(registry.get("ping").is_some());
    }

    #[test]
    fn name_collisions_keep_the_later_registration() {
        let mut registry: Registry<dyn PrefixCommand> = Registry::new();
        registry.add(Arc::new(Stub {
            name: "ping",
            marker: 1,
        }));
        registry.add(Arc::new(Stub {
            name: "PING",
            marker: 2,
        }));

        assert_eq!(registry.len(), 1);
        let winner = registry.get("ping").map(|c| c.cooldown_secs());
        assert_eq!(winner, Some(2));
    }
}
