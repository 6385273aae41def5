// commands - Prefix command modules and the explicit registration table

pub mod avatar;
pub mod ban;
pub mod echo;
pub mod help;
pub mod info;
pub mod kick;
pub mod logchannel;
pub mod ping;
pub mod purge;
pub mod role;
pub mod serverinfo;
pub mod setlog;
pub mod setnick;
pub mod setwelcome;
pub mod timeout;
pub mod trigger;
pub mod unban;
pub mod untimeout;
pub mod userinfo;

use std::sync::Arc;

use crate::dispatch::registry::{PrefixCommand, Registry};

/// The full prefix command table. Registration order is fixed here; on a
/// duplicate name the later entry wins.
pub fn registry() -> Registry<dyn PrefixCommand> {
    let mut registry: Registry<dyn PrefixCommand> = Registry::new();
    registry.add(Arc::new(ping::Ping));
    registry.add(Arc::new(help::Help));
    registry.add(Arc::new(info::Info));
    registry.add(Arc::new(avatar::Avatar));
    registry.add(Arc::new(userinfo::UserInfo));
    registry.add(Arc::new(serverinfo::ServerInfo));
    registry.add(Arc::new(ban::Ban));
    registry.add(Arc::new(kick::Kick));
    registry.add(Arc::new(unban::Unban));
    registry.add(Arc::new(timeout::Timeout));
    registry.add(Arc::new(untimeout::Untimeout));
    registry.add(Arc::new(setnick::SetNick));
    registry.add(Arc::new(role::Role));
    registry.add(Arc::new(purge::Purge));
    registry.add(Arc::new(echo::Echo));
    registry.add(Arc::new(setlog::SetLog));
    registry.add(Arc::new(logchannel::LogChannel));
    registry.add(Arc::new(setwelcome::SetWelcome));
    registry.add(Arc::new(trigger::AddTrigger));
    registry.add(Arc::new(trigger::RemoveTrigger));
    registry.add(Arc::new(trigger::ListTriggers));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_is_registered_once() {
        let registry = registry();
        assert_eq!(registry.len(), 21);
        for name in [
            "ping",
            "help",
            "info",
            "avatar",
            "userinfo",
            "serverinfo",
            "ban",
            "kick",
            "unban",
            "timeout",
            "untimeout",
            "setnick",
            "role",
            "purge",
            "echo",
            "setlog",
            "logchannel",
            "setwelcome",
            "addtrigger",
            "removetrigger",
            "listtriggers",
        ] {
            assert!(registry.get(name).is_some(), "missing command: {}", name);
        }
    }

    #[test]
    fn only_ping_carries_a_cooldown() {
        let registry = registry();
        let ping = registry.get("ping").expect("ping registered");
        assert_eq!(ping.cooldown_secs(), 10);
        let ban = registry.get("ban").expect("ban registered");
        assert_eq!(ban.cooldown_secs(), 0);
    }
}
