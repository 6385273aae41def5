// store.rs - JSON-backed per-guild key-value stores
//
// Plain read-modify-write files, no locking: the single-process event loop
// makes concurrent writers rare enough to accept. An unreadable file is
// reset to "{}" so one corrupt write never wedges the feature.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serenity::model::id::{ChannelId, GuildId};

use crate::error::BotResult;

fn read_map<T: serde::de::DeserializeOwned + Default>(path: &Path) -> T {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return T::default(),
    };
    if content.trim().is_empty() {
        return T::default();
    }
    match serde_json::from_str(&content) {
        Ok(data) => data,
        Err(e) => {
            log::error!("[STORE] unreadable {}, resetting: {}", path.display(), e);
            if let Err(e) = fs::write(path, "{}") {
                log::error!("[STORE] failed to reset {}: {}", path.display(), e);
            }
            T::default()
        }
    }
}

fn write_map<T: serde::Serialize>(path: &Path, data: &T) -> BotResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}

/// guild id -> channel id, for the log and welcome channel preferences.
#[derive(Clone)]
pub struct ChannelStore {
    path: PathBuf,
}

impl ChannelStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `Some(channel)` sets the preference, `None` removes it.
    pub fn set(&self, guild_id: GuildId, channel_id: Option<ChannelId>) -> BotResult<()> {
        let mut data: HashMap<String, String> = read_map(&self.path);
        match channel_id {
            Some(channel_id) => {
                data.insert(guild_id.0.to_string(), channel_id.0.to_string());
            }
            None => {
                data.remove(&guild_id.0.to_string());
            }
        }
        write_map(&self.path, &data)
    }

    pub fn get(&self, guild_id: GuildId) -> Option<ChannelId> {
        let data: HashMap<String, String> = read_map(&self.path);
        data.get(&guild_id.0.to_string())
            .and_then(|id| id.parse::<u64>().ok())
            .map(ChannelId)
    }
}

/// guild id -> { trigger word -> response }.
#[derive(Clone)]
pub struct TriggerStore {
    path: PathBuf,
}

impl TriggerStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn add(&self, guild_id: GuildId, trigger: &str, response: &str) -> BotResult<()> {
        let mut data: HashMap<String, BTreeMap<String, String>> = read_map(&self.path);
        data.entry(guild_id.0.to_string())
            .or_default()
            .insert(trigger.to_lowercase(), response.to_string());
        write_map(&self.path, &data)
    }

    /// Returns false when the trigger did not exist.
    pub fn remove(&self, guild_id: GuildId, trigger: &str) -> BotResult<bool> {
        let mut data: HashMap<String, BTreeMap<String, String>> = read_map(&self.path);
        let key = guild_id.0.to_string();
        let Some(guild_triggers) = data.get_mut(&key) else {
            return Ok(false);
        };
        let removed = guild_triggers.remove(&trigger.to_lowercase()).is_some();
        if removed {
            if guild_triggers.is_empty() {
                data.remove(&key);
            }
            write_map(&self.path, &data)?;
        }
        Ok(removed)
    }

    pub fn all(&self, guild_id: GuildId) -> BTreeMap<String, String> {
        let data: HashMap<String, BTreeMap<String, String>> = read_map(&self.path);
        data.get(&guild_id.0.to_string()).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("castellan-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn channel_store_set_get_remove() {
        let path = temp_path("channels");
        let store = ChannelStore::open(&path);

        assert_eq!(store.get(GuildId(1)), None);

        store.set(GuildId(1), Some(ChannelId(42))).expect("set");
        assert_eq!(store.get(GuildId(1)), Some(ChannelId(42)));
        assert_eq!(store.get(GuildId(2)), None);

        store.set(GuildId(1), None).expect("unset");
        assert_eq!(store.get(GuildId(1)), None);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn trigger_store_round_trip() {
        let path = temp_path("triggers");
        let store = TriggerStore::open(&path);

        store.add(GuildId(1), "Hello", "hi there").expect("add");
        let triggers = store.all(GuildId(1));
        // trigger keys are stored lowercased
        assert_eq!(triggers.get("hello").map(String::as_str), Some("hi there"));

        assert!(store.remove(GuildId(1), "HELLO").expect("remove"));
        assert!(!store.remove(GuildId(1), "hello").expect("remove again"));
        assert!(store.all(GuildId(1)).is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_resets_to_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json at all").expect("write garbage");

        let store = TriggerStore::open(&path);
        assert!(store.all(GuildId(1)).is_empty());

        let _ = fs::remove_file(&path);
    }
}
