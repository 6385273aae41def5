// db.rs - SQLite-backed per-guild prefix registry

use serenity::model::id::GuildId;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use crate::error::{BotError, BotResult};

pub const MAX_PREFIX_LENGTH: usize = 10;
pub const MAX_PREFIX_AMOUNT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// UNIQUE(guild_id, prefix) violation.
    Duplicate,
}

#[derive(Debug, Clone)]
pub struct PrefixRow {
    pub prefix: String,
    pub enabled: bool,
}

#[derive(Clone)]
pub struct PrefixStore {
    pool: SqlitePool,
}

impl PrefixStore {
    pub async fn open(path: &str) -> BotResult<Self> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    /// Private in-memory database, used by tests.
    pub async fn open_in_memory() -> BotResult<Self> {
        // a single connection, otherwise each pooled connection would get
        // its own empty memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> BotResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS prefixes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                guild_id TEXT NOT NULL,
                prefix TEXT NOT NULL,
                enabled INTEGER DEFAULT 1,
                created_at INTEGER DEFAULT (strftime('%s', 'now')),
                UNIQUE(guild_id, prefix)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// The enabled prefixes for a guild, in creation order.
    pub async fn enabled_prefixes(&self, guild_id: GuildId) -> BotResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT prefix FROM prefixes WHERE guild_id = ? AND enabled = 1 ORDER BY created_at",
        )
        .bind(guild_id.0.to_string())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(|row| row.get("prefix")).collect())
    }

    /// Every prefix for a guild with its enabled flag, in creation order.
    pub async fn list(&self, guild_id: GuildId) -> BotResult<Vec<PrefixRow>> {
        let rows = sqlx::query(
            "SELECT prefix, enabled FROM prefixes WHERE guild_id = ? ORDER BY created_at",
        )
        .bind(guild_id.0.to_string())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|row| PrefixRow {
                prefix: row.get("prefix"),
                enabled: row.get::<i64, _>("enabled") != 0,
            })
            .collect())
    }

    pub async fn count(&self, guild_id: GuildId) -> BotResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prefixes WHERE guild_id = ?")
            .bind(guild_id.0.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn add(&self, guild_id: GuildId, prefix: &str) -> BotResult<AddOutcome> {
        let result = sqlx::query("INSERT INTO prefixes (guild_id, prefix) VALUES (?, ?)")
            .bind(guild_id.0.to_string())
            .bind(prefix)
            .execute(&self.pool)
            .await;
        match result {
            Ok(_) => Ok(AddOutcome::Added),
            Err(sqlx::Error::Database(db)) if db.message().contains("UNIQUE constraint") => {
                Ok(AddOutcome::Duplicate)
            }
            Err(e) => Err(BotError::Database(e)),
        }
    }

    /// Returns false when the prefix did not exist.
    pub async fn remove(&self, guild_id: GuildId, prefix: &str) -> BotResult<bool> {
        let result = sqlx::query("DELETE FROM prefixes WHERE guild_id = ? AND prefix = ?")
            .bind(guild_id.0.to_string())
            .bind(prefix)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flips the enabled flag; `None` when the prefix does not exist,
    /// otherwise the new state.
    pub async fn toggle(&self, guild_id: GuildId, prefix: &str) -> BotResult<Option<bool>> {
        let row = sqlx::query("SELECT enabled FROM prefixes WHERE guild_id = ? AND prefix = ?")
            .bind(guild_id.0.to_string())
            .bind(prefix)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let new_state = row.get::<i64, _>("enabled") == 0;

        sqlx::query("UPDATE prefixes SET enabled = ? WHERE guild_id = ? AND prefix = ?")
            .bind(i64::from(new_state))
            .bind(guild_id.0.to_string())
            .bind(prefix)
            .execute(&self.pool)
            .await?;
        Ok(Some(new_state))
    }

    /// Removes every prefix for a guild; returns how many were removed.
    pub async fn clear(&self, guild_id: GuildId) -> BotResult<u64> {
        let result = sqlx::query("DELETE FROM prefixes WHERE guild_id = ?")
            .bind(guild_id.0.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_list_remove_round_trip() {
        let store = PrefixStore::open_in_memory().await.expect("open");
        let guild = GuildId(1);

        assert_eq!(store.add(guild, "!").await.expect("add"), AddOutcome::Added);
        assert_eq!(store.add(guild, "?").await.expect("add"), AddOutcome::Added);
        assert_eq!(
            store.add(guild, "!").await.expect("dup add"),
            AddOutcome::Duplicate
        );

        assert_eq!(store.count(guild).await.expect("count"), 2);
        assert_eq!(
            store.enabled_prefixes(guild).await.expect("enabled"),
            vec!["!".to_string(), "?".to_string()]
        );

        assert!(store.remove(guild, "?").await.expect("remove"));
        assert!(!store.remove(guild, "?").await.expect("remove again"));
        assert_eq!(store.count(guild).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn toggle_flips_enabled_state() {
        let store = PrefixStore::open_in_memory().await.expect("open");
        let guild = GuildId(1);
        store.add(guild, "!").await.expect("add");

        assert_eq!(store.toggle(guild, "!").await.expect("toggle"), Some(false));
        assert!(store.enabled_prefixes(guild).await.expect("enabled").is_empty());

        assert_eq!(store.toggle(guild, "!").await.expect("toggle"), Some(true));
        assert_eq!(
            store.enabled_prefixes(guild).await.expect("enabled"),
            vec!["!".to_string()]
        );

        assert_eq!(store.toggle(guild, "?").await.expect("missing"), None);
    }

    #[tokio::test]
    async fn guilds_are_isolated_and_clear_works() {
        let store = PrefixStore::open_in_memory().await.expect("open");
        store.add(GuildId(1), "!").await.expect("add");
        store.add(GuildId(2), "?").await.expect("add");

        assert_eq!(store.clear(GuildId(1)).await.expect("clear"), 1);
        assert_eq!(store.count(GuildId(1)).await.expect("count"), 0);
        assert_eq!(store.count(GuildId(2)).await.expect("count"), 1);
    }
}
