// config.rs - Bot configuration loaded from botconfig.txt
//
// The config file uses KEY=VALUE lines; values are also exported as
// environment variables so either source works. Searched in several
// locations so the bot can run from the project root or a build directory.

use std::collections::HashMap;
use std::env;
use std::fs;

use crate::error::{BotError, BotResult};

const CONFIG_PATHS: [&str; 4] = [
    "botconfig.txt",
    "../botconfig.txt",
    "../../botconfig.txt",
    "src/botconfig.txt",
];

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub prefix: String,
    pub groq_api_key: Option<String>,
    pub groq_model: String,
}

impl BotConfig {
    pub fn load() -> BotResult<Self> {
        match load_config_file() {
            Ok(path) => println!("✅ Configuration loaded from {}", path),
            Err(e) => {
                // environment variables alone are fine for deployments
                log::warn!("no botconfig.txt found ({}), using environment only", e);
            }
        }

        let token = env::var("DISCORD_TOKEN").map_err(|_| {
            BotError::Config(
                "DISCORD_TOKEN not set; add it to botconfig.txt or the environment".to_string(),
            )
        })?;
        if token.is_empty() || token == "YOUR_BOT_TOKEN_HERE" {
            return Err(BotError::Config(
                "DISCORD_TOKEN is set to a placeholder value".to_string(),
            ));
        }

        let prefix = env::var("PREFIX").unwrap_or_else(|_| "$".to_string());
        let groq_api_key = env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty());
        let groq_model =
            env::var("GROQ_MODEL").unwrap_or_else(|_| crate::ai::DEFAULT_MODEL.to_string());

        Ok(BotConfig {
            token,
            prefix,
            groq_api_key,
            groq_model,
        })
    }
}

// Parse the first botconfig.txt found and export its keys as env vars.
// Returns the path that was used.
fn load_config_file() -> Result<&'static str, String> {
    for config_path in &CONFIG_PATHS {
        let content = match fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(_) => continue,
        };

        // Remove BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        let mut parsed = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(equals_pos) = line.find('=') {
                let key = line[..equals_pos].trim().to_string();
                let value = line[equals_pos + 1..].trim().to_string();
                env::set_var(&key, &value);
                parsed.insert(key, value);
            }
        }

        if parsed.is_empty() {
            log::warn!("{} contained no KEY=VALUE lines", config_path);
        }
        return Ok(config_path);
    }

    Err("no botconfig.txt in any expected location (., .., ../.., src/)".to_string())
}
