mod ai;
mod commands;
mod config;
mod db;
mod dispatch;
mod embeds;
mod error;
mod logmirror;
mod member;
mod slash;
mod store;
mod timeutil;
mod triggers;

use std::collections::HashMap;
use std::sync::Arc;

use serenity::async_trait;
use serenity::client::{Client, Context, EventHandler};
use serenity::model::application::interaction::Interaction;
use serenity::model::channel::Message;
use serenity::model::event::MessageUpdateEvent;
use serenity::model::gateway::{Activity, Ready};
use serenity::model::guild::Member;
use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};
use serenity::prelude::{GatewayIntents, TypeMapKey};
use tokio::signal;

use dispatch::{Dispatcher, MessageOutcome};

// TypeMap key for the SQLite prefix registry
pub struct PrefixStoreKey;
impl TypeMapKey for PrefixStoreKey {
    type Value = db::PrefixStore;
}

// TypeMap key for the keyword auto-responder store
pub struct TriggerStoreKey;
impl TypeMapKey for TriggerStoreKey {
    type Value = store::TriggerStore;
}

// TypeMap key for the per-guild log channel preference
pub struct LogChannelStoreKey;
impl TypeMapKey for LogChannelStoreKey {
    type Value = store::ChannelStore;
}

// TypeMap key for the per-guild welcome channel preference
pub struct WelcomeChannelStoreKey;
impl TypeMapKey for WelcomeChannelStoreKey {
    type Value = store::ChannelStore;
}

// TypeMap key for the chat-completions client; absent when no API key is
// configured
pub struct AiClientKey;
impl TypeMapKey for AiClientKey {
    type Value = Arc<ai::AiClient>;
}

// TypeMap key for per-user AI conversation history
pub struct AiHistoryKey;
impl TypeMapKey for AiHistoryKey {
    type Value = HashMap<UserId, ai::UserHistory>;
}

struct Handler {
    dispatcher: Dispatcher,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        println!("✅ Bot connected as {}!", ready.user.name);
        println!("📊 Connected to {} guilds", ready.guilds.len());

        let status = format!("{}help for commands", self.dispatcher.default_prefix());
        ctx.set_activity(Activity::watching(status)).await;

        if let Err(e) =
            slash::register_with_discord(&ctx.http, self.dispatcher.slash_commands()).await
        {
            log::error!("❌ Failed to register slash commands: {}", e);
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        match self.dispatcher.dispatch_message(&ctx, &msg).await {
            MessageOutcome::Dispatched | MessageOutcome::Unroutable => {}
            // plain chatter may still hit a keyword trigger
            MessageOutcome::NotACommand => triggers::respond(&ctx, &msg).await,
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            self.dispatcher.dispatch_interaction(&ctx, &command).await;
        }
    }

    async fn message_delete(
        &self,
        ctx: Context,
        channel_id: ChannelId,
        message_id: MessageId,
        guild_id: Option<GuildId>,
    ) {
        logmirror::message_deleted(&ctx, channel_id, message_id, guild_id).await;
    }

    async fn message_update(
        &self,
        ctx: Context,
        old: Option<Message>,
        new: Option<Message>,
        _event: MessageUpdateEvent,
    ) {
        logmirror::message_edited(&ctx, old, new).await;
    }

    async fn guild_member_update(&self, ctx: Context, old: Option<Member>, new: Member) {
        logmirror::member_updated(&ctx, old, new).await;
    }

    async fn guild_member_addition(&self, ctx: Context, member: Member) {
        logmirror::member_joined(&ctx, &member).await;
    }
}

#[tokio::main]
async fn main() {
    // Initialize logger - must be done before any logging calls
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error"))
        .format_timestamp_secs()
        .init();

    let config = match config::BotConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("Create a botconfig.txt in the project root with: DISCORD_TOKEN=your_token_here and PREFIX=$");
            return;
        }
    };
    println!("🤖 Starting bot with prefix: '{}'", config.prefix);

    let prefix_store = match db::PrefixStore::open("data/bot.db").await {
        Ok(store) => store,
        Err(e) => {
            log::error!("❌ Failed to open prefix database: {}", e);
            eprintln!("❌ Failed to open prefix database: {}", e);
            return;
        }
    };

    let dispatcher = Dispatcher::new(
        config.prefix.clone(),
        commands::registry(),
        slash::registry(),
    );

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_BANS;

    let mut client = match Client::builder(&config.token, intents)
        .event_handler(Handler { dispatcher })
        .await
    {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Error creating Discord client: {:?}", e);
            eprintln!("❌ Error creating Discord client: {:?}", e);
            eprintln!("Check your token in botconfig.txt");
            return;
        }
    };

    {
        let mut data = client.data.write().await;
        data.insert::<PrefixStoreKey>(prefix_store);
        data.insert::<TriggerStoreKey>(store::TriggerStore::open("data/triggers.json"));
        data.insert::<LogChannelStoreKey>(store::ChannelStore::open("data/log-channels.json"));
        data.insert::<WelcomeChannelStoreKey>(store::ChannelStore::open(
            "data/welcome-channels.json",
        ));
        data.insert::<AiHistoryKey>(HashMap::new());
        match config.groq_api_key {
            Some(api_key) => {
                data.insert::<AiClientKey>(Arc::new(ai::AiClient::new(
                    api_key,
                    config.groq_model.clone(),
                )));
                println!("🧠 AI command enabled (model: {})", config.groq_model);
            }
            None => println!("⚠️  GROQ_API_KEY not set, the /ai command is disabled"),
        }
    }

    println!("🚀 Bot is running... press Ctrl+C to stop");
    tokio::select! {
        _ = signal::ctrl_c() => {
            println!("\n⏹️ Stopping bot gracefully...");
        }
        result = client.start() => {
            if let Err(why) = result {
                log::error!("❌ Client error: {:?}", why);
                eprintln!("❌ Client error: {:?}", why);
            }
        }
    }

    println!("✅ Bot stopped");
}
