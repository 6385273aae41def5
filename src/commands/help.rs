// help.rs - Paged help menu

use async_trait::async_trait;
use serenity::client::Context;
use serenity::model::channel::Message;

use crate::dispatch::registry::PrefixCommand;
use crate::embeds;
use crate::error::CommandResult;

// (description, [(command, explanation)])
const PAGES: [(&str, &[(&str, &str)]); 5] = [
    (
        "Main Commands",
        &[
            ("help [page]", "Shows this menu of commands"),
            ("info", "Shows info about the bot"),
            ("ping", "Gets the ping of the bot"),
        ],
    ),
    (
        "Info Commands",
        &[
            ("avatar [user]", "Shows user avatar"),
            ("userinfo [user]", "Shows user info"),
            ("serverinfo", "Shows server info"),
        ],
    ),
    (
        "Moderation Commands",
        &[
            ("ban [user] [reason]", "Bans a user"),
            ("kick [user] [reason]", "Kicks a user"),
            ("unban [user]", "Unbans a user"),
            ("timeout [user] [duration] [reason]", "Timeouts a user"),
            ("untimeout [user]", "Removes timeout from a user"),
        ],
    ),
    (
        "Moderation Commands (extended)",
        &[
            ("setnick [user] [nickname]", "Changes nickname"),
            ("role [user] [role]", "Changes role of a user"),
            ("purge [amount]", "Purges messages"),
            ("echo [channel] [text]", "Echos a message in channel"),
        ],
    ),
    (
        "Logging & Triggers",
        &[
            ("setlog [channel]", "Sets, removes, or changes log channel"),
            ("logchannel", "Gets current log channel"),
            ("setwelcome [channel]", "Sets or removes the welcome channel"),
            ("addtrigger [word] [response]", "Adds an auto-response trigger"),
            ("removetrigger [word]", "Removes a trigger"),
            ("listtriggers", "Lists this server's triggers"),
        ],
    ),
];

pub struct Help;

#[async_trait]
impl PrefixCommand for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn usage(&self) -> &'static str {
        "help [page]"
    }

    async fn execute(&self, ctx: &Context, msg: &Message, args: &[String]) -> CommandResult {
        let page: usize = match args.first() {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if (1..=PAGES.len()).contains(&n) => n,
                _ => {
                    msg.reply(
                        &ctx.http,
                        format!(
                            "❌ That page doesn't exist, please give a page between 1 and {}",
                            PAGES.len()
                        ),
                    )
                    .await?;
                    return Ok(());
                }
            },
            None => 1,
        };

        let (description, entries) = PAGES[page - 1];
        let title = format!("Help Menu ({}/{})", page, PAGES.len());

        msg.channel_id
            .send_message(&ctx.http, |m| {
                m.reference_message(msg).embed(|e| {
                    let embed = embeds::base_embed(
                        e,
                        Some(&title),
                        Some(description),
                        embeds::INFO,
                        Some(&msg.author),
                    );
                    for (command, explanation) in entries {
                        embed.field(*command, *explanation, false);
                    }
                    embed
                })
            })
            .await?;
        Ok(())
    }
}
