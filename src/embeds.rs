// embeds.rs - Shared embed palette and builder helper

use serenity::builder::CreateEmbed;
use serenity::model::timestamp::Timestamp;
use serenity::model::user::User;
use serenity::utils::Colour;

pub const SUCCESS: Colour = Colour(0x43b581);
pub const ERROR: Colour = Colour(0xf04747);
pub const INFO: Colour = Colour(0x616df0);

/// Applies the house style: colour, timestamp, optional title/description,
/// and a requester footer when a user is given.
pub fn base_embed<'a>(
    embed: &'a mut CreateEmbed,
    title: Option<&str>,
    description: Option<&str>,
    colour: Colour,
    user: Option<&User>,
) -> &'a mut CreateEmbed {
    embed.colour(colour).timestamp(Timestamp::now());
    if let Some(title) = title {
        embed.title(title);
    }
    if let Some(description) = description {
        embed.description(description);
    }
    if let Some(user) = user {
        let name = user.name.clone();
        let icon = user.face();
        embed.footer(|f| f.text(name).icon_url(icon));
    }
    embed
}
