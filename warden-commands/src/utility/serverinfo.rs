use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use warden_core::{Context, Error};
use warden_utils::embed::DEFAULT_EMBED_COLOR;

pub const META: CommandMeta = CommandMeta {
    name: "serverinfo",
    desc: "Show information about this server.",
    category: "utility",
    usage: "!serverinfo",
};

fn boost_level(tier: serenity::PremiumTier) -> u8 {
    match tier {
        serenity::PremiumTier::Tier1 => 1,
        serenity::PremiumTier::Tier2 => 2,
        serenity::PremiumTier::Tier3 => 3,
        _ => 0,
    }
}

#[poise::command(
    prefix_command,
    slash_command,
    category = "Utility",
    aliases("guildinfo"),
    guild_cooldown = 5
)]
pub async fn serverinfo(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let guild = guild_id.to_partial_guild_with_counts(ctx.http()).await?;
    let channels = guild_id.channels(ctx.http()).await?;
    let text_channels = channels
        .values()
        .filter(|channel| channel.kind == serenity::ChannelType::Text)
        .count();
    let voice_channels = channels
        .values()
        .filter(|channel| channel.kind == serenity::ChannelType::Voice)
        .count();
    let created = guild_id.created_at().unix_timestamp();

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("Server Info: {}", guild.name))
        .color(DEFAULT_EMBED_COLOR)
        .field("ID", guild_id.get().to_string(), true)
        .field("Owner", format!("<@{}>", guild.owner_id.get()), true)
        .field(
            "Members",
            guild
                .approximate_member_count
                .map_or_else(|| "Unknown".to_owned(), |count| count.to_string()),
            true,
        )
        .field(
            "Channels",
            format!("{text_channels} Text, {voice_channels} Voice"),
            true,
        )
        .field("Roles", guild.roles.len().to_string(), true)
        .field("Server Created", format!("<t:{created}:f> (<t:{created}:R>)"), false)
        .field("Boost Level", boost_level(guild.premium_tier).to_string(), true)
        .field(
            "Boosts",
            guild.premium_subscription_count.unwrap_or(0).to_string(),
            true,
        );

    if let Some(icon_url) = guild.icon_url() {
        embed = embed.thumbnail(icon_url);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
