use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use warden_core::{Context, Error};
use warden_database::impls::automod::{
    add_keyword, get_automod_config, remove_keyword, set_channel_ignored, set_filter_enabled,
    set_role_ignored,
};
use warden_database::model::automod::{AutoModConfig, AutoModFilter};
use warden_utils::embed::DEFAULT_EMBED_COLOR;
use warden_utils::parse::{parse_channel_id, parse_role_id};
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "automod",
    desc: "Configure automatic message filtering.",
    category: "management",
    usage: "!automod <status|enable|disable|addword|removeword|ignorechannel|ignorerole|unignorechannel|unignorerole>",
};

fn filter_list() -> String {
    AutoModFilter::ALL
        .iter()
        .map(|filter| format!("`{filter}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_or_none(items: Vec<String>) -> String {
    if items.is_empty() {
        "None".to_owned()
    } else {
        items.join(", ")
    }
}

pub(crate) fn status_description(config: &AutoModConfig) -> String {
    let filters = AutoModFilter::ALL
        .iter()
        .map(|filter| {
            let mark = if config.is_enabled(*filter) { "✅" } else { "❌" };
            format!("{mark} `{filter}`")
        })
        .collect::<Vec<_>>()
        .join("\n");

    let channels = join_or_none(
        config
            .ignored_channels
            .iter()
            .map(|id| format!("<#{id}>"))
            .collect(),
    );
    let roles = join_or_none(
        config
            .ignored_roles
            .iter()
            .map(|id| format!("<@&{id}>"))
            .collect(),
    );

    format!(
        "**Status :** {}\n\n{}\n\n**Blocked words :** {}\n**Ignored channels :** {}\n**Ignored roles :** {}",
        if config.is_active() { "Active" } else { "Inactive" },
        filters,
        config.keywords.len(),
        channels,
        roles
    )
}

/// Run the shared guild + MANAGE_GUILD gate for every subcommand.
async fn guarded_guild(ctx: Context<'_>) -> Result<Option<serenity::GuildId>, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(None);
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_GUILD).await? {
        return Ok(None);
    }

    Ok(Some(guild_id))
}

async fn send_status(ctx: Context<'_>, guild_id: serenity::GuildId) -> Result<(), Error> {
    let config = get_automod_config(&ctx.data().db, guild_id.get()).await;
    let embed = serenity::CreateEmbed::new()
        .title("AutoMod Config")
        .description(status_description(&config))
        .color(DEFAULT_EMBED_COLOR)
        .footer(serenity::CreateEmbedFooter::new(
            "Subcommands: status, enable, disable, addword, removeword, ignorechannel, ignorerole, unignorechannel, unignorerole",
        ));

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Configure automatic message filtering.
#[poise::command(
    prefix_command,
    slash_command,
    category = "Management",
    subcommands(
        "status",
        "enable",
        "disable",
        "addword",
        "removeword",
        "ignorechannel",
        "ignorerole",
        "unignorechannel",
        "unignorerole"
    ),
    guild_cooldown = 5
)]
pub async fn automod(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = guarded_guild(ctx).await? else {
        return Ok(());
    };
    send_status(ctx, guild_id).await
}

/// Show which filters are active.
#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 5)]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = guarded_guild(ctx).await? else {
        return Ok(());
    };
    send_status(ctx, guild_id).await
}

async fn toggle_filter(ctx: Context<'_>, raw: Option<String>, enabled: bool) -> Result<(), Error> {
    let Some(guild_id) = guarded_guild(ctx).await? else {
        return Ok(());
    };

    let Some(filter) = raw.as_deref().and_then(|raw| raw.parse::<AutoModFilter>().ok()) else {
        ctx.say(format!("Pick one of: {}", filter_list())).await?;
        return Ok(());
    };

    let changed = set_filter_enabled(&ctx.data().db, guild_id.get(), filter, enabled).await?;
    let state = if enabled { "enabled" } else { "disabled" };
    if changed {
        ctx.say(format!("AutoMod filter `{filter}` is now **{state}**."))
            .await?;
    } else {
        ctx.say(format!("AutoMod filter `{filter}` was already {state}."))
            .await?;
    }
    Ok(())
}

/// Turn a filter on.
#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 5)]
pub async fn enable(
    ctx: Context<'_>,
    #[description = "keywords, invites, links, mentions or caps"] filter: Option<String>,
) -> Result<(), Error> {
    toggle_filter(ctx, filter, true).await
}

/// Turn a filter off.
#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 5)]
pub async fn disable(
    ctx: Context<'_>,
    #[description = "keywords, invites, links, mentions or caps"] filter: Option<String>,
) -> Result<(), Error> {
    toggle_filter(ctx, filter, false).await
}

/// Add a blocked word.
#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 5)]
pub async fn addword(
    ctx: Context<'_>,
    #[description = "Word or phrase to block"]
    #[rest]
    word: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = guarded_guild(ctx).await? else {
        return Ok(());
    };

    let Some(word) = word.filter(|word| !word.trim().is_empty()) else {
        ctx.say("Usage: `!automod addword <word>`").await?;
        return Ok(());
    };

    if add_keyword(&ctx.data().db, guild_id.get(), &word).await? {
        ctx.say("Word added to the blocklist.").await?;
    } else {
        ctx.say("That word is already blocked.").await?;
    }
    Ok(())
}

/// Remove a blocked word.
#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 5)]
pub async fn removeword(
    ctx: Context<'_>,
    #[description = "Word or phrase to unblock"]
    #[rest]
    word: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = guarded_guild(ctx).await? else {
        return Ok(());
    };

    let Some(word) = word.filter(|word| !word.trim().is_empty()) else {
        ctx.say("Usage: `!automod removeword <word>`").await?;
        return Ok(());
    };

    if remove_keyword(&ctx.data().db, guild_id.get(), &word).await? {
        ctx.say("Word removed from the blocklist.").await?;
    } else {
        ctx.say("That word wasn't on the blocklist.").await?;
    }
    Ok(())
}

async fn toggle_channel(ctx: Context<'_>, raw: Option<String>, ignored: bool) -> Result<(), Error> {
    let Some(guild_id) = guarded_guild(ctx).await? else {
        return Ok(());
    };

    let Some(channel_id) = raw.as_deref().and_then(parse_channel_id) else {
        ctx.say("Provide a channel mention or id.").await?;
        return Ok(());
    };

    let changed = set_channel_ignored(&ctx.data().db, guild_id.get(), channel_id, ignored).await?;
    let reply = match (ignored, changed) {
        (true, true) => format!("AutoMod will ignore <#{channel_id}>."),
        (true, false) => format!("<#{channel_id}> is already ignored."),
        (false, true) => format!("AutoMod will check <#{channel_id}> again."),
        (false, false) => format!("<#{channel_id}> wasn't ignored."),
    };
    ctx.say(reply).await?;
    Ok(())
}

async fn toggle_role(ctx: Context<'_>, raw: Option<String>, ignored: bool) -> Result<(), Error> {
    let Some(guild_id) = guarded_guild(ctx).await? else {
        return Ok(());
    };

    let Some(role_id) = raw.as_deref().and_then(parse_role_id) else {
        ctx.say("Provide a role mention or id.").await?;
        return Ok(());
    };

    let changed = set_role_ignored(&ctx.data().db, guild_id.get(), role_id, ignored).await?;
    let reply = match (ignored, changed) {
        (true, true) => format!("Members with <@&{role_id}> bypass AutoMod."),
        (true, false) => format!("<@&{role_id}> already bypasses AutoMod."),
        (false, true) => format!("<@&{role_id}> no longer bypasses AutoMod."),
        (false, false) => format!("<@&{role_id}> wasn't ignored."),
    };
    ctx.say(reply).await?;
    Ok(())
}

/// Skip AutoMod in a channel.
#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 5)]
pub async fn ignorechannel(
    ctx: Context<'_>,
    #[description = "Channel mention or id"] channel: Option<String>,
) -> Result<(), Error> {
    toggle_channel(ctx, channel, true).await
}

/// Check a channel again.
#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 5)]
pub async fn unignorechannel(
    ctx: Context<'_>,
    #[description = "Channel mention or id"] channel: Option<String>,
) -> Result<(), Error> {
    toggle_channel(ctx, channel, false).await
}

/// Let members with a role bypass AutoMod.
#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 5)]
pub async fn ignorerole(
    ctx: Context<'_>,
    #[description = "Role mention or id"] role: Option<String>,
) -> Result<(), Error> {
    toggle_role(ctx, role, true).await
}

/// Stop a role from bypassing AutoMod.
#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 5)]
pub async fn unignorerole(
    ctx: Context<'_>,
    #[description = "Role mention or id"] role: Option<String>,
) -> Result<(), Error> {
    toggle_role(ctx, role, false).await
}

#[cfg(test)]
mod tests {
    use warden_database::model::automod::{AutoModConfig, AutoModFilter};

    use super::status_description;

    #[test]
    fn status_lists_filters_and_ignores() {
        let mut config = AutoModConfig::default();
        config.enabled_filters.insert(AutoModFilter::Links);
        config.ignored_channels.insert(9);
        config.keywords.insert("spam".to_owned());

        let text = status_description(&config);
        assert!(text.starts_with("**Status :** Active"));
        assert!(text.contains("✅ `links`"));
        assert!(text.contains("❌ `caps`"));
        assert!(text.contains("**Blocked words :** 1"));
        assert!(text.contains("**Ignored channels :** <#9>"));
        assert!(text.contains("**Ignored roles :** None"));
    }
}
