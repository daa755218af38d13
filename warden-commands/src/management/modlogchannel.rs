use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use warden_core::{Context, Error};
use warden_database::impls::modlog_config::{
    clear_modlog_channel_id, get_modlog_channel_id, set_modlog_channel_id,
};
use warden_utils::parse::parse_channel_id;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "modlogchannel",
    desc: "Set or view the moderation log channel.",
    category: "management",
    usage: "!modlogchannel [#channel|channel_id|clear]",
};

#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 10)]
pub async fn modlogchannel(
    ctx: Context<'_>,
    #[description = "Channel mention/id, or 'clear'"]
    #[rest]
    input: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_GUILD).await? {
        return Ok(());
    }

    let db = &ctx.data().db;

    if let Some(input) = input
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    {
        if input.eq_ignore_ascii_case("clear") {
            clear_modlog_channel_id(db, guild_id.get()).await?;
            ctx.say("Modlog channel cleared.").await?;
            return Ok(());
        }

        let Some(channel_id) = parse_channel_id(input) else {
            ctx.say("Provide a valid channel mention/id, or `clear`.")
                .await?;
            return Ok(());
        };

        let belongs_here = guild_id
            .channels(ctx.http())
            .await?
            .contains_key(&serenity::ChannelId::new(channel_id));
        if !belongs_here {
            ctx.say("That channel isn't in this server.").await?;
            return Ok(());
        }

        set_modlog_channel_id(db, guild_id.get(), channel_id).await?;
        ctx.say(format!("Modlog channel set to <#{}>.", channel_id))
            .await?;
        return Ok(());
    }

    match get_modlog_channel_id(db, guild_id.get()).await {
        Some(channel_id) => {
            ctx.say(format!("Current modlog channel: <#{}>", channel_id))
                .await?;
        }
        None => {
            ctx.say("No modlog channel configured.").await?;
        }
    }

    Ok(())
}
