use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "slowmode",
    desc: "Set the slowmode delay for this channel.",
    category: "moderation",
    usage: "!slowmode <seconds 0-21600>",
};

const MAX_SLOWMODE_SECONDS: u16 = 21_600;

#[poise::command(prefix_command, slash_command, category = "Moderation", channel_cooldown = 5)]
pub async fn slowmode(
    ctx: Context<'_>,
    #[description = "Delay in seconds (0 disables)"] seconds: Option<u16>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_CHANNELS).await? {
        return Ok(());
    }

    let Some(seconds) = seconds else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if seconds > MAX_SLOWMODE_SECONDS {
        ctx.say("Slowmode delay must be between 0 and 21600 seconds (6 hours).")
            .await?;
        return Ok(());
    }

    let channel_id = ctx.channel_id();
    if let Err(source) = channel_id
        .edit(ctx.http(), serenity::EditChannel::new().rate_limit_per_user(seconds))
        .await
    {
        error!(?source, channel_id = %channel_id, "slowmode edit failed");
        ctx.say("I couldn't change slowmode here. I may lack 'Manage Channels'.")
            .await?;
        return Ok(());
    }

    let (action, reason, reply) = if seconds == 0 {
        (
            "slowmode_disabled",
            "Slowmode disabled".to_owned(),
            "Slowmode has been disabled for this channel.".to_owned(),
        )
    } else {
        (
            "slowmode_enabled",
            format!("Slowmode set to {seconds}s"),
            format!("Slowmode set to {seconds} seconds for this channel."),
        )
    };

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new(action, ModLogTarget::Channel(channel_id.get()), Some(ctx.author().id.get()), &reason),
    )
    .await;

    ctx.say(reply).await?;
    Ok(())
}
