use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{NO_REASON, guild_only_message};
use crate::moderation::lockdown::{everyone_overwrite, is_locked, unlocked_overwrite};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::formatting::escape_mentions;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "unlock",
    desc: "Let @everyone send messages in this channel again.",
    category: "moderation",
    usage: "!unlock [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation", channel_cooldown = 10)]
pub async fn unlock(
    ctx: Context<'_>,
    #[description = "Reason for unlocking"] #[rest] reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_CHANNELS).await? {
        return Ok(());
    }

    let channel_id = ctx.channel_id();
    let existing = everyone_overwrite(&ctx, guild_id, channel_id).await?;
    if !is_locked(existing) {
        ctx.say("This channel is not currently locked down.").await?;
        return Ok(());
    }

    let everyone = serenity::PermissionOverwriteType::Role(serenity::RoleId::new(guild_id.get()));
    let result = match unlocked_overwrite(existing) {
        Some((allow, deny)) => {
            channel_id
                .create_permission(
                    ctx.http(),
                    serenity::PermissionOverwrite {
                        allow,
                        deny,
                        kind: everyone,
                    },
                )
                .await
        }
        None => channel_id.delete_permission(ctx.http(), everyone).await,
    };

    if let Err(source) = result {
        error!(?source, channel_id = %channel_id, "unlock overwrite failed");
        ctx.say("I couldn't unlock this channel. I may lack 'Manage Channels'.")
            .await?;
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| NO_REASON.to_owned());
    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new("channel_unlock", ModLogTarget::Channel(channel_id.get()), Some(ctx.author().id.get()), &reason),
    )
    .await;

    ctx.say(format!(
        "🔓 Channel unlocked by <@{}> for: {}",
        ctx.author().id.get(),
        escape_mentions(&reason)
    ))
    .await?;
    Ok(())
}
