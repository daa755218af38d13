use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{NO_REASON, guild_only_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::formatting::escape_mentions;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "lockdown",
    desc: "Stop @everyone from sending messages in this channel.",
    category: "moderation",
    usage: "!lockdown [reason]",
};

/// Allow/deny pair of an `@everyone` overwrite.
pub(crate) type OverwritePair = (serenity::Permissions, serenity::Permissions);

pub(crate) fn is_locked(existing: Option<OverwritePair>) -> bool {
    existing.is_some_and(|(_, deny)| deny.contains(serenity::Permissions::SEND_MESSAGES))
}

const NO_OVERWRITE: OverwritePair = (serenity::Permissions::empty(), serenity::Permissions::empty());

pub(crate) fn locked_overwrite(existing: Option<OverwritePair>) -> OverwritePair {
    let (allow, deny) = existing.unwrap_or(NO_OVERWRITE);
    (
        allow - serenity::Permissions::SEND_MESSAGES,
        deny | serenity::Permissions::SEND_MESSAGES,
    )
}

/// `None` when nothing is left and the overwrite should be removed.
pub(crate) fn unlocked_overwrite(existing: Option<OverwritePair>) -> Option<OverwritePair> {
    let (allow, deny) = existing.unwrap_or(NO_OVERWRITE);
    let deny = deny - serenity::Permissions::SEND_MESSAGES;
    (!allow.is_empty() || !deny.is_empty()).then_some((allow, deny))
}

/// Current `@everyone` overwrite on `channel_id`, if any.
pub(crate) async fn everyone_overwrite(
    ctx: &Context<'_>,
    guild_id: serenity::GuildId,
    channel_id: serenity::ChannelId,
) -> Result<Option<OverwritePair>, Error> {
    let everyone = serenity::RoleId::new(guild_id.get());
    let channel = channel_id.to_channel(ctx.http()).await?;
    let Some(channel) = channel.guild() else {
        return Ok(None);
    };

    Ok(channel
        .permission_overwrites
        .iter()
        .find(|overwrite| overwrite.kind == serenity::PermissionOverwriteType::Role(everyone))
        .map(|overwrite| (overwrite.allow, overwrite.deny)))
}

#[poise::command(prefix_command, slash_command, category = "Moderation", channel_cooldown = 10)]
pub async fn lockdown(
    ctx: Context<'_>,
    #[description = "Reason for the lockdown"] #[rest] reason: Option<String>,
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
    if is_locked(existing) {
        ctx.say("This channel is already locked down.").await?;
        return Ok(());
    }

    let (allow, deny) = locked_overwrite(existing);
    let overwrite = serenity::PermissionOverwrite {
        allow,
        deny,
        kind: serenity::PermissionOverwriteType::Role(serenity::RoleId::new(guild_id.get())),
    };
    if let Err(source) = channel_id.create_permission(ctx.http(), overwrite).await {
        error!(?source, channel_id = %channel_id, "lockdown overwrite failed");
        ctx.say("I couldn't lock this channel. I may lack 'Manage Channels'.")
            .await?;
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| NO_REASON.to_owned());
    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new("channel_lockdown", ModLogTarget::Channel(channel_id.get()), Some(ctx.author().id.get()), &reason),
    )
    .await;

    ctx.say(format!(
        "🔒 Channel locked down by <@{}> for: {}",
        ctx.author().id.get(),
        escape_mentions(&reason)
    ))
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::Permissions;

    use super::{is_locked, locked_overwrite, unlocked_overwrite};

    #[test]
    fn lock_then_unlock_restores_other_bits() {
        let existing = Some((Permissions::ADD_REACTIONS | Permissions::SEND_MESSAGES, Permissions::empty()));
        assert!(!is_locked(existing));

        let locked = locked_overwrite(existing);
        assert!(is_locked(Some(locked)));
        assert!(!locked.0.contains(Permissions::SEND_MESSAGES));
        assert!(locked.0.contains(Permissions::ADD_REACTIONS));

        let unlocked = unlocked_overwrite(Some(locked)).unwrap();
        assert_eq!(unlocked, (Permissions::ADD_REACTIONS, Permissions::empty()));
    }

    #[test]
    fn empty_overwrite_is_removed_on_unlock() {
        assert!(!is_locked(None));
        let locked = locked_overwrite(None);
        assert_eq!(unlocked_overwrite(Some(locked)), None);
    }
}
