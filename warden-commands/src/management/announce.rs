use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::embed::info_embed;
use warden_utils::formatting::truncate_chars;
use warden_utils::parse::parse_channel_id;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "announce",
    desc: "Post an announcement embed in a channel.",
    category: "management",
    usage: "!announce <#channel> <message>",
};

const MAX_ANNOUNCEMENT_CHARS: usize = 4096;
const LOGGED_PREVIEW_CHARS: usize = 100;

pub(crate) fn announcement_embed(message: &str, author: &serenity::User) -> serenity::CreateEmbed {
    let footer = serenity::CreateEmbedFooter::new(format!("Announced by {}", author.display_name()))
        .icon_url(author.face());
    info_embed("📢 Announcement", truncate_chars(message, MAX_ANNOUNCEMENT_CHARS))
        .footer(footer)
        .timestamp(serenity::Timestamp::now())
}

pub(crate) fn announcement_log_reason(message: &str) -> String {
    format!("Message: {}", truncate_chars(message, LOGGED_PREVIEW_CHARS))
}

#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 15)]
pub async fn announce(
    ctx: Context<'_>,
    #[description = "Channel mention or id"] channel: Option<String>,
    #[description = "Announcement text"]
    #[rest]
    message: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_CHANNELS).await? {
        return Ok(());
    }

    let (Some(channel), Some(message)) = (
        channel,
        message.map(|raw| raw.trim().to_owned()).filter(|raw| !raw.is_empty()),
    ) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some(channel_id) = parse_channel_id(&channel) else {
        ctx.say("Provide a valid channel mention or id.").await?;
        return Ok(());
    };
    let channel_id = serenity::ChannelId::new(channel_id);

    let channels = guild_id.channels(ctx.http()).await?;
    let Some(target) = channels.get(&channel_id) else {
        ctx.say("That channel isn't in this server.").await?;
        return Ok(());
    };
    if !matches!(target.kind, serenity::ChannelType::Text | serenity::ChannelType::News) {
        ctx.say("Announcements can only go to text channels.").await?;
        return Ok(());
    }

    let embed = announcement_embed(&message, ctx.author());
    if let Err(source) = channel_id
        .send_message(ctx.http(), serenity::CreateMessage::new().embed(embed))
        .await
    {
        error!(?source, channel_id = %channel_id, "announcement failed");
        ctx.say("I couldn't post there. Check my permissions in that channel.")
            .await?;
        return Ok(());
    }

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new(
            "announcement",
            ModLogTarget::Channel(channel_id.get()),
            Some(ctx.author().id.get()),
            &announcement_log_reason(&message),
        ),
    )
    .await;

    ctx.say(format!("Announcement sent to <#{}>.", channel_id.get()))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::announcement_log_reason;

    #[test]
    fn log_reason_keeps_a_short_preview() {
        assert_eq!(announcement_log_reason("Server restart at 5"), "Message: Server restart at 5");

        let long = "a".repeat(250);
        let reason = announcement_log_reason(&long);
        assert_eq!(reason.chars().count(), "Message: ".len() + 100);
        assert!(reason.ends_with('…'));
    }
}
