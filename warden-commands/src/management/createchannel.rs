use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "createchannel",
    desc: "Create a text or voice channel.",
    category: "management",
    usage: "!createchannel <text|voice> <name>",
};

pub(crate) fn parse_channel_kind(raw: &str) -> Option<serenity::ChannelType> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "text" => Some(serenity::ChannelType::Text),
        "voice" => Some(serenity::ChannelType::Voice),
        _ => None,
    }
}

#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 10)]
pub async fn createchannel(
    ctx: Context<'_>,
    #[description = "text or voice"] kind: Option<String>,
    #[description = "Channel name"]
    #[rest]
    name: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_CHANNELS).await? {
        return Ok(());
    }

    let (Some(kind), Some(name)) = (kind, name.filter(|name| !name.trim().is_empty())) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some(kind) = parse_channel_kind(&kind) else {
        ctx.say("Invalid channel type. Please specify 'text' or 'voice'.")
            .await?;
        return Ok(());
    };

    let name = name.trim();
    let channels = guild_id.channels(ctx.http()).await?;
    if channels
        .values()
        .any(|channel| channel.name.eq_ignore_ascii_case(name))
    {
        ctx.say(format!("A channel named '{name}' already exists."))
            .await?;
        return Ok(());
    }

    let audit_reason = format!("Channel created by {}", ctx.author().name);
    let builder = serenity::CreateChannel::new(name)
        .kind(kind)
        .audit_log_reason(&audit_reason);
    let channel = match guild_id.create_channel(ctx.http(), builder).await {
        Ok(channel) => channel,
        Err(source) => {
            error!(?source, "channel creation failed");
            ctx.say("I couldn't create that channel. I may lack 'Manage Channels'.")
                .await?;
            return Ok(());
        }
    };

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new(
            "channel_created",
            ModLogTarget::Channel(channel.id.get()),
            Some(ctx.author().id.get()),
            "Channel created",
        ),
    )
    .await;

    ctx.say(format!("Created channel <#{}>.", channel.id.get()))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::parse_channel_kind;

    #[test]
    fn channel_kinds() {
        assert_eq!(parse_channel_kind("Text"), Some(serenity::ChannelType::Text));
        assert_eq!(parse_channel_kind(" voice "), Some(serenity::ChannelType::Voice));
        assert_eq!(parse_channel_kind("stage"), None);
    }
}
