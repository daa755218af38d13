use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::gate::confirm_action;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::parse::parse_channel_id;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "deletechannel",
    desc: "Delete a channel.",
    category: "management",
    usage: "!deletechannel <#channel|channel id|name>",
};

#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 10)]
pub async fn deletechannel(
    ctx: Context<'_>,
    #[description = "Channel mention, id or exact name"]
    #[rest]
    channel: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_CHANNELS).await? {
        return Ok(());
    }

    let Some(query) = channel.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let channels = guild_id.channels(ctx.http()).await?;
    let found = match parse_channel_id(query) {
        Some(id) => channels.get(&serenity::ChannelId::new(id)),
        None => channels
            .values()
            .find(|channel| channel.name.eq_ignore_ascii_case(query)),
    };
    let Some(target) = found.cloned() else {
        ctx.say(format!("Channel '{query}' not found.")).await?;
        return Ok(());
    };

    let prompt = format!("Are you sure you want to delete the channel **{}**?", target.name);
    let Some(press) = confirm_action(ctx, "channel deletion", prompt, None).await? else {
        return Ok(());
    };

    if let Err(source) = target.id.delete(ctx.http()).await {
        error!(?source, channel_id = %target.id, "channel deletion failed");
        press
            .edit_response(
                ctx.http(),
                serenity::EditInteractionResponse::new()
                    .content("I couldn't delete that channel. I may lack 'Manage Channels'."),
            )
            .await?;
        return Ok(());
    }

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new(
            "channel_deleted",
            ModLogTarget::Channel(target.id.get()),
            Some(ctx.author().id.get()),
            &format!("Channel #{} deleted", target.name),
        ),
    )
    .await;

    // The prompt lived in the deleted channel.
    if target.id != ctx.channel_id() {
        press
            .edit_response(
                ctx.http(),
                serenity::EditInteractionResponse::new()
                    .content(format!("Deleted channel **{}**.", target.name)),
            )
            .await?;
    }
    Ok(())
}
