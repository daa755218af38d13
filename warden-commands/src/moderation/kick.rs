use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::checks::ensure_valid_target;
use crate::moderation::embeds::{
    NO_REASON, action_failure_message, guild_only_message, moderation_action_embed,
    notify_moderation_target, target_profile_from_user, usage_message,
};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "kick",
    desc: "Kick a user from the server.",
    category: "moderation",
    usage: "!kick <user> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation", user_cooldown = 5)]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "The user to kick"] user: Option<serenity::User>,
    #[description = "Reason for the kick"] #[rest] reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::KICK_MEMBERS).await? {
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if !ensure_valid_target(&ctx, "kick", &user).await? {
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| NO_REASON.to_owned());

    // DM first; a kicked user no longer shares a server with the bot.
    notify_moderation_target(ctx.http(), user.id, guild_id, "kicked", Some(&reason), None).await;

    if let Err(source) = guild_id.kick_with_reason(ctx.http(), user.id, &reason).await {
        error!(?source, user_id = %user.id, "kick request failed");
        ctx.say(action_failure_message("kick", &source)).await?;
        return Ok(());
    }

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new("kick", ModLogTarget::User(user.id.get()), Some(ctx.author().id.get()), &reason),
    )
    .await;

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(&target_profile, user.id, "kicked", Some(&reason), None);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
