use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::checks::ensure_valid_target;
use crate::moderation::embeds::{
    NO_REASON, guild_only_message, moderation_action_embed, notify_moderation_target,
    target_profile_from_user, usage_message,
};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_database::impls::warnings::record_warning;
use warden_utils::permissions::ensure_author_permission;
use warden_utils::time::now_unix_secs;

pub const META: CommandMeta = CommandMeta {
    name: "warn",
    desc: "Issue a warning to a user.",
    category: "moderation",
    usage: "!warn <user> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation", user_cooldown = 3)]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "The user to warn"] user: Option<serenity::User>,
    #[description = "Reason for warning"] #[rest] reason: Option<String>,
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

    if !ensure_valid_target(&ctx, "warn", &user).await? {
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| NO_REASON.to_owned());
    let warning = record_warning(
        &ctx.data().db,
        guild_id.get(),
        user.id.get(),
        ctx.author().id.get(),
        &reason,
        now_unix_secs(),
    )
    .await?;

    notify_moderation_target(ctx.http(), user.id, guild_id, "warned", Some(&reason), None).await;

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new("warn", ModLogTarget::User(user.id.get()), Some(ctx.author().id.get()), &reason),
    )
    .await;

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(&target_profile, user.id, "warned", Some(&reason), None)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "They now have {} warning(s).",
            warning.warn_number
        )));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
