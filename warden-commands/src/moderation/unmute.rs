use tracing::{error, info};

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::checks::find_muted_role;
use crate::moderation::embeds::{
    MUTED_ROLE_NAME, NO_REASON, action_failure_message, guild_only_message,
    moderation_action_embed, notify_moderation_target, target_profile_from_user, usage_message,
};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_database::impls::scheduled::cancel_unmute;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "unmute",
    desc: "Remove the Muted role from a user.",
    category: "moderation",
    usage: "!unmute <user> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation", user_cooldown = 5)]
pub async fn unmute(
    ctx: Context<'_>,
    #[description = "The user to unmute"] user: Option<serenity::User>,
    #[description = "Reason for the unmute"] #[rest] reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_ROLES).await? {
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some(role_id) = find_muted_role(ctx.http(), guild_id).await? else {
        ctx.say(format!("The '{MUTED_ROLE_NAME}' role was not found."))
            .await?;
        return Ok(());
    };

    let member = guild_id.member(ctx.http(), user.id).await?;
    if !member.roles.contains(&role_id) {
        ctx.say(format!("<@{}> is not currently muted.", user.id.get()))
            .await?;
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| NO_REASON.to_owned());

    if let Err(source) = ctx
        .http()
        .remove_member_role(guild_id, user.id, role_id, Some(&reason))
        .await
    {
        error!(?source, user_id = %user.id, "unmute role removal failed");
        ctx.say(action_failure_message("unmute", &source)).await?;
        return Ok(());
    }

    let cancelled = cancel_unmute(&ctx.data().db, guild_id.get(), user.id.get()).await?;
    if cancelled > 0 {
        info!(user_id = %user.id, cancelled, "cancelled pending automatic unmute");
    }

    notify_moderation_target(ctx.http(), user.id, guild_id, "unmuted", Some(&reason), None).await;

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new("unmute", ModLogTarget::User(user.id.get()), Some(ctx.author().id.get()), &reason),
    )
    .await;

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(&target_profile, user.id, "unmuted", Some(&reason), None);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
