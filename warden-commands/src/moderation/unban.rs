use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    NO_REASON, action_failure_message, guild_only_message, moderation_action_embed,
    moderation_bot_target_message, target_profile_from_user, usage_message,
};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "unban",
    desc: "Unban a user from the server.",
    category: "moderation",
    usage: "!unban <user id> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation", user_cooldown = 5)]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "The user to unban (id or mention)"] user: Option<serenity::User>,
    #[description = "Reason for the unban"]
    #[rest]
    reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::BAN_MEMBERS).await? {
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if user.bot {
        ctx.say(moderation_bot_target_message()).await?;
        return Ok(());
    }

    let is_banned = matches!(guild_id.get_ban(ctx.http(), user.id).await, Ok(Some(_)));
    if !is_banned {
        ctx.say("That user is not currently banned in this server.")
            .await?;
        return Ok(());
    }

    if let Err(source) = guild_id.unban(ctx.http(), user.id).await {
        error!(?source, user_id = %user.id, "unban request failed");
        ctx.say(action_failure_message("unban", &source)).await?;
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| NO_REASON.to_owned());
    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new("unban", ModLogTarget::User(user.id.get()), Some(ctx.author().id.get()), &reason),
    )
    .await;

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(&target_profile, user.id, "unbanned", Some(&reason), None);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
