use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::gate::confirm_action;
use crate::moderation::checks::ensure_valid_target;
use crate::moderation::embeds::{
    NO_REASON, action_failure_message, guild_only_message, moderation_action_embed,
    notify_moderation_target, target_profile_from_user, usage_message,
};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::formatting::escape_mentions;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "ban",
    desc: "Ban a user from the server.",
    category: "moderation",
    usage: "!ban <user> [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation", user_cooldown = 10)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "The user to ban"] user: Option<serenity::User>,
    #[description = "Reason for the ban"] #[rest] reason: Option<String>,
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

    if !ensure_valid_target(&ctx, "ban", &user).await? {
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| NO_REASON.to_owned());

    let prompt = format!(
        "Are you sure you want to ban <@{}> for: `{}`?",
        user.id.get(),
        escape_mentions(&reason)
    );
    if confirm_action(ctx, "ban", prompt, None).await?.is_none() {
        return Ok(());
    }

    notify_moderation_target(ctx.http(), user.id, guild_id, "banned", Some(&reason), None).await;

    if let Err(source) = guild_id
        .ban_with_reason(ctx.http(), user.id, 0, &reason)
        .await
    {
        error!(?source, user_id = %user.id, "ban request failed");
        ctx.say(action_failure_message("ban", &source)).await?;
        return Ok(());
    }

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new("ban", ModLogTarget::User(user.id.get()), Some(ctx.author().id.get()), &reason),
    )
    .await;

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(&target_profile, user.id, "banned", Some(&reason), None);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
