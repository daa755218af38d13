use tracing::{error, warn};

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
    name: "softban",
    desc: "Ban and immediately unban a user to wipe their recent messages.",
    category: "moderation",
    usage: "!softban <user> [days 0-7] [reason]",
};

const MAX_DELETE_DAYS: u8 = 7;

#[poise::command(prefix_command, slash_command, category = "Moderation", user_cooldown = 10)]
pub async fn softban(
    ctx: Context<'_>,
    #[description = "The user to softban"] user: Option<serenity::User>,
    #[description = "Days of messages to delete (0-7)"] days: Option<u8>,
    #[description = "Reason for the softban"] #[rest] reason: Option<String>,
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

    let days = days.unwrap_or(0);
    if days > MAX_DELETE_DAYS {
        ctx.say("Message deletion days must be between 0 and 7.").await?;
        return Ok(());
    }

    if !ensure_valid_target(&ctx, "softban", &user).await? {
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| NO_REASON.to_owned());

    let prompt = format!(
        "Are you sure you want to softban <@{}> (deleting {} day(s) of messages) for: `{}`?",
        user.id.get(),
        days,
        escape_mentions(&reason)
    );
    if confirm_action(ctx, "softban", prompt, None).await?.is_none() {
        return Ok(());
    }

    notify_moderation_target(ctx.http(), user.id, guild_id, "softbanned", Some(&reason), None).await;

    if let Err(source) = guild_id
        .ban_with_reason(ctx.http(), user.id, days, &reason)
        .await
    {
        error!(?source, user_id = %user.id, "softban ban request failed");
        ctx.say(action_failure_message("softban", &source)).await?;
        return Ok(());
    }

    if let Err(source) = guild_id.unban(ctx.http(), user.id).await {
        warn!(?source, user_id = %user.id, "softban left the user banned");
        ctx.say(format!(
            "<@{}> was banned but I couldn't lift the ban. Use `!unban {}` to finish.",
            user.id.get(),
            user.id.get()
        ))
        .await?;
    }

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new("softban", ModLogTarget::User(user.id.get()), Some(ctx.author().id.get()), &reason),
    )
    .await;

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(&target_profile, user.id, "softbanned", Some(&reason), None);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
