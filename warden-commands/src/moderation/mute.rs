use tracing::{error, info};

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::checks::{ensure_valid_target, find_muted_role};
use crate::moderation::embeds::{
    MUTED_ROLE_NAME, NO_REASON, action_failure_message, guild_only_message,
    moderation_action_embed, notify_moderation_target, target_profile_from_user, usage_message,
};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_database::impls::scheduled::{cancel_unmute, schedule_unmute};
use warden_utils::formatting::format_compact_duration;
use warden_utils::parse::parse_duration_seconds;
use warden_utils::permissions::ensure_author_permission;
use warden_utils::time::now_unix_secs;

pub const META: CommandMeta = CommandMeta {
    name: "mute",
    desc: "Give a user the Muted role for a while.",
    category: "moderation",
    usage: "!mute <user> <duration> [reason]",
};

const MAX_MUTE_SECONDS: u64 = 28 * 86_400;

#[poise::command(prefix_command, slash_command, category = "Moderation", user_cooldown = 5)]
pub async fn mute(
    ctx: Context<'_>,
    #[description = "The user to mute"] user: Option<serenity::User>,
    #[description = "Duration, e.g. 10m, 2h, 1d"] duration: Option<String>,
    #[description = "Reason for the mute"] #[rest] reason: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_ROLES).await? {
        return Ok(());
    }

    let (Some(user), Some(duration)) = (user, duration) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some(seconds) = parse_duration_seconds(&duration).filter(|secs| *secs <= MAX_MUTE_SECONDS)
    else {
        ctx.say("Provide a duration between 1s and 28d, e.g. `10m`, `2h` or `1d`.")
            .await?;
        return Ok(());
    };

    if !ensure_valid_target(&ctx, "mute", &user).await? {
        return Ok(());
    }

    let Some(role_id) = find_muted_role(ctx.http(), guild_id).await? else {
        ctx.say(format!(
            "The '{MUTED_ROLE_NAME}' role was not found. Create it and deny 'Send Messages' in every channel."
        ))
        .await?;
        return Ok(());
    };

    let member = guild_id.member(ctx.http(), user.id).await?;
    if member.roles.contains(&role_id) {
        ctx.say(format!("<@{}> is already muted.", user.id.get()))
            .await?;
        return Ok(());
    }

    let reason = reason.unwrap_or_else(|| NO_REASON.to_owned());

    // Store the unmute before the role goes on, so a failed write never leaves a permanent mute.
    let db = &ctx.data().db;
    let due_at = now_unix_secs() + seconds;
    let task_id = schedule_unmute(
        db,
        due_at,
        guild_id.get(),
        user.id.get(),
        role_id.get(),
        ctx.channel_id().get(),
    )
    .await?;

    if let Err(source) = ctx
        .http()
        .add_member_role(guild_id, user.id, role_id, Some(&reason))
        .await
    {
        error!(?source, user_id = %user.id, "mute role assignment failed");
        if let Err(cleanup) = cancel_unmute(db, guild_id.get(), user.id.get()).await {
            error!(source = ?cleanup, task_id, "failed to drop unmute for failed mute");
        }
        ctx.say(action_failure_message("mute", &source)).await?;
        return Ok(());
    }
    info!(task_id, user_id = %user.id, due_at, "scheduled automatic unmute");

    let duration_label = format_compact_duration(seconds);
    notify_moderation_target(
        ctx.http(),
        user.id,
        guild_id,
        "muted",
        Some(&reason),
        Some(&duration_label),
    )
    .await;

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new("mute", ModLogTarget::User(user.id.get()), Some(ctx.author().id.get()), &reason)
            .with_duration(seconds),
    )
    .await;

    let target_profile = target_profile_from_user(&user);
    let embed = moderation_action_embed(
        &target_profile,
        user.id,
        "muted",
        Some(&reason),
        Some(&duration_label),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
