use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_database::impls::warnings::clear_warnings;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "clearwarnings",
    desc: "Clear every warning for a user.",
    category: "moderation",
    usage: "!clearwarnings <user>",
};

#[poise::command(prefix_command, slash_command, category = "Moderation", user_cooldown = 5)]
pub async fn clearwarnings(
    ctx: Context<'_>,
    #[description = "The user whose warnings to clear"] user: Option<serenity::User>,
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

    let removed = clear_warnings(&ctx.data().db, guild_id.get(), user.id.get()).await?;
    if removed == 0 {
        ctx.say(format!("<@{}> has no warnings to clear.", user.id.get()))
            .await?;
        return Ok(());
    }

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new(
            "clear_warnings",
            ModLogTarget::User(user.id.get()),
            Some(ctx.author().id.get()),
            &format!("{removed} warning(s) cleared"),
        ),
    )
    .await;

    ctx.say(format!(
        "Cleared {} warning(s) for <@{}>.",
        removed,
        user.id.get()
    ))
    .await?;
    Ok(())
}
