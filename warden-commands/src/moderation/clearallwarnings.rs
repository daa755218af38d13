use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::gate::confirm_action;
use crate::moderation::embeds::guild_only_message;
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_database::impls::warnings::clear_guild_warnings;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "clearallwarnings",
    desc: "Clear every warning in this server.",
    category: "moderation",
    usage: "!clearallwarnings",
};

#[poise::command(prefix_command, slash_command, category = "Moderation", guild_cooldown = 30)]
pub async fn clearallwarnings(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::ADMINISTRATOR).await? {
        return Ok(());
    }

    let prompt = "Are you sure you want to clear **all** warnings for **every** member of this server? This cannot be undone.";
    let Some(press) = confirm_action(ctx, "clear all warnings", prompt, None).await? else {
        return Ok(());
    };

    let removed = clear_guild_warnings(&ctx.data().db, guild_id.get()).await?;

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new(
            "clear_all_warnings",
            ModLogTarget::Guild,
            Some(ctx.author().id.get()),
            &format!("{removed} warning(s) cleared server-wide"),
        ),
    )
    .await;

    press
        .edit_response(
            ctx.http(),
            serenity::EditInteractionResponse::new()
                .content(format!("Cleared {removed} warning(s) across the server.")),
        )
        .await?;
    Ok(())
}
