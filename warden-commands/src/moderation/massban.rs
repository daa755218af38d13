use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::guild_only_message;
use crate::moderation::mass::{MassAction, run_mass_action};
use warden_core::{Context, Error};
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "massban",
    desc: "Ban several users at once.",
    category: "moderation",
    usage: "!massban <user> [user...] [reason]",
};

#[poise::command(prefix_command, slash_command, category = "Moderation", guild_cooldown = 30)]
pub async fn massban(
    ctx: Context<'_>,
    #[description = "User mentions or ids, then an optional reason"]
    #[rest]
    targets: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::BAN_MEMBERS).await? {
        return Ok(());
    }

    run_mass_action(ctx, guild_id, MassAction::Ban, META.usage, targets).await
}
