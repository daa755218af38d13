use poise::serenity_prelude as serenity;

use crate::moderation::embeds::{MUTED_ROLE_NAME, target_refusal};
use warden_core::{Context, Error};

pub fn guild_owner_id(ctx: &Context<'_>) -> Option<serenity::UserId> {
    ctx.guild().map(|guild| guild.owner_id)
}

/// Reply and return `false` when `user` must not be targeted by `action`.
pub async fn ensure_valid_target(
    ctx: &Context<'_>,
    action: &str,
    user: &serenity::User,
) -> Result<bool, Error> {
    let refusal = target_refusal(
        action,
        ctx.author().id,
        guild_owner_id(ctx),
        user.id,
        user.bot,
    );

    if let Some(message) = refusal {
        ctx.say(message).await?;
        return Ok(false);
    }

    Ok(true)
}

/// Look up the guild's `Muted` role by name.
pub async fn find_muted_role(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
) -> Result<Option<serenity::RoleId>, serenity::Error> {
    let roles = guild_id.roles(http).await?;
    Ok(roles
        .values()
        .find(|role| role.name.eq_ignore_ascii_case(MUTED_ROLE_NAME))
        .map(|role| role.id))
}
