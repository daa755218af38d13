use poise::serenity_prelude as serenity;

/// Resolve a member's effective guild-level permissions.
///
/// The guild owner gets every permission. Channel overwrites are not applied.
pub async fn resolve_user_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(serenity::Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;
    Ok(combine_role_permissions(
        guild_id,
        guild.roles.values(),
        &member.roles,
    ))
}

/// OR together `@everyone` and every role the member holds.
pub fn combine_role_permissions<'a>(
    guild_id: serenity::GuildId,
    roles: impl IntoIterator<Item = &'a serenity::Role>,
    member_roles: &[serenity::RoleId],
) -> serenity::Permissions {
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    roles
        .into_iter()
        .filter(|role| role.id == everyone_role_id || member_roles.contains(&role.id))
        .fold(serenity::Permissions::empty(), |acc, role| acc | role.permissions)
}

pub async fn has_user_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    required: serenity::Permissions,
) -> anyhow::Result<bool> {
    let perms = resolve_user_permissions(http, guild_id, user_id).await?;

    Ok(perms.contains(serenity::Permissions::ADMINISTRATOR) || perms.contains(required))
}

/// Check the invoking author for `required` and tell them when it is missing.
///
/// Returns `Ok(false)` after replying with the denial, so callers can simply
/// return.
pub async fn ensure_author_permission<U, E>(
    ctx: poise::Context<'_, U, E>,
    guild_id: serenity::GuildId,
    required: serenity::Permissions,
) -> anyhow::Result<bool>
where
    U: Send + Sync,
    E: Send + Sync,
{
    if has_user_permission(ctx.http(), guild_id, ctx.author().id, required).await? {
        return Ok(true);
    }

    ctx.say(permission_denied_message(required)).await?;
    Ok(false)
}

pub fn permission_denied_message(required: serenity::Permissions) -> String {
    format!(
        "You don't have permission to use this command. You need: `{}`",
        permission_names(required).join(", ")
    )
}

/// Convert a permission bitset into a sorted display list.
pub fn permission_names(perms: serenity::Permissions) -> Vec<String> {
    if perms.contains(serenity::Permissions::ADMINISTRATOR) {
        return vec!["ADMINISTRATOR".to_owned()];
    }

    let mut names: Vec<String> = perms
        .iter_names()
        .map(|(name, _flag)| name.to_owned())
        .collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::{permission_denied_message, permission_names};

    #[test]
    fn administrator_collapses_the_list() {
        let perms = serenity::Permissions::ADMINISTRATOR | serenity::Permissions::BAN_MEMBERS;
        assert_eq!(permission_names(perms), vec!["ADMINISTRATOR"]);
    }

    #[test]
    fn names_are_sorted() {
        let perms = serenity::Permissions::MANAGE_MESSAGES | serenity::Permissions::BAN_MEMBERS;
        assert_eq!(permission_names(perms), vec!["BAN_MEMBERS", "MANAGE_MESSAGES"]);
        assert!(permission_denied_message(perms).ends_with("`BAN_MEMBERS, MANAGE_MESSAGES`"));
    }
}
