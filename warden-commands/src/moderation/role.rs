use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::checks::guild_owner_id;
use crate::moderation::embeds::{action_failure_message, guild_only_message, usage_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::formatting::escape_mentions;
use warden_utils::parse::parse_role_id;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "role",
    desc: "Add a role to or remove a role from a member.",
    category: "moderation",
    usage: "!role <user> <add|remove> <role>",
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RoleAction {
    Add,
    Remove,
}

impl RoleAction {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    fn log_action(self) -> &'static str {
        match self {
            Self::Add => "role_added",
            Self::Remove => "role_removed",
        }
    }
}

/// Reply for a request that would change nothing, if any.
pub(crate) fn role_noop_message(
    action: RoleAction,
    user_id: serenity::UserId,
    role_name: &str,
    has_role: bool,
) -> Option<String> {
    let role_name = escape_mentions(role_name);
    match (action, has_role) {
        (RoleAction::Add, true) => Some(format!("<@{user_id}> already has the role {role_name}.")),
        (RoleAction::Remove, false) => Some(format!("<@{user_id}> does not have the role {role_name}.")),
        _ => None,
    }
}

#[poise::command(prefix_command, slash_command, category = "Moderation", user_cooldown = 5)]
pub async fn role(
    ctx: Context<'_>,
    #[description = "The member to update"] user: Option<serenity::User>,
    #[description = "add or remove"] action: Option<String>,
    #[description = "Role mention, id or exact name"]
    #[rest]
    role: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_ROLES).await? {
        return Ok(());
    }

    let (Some(user), Some(action), Some(query)) = (
        user,
        action,
        role.as_deref().map(str::trim).filter(|raw| !raw.is_empty()),
    ) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some(action) = RoleAction::parse(&action) else {
        ctx.say("Invalid action. Please use 'add' or 'remove'.").await?;
        return Ok(());
    };

    if guild_owner_id(&ctx) == Some(user.id) {
        ctx.say("I can't manage roles for the server owner.").await?;
        return Ok(());
    }

    let roles = guild_id.roles(ctx.http()).await?;
    let found = match parse_role_id(query) {
        Some(id) => roles.get(&serenity::RoleId::new(id)),
        None => roles
            .values()
            .find(|role| role.name.eq_ignore_ascii_case(query)),
    };
    let Some(target) = found.cloned() else {
        ctx.say(format!("Role '{}' not found.", escape_mentions(query))).await?;
        return Ok(());
    };

    if target.id.get() == guild_id.get() || target.managed {
        ctx.say("That role can't be assigned by hand.").await?;
        return Ok(());
    }

    let member = match guild_id.member(ctx.http(), user.id).await {
        Ok(member) => member,
        Err(_) => {
            ctx.say("That user is not a member of this server.").await?;
            return Ok(());
        }
    };

    if let Some(message) = role_noop_message(action, user.id, &target.name, member.roles.contains(&target.id)) {
        ctx.say(message).await?;
        return Ok(());
    }

    let audit_reason = match action {
        RoleAction::Add => format!("Role added by {}", ctx.author().name),
        RoleAction::Remove => format!("Role removed by {}", ctx.author().name),
    };
    let http = ctx.http();
    let result = match action {
        RoleAction::Add => {
            http.add_member_role(guild_id, user.id, target.id, Some(&audit_reason))
                .await
        }
        RoleAction::Remove => {
            http.remove_member_role(guild_id, user.id, target.id, Some(&audit_reason))
                .await
        }
    };
    if let Err(source) = result {
        error!(?source, user_id = %user.id, role_id = %target.id, ?action, "role update failed");
        ctx.say(action_failure_message("update roles for", &source)).await?;
        return Ok(());
    }

    let (reason, reply) = match action {
        RoleAction::Add => (
            format!("Added role: {}", target.name),
            format!("Added role {} to <@{}>.", escape_mentions(&target.name), user.id),
        ),
        RoleAction::Remove => (
            format!("Removed role: {}", target.name),
            format!("Removed role {} from <@{}>.", escape_mentions(&target.name), user.id),
        ),
    };

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new(
            action.log_action(),
            ModLogTarget::User(user.id.get()),
            Some(ctx.author().id.get()),
            &reason,
        ),
    )
    .await;

    ctx.say(reply).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::{RoleAction, role_noop_message};

    #[test]
    fn actions_parse_case_insensitively() {
        assert_eq!(RoleAction::parse("ADD"), Some(RoleAction::Add));
        assert_eq!(RoleAction::parse(" remove "), Some(RoleAction::Remove));
        assert_eq!(RoleAction::parse("toggle"), None);
    }

    #[test]
    fn noop_requests_are_reported() {
        let user = serenity::UserId::new(5);
        assert_eq!(
            role_noop_message(RoleAction::Add, user, "Helper", true).as_deref(),
            Some("<@5> already has the role Helper.")
        );
        assert_eq!(
            role_noop_message(RoleAction::Remove, user, "Helper", false).as_deref(),
            Some("<@5> does not have the role Helper.")
        );
        assert_eq!(role_noop_message(RoleAction::Add, user, "Helper", false), None);
        assert_eq!(role_noop_message(RoleAction::Remove, user, "Helper", true), None);
    }
}
