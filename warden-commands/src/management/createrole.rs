use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::parse::parse_hex_color;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "createrole",
    desc: "Create a new role, optionally colored.",
    category: "management",
    usage: "!createrole <name> [#hex]",
};

/// Split a trailing `#rrggbb` off the role name.
pub(crate) fn split_name_and_color(raw: &str) -> (String, Option<u32>) {
    let raw = raw.trim();
    if let Some((name, last)) = raw.rsplit_once(char::is_whitespace)
        && last.starts_with('#')
        && let Some(color) = parse_hex_color(last)
    {
        return (name.trim().to_owned(), Some(color));
    }
    (raw.to_owned(), None)
}

#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 10)]
pub async fn createrole(
    ctx: Context<'_>,
    #[description = "Role name, optionally followed by #hex color"]
    #[rest]
    input: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_ROLES).await? {
        return Ok(());
    }

    let (name, color) = split_name_and_color(input.as_deref().unwrap_or_default());
    if name.is_empty() {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    }

    let roles = guild_id.roles(ctx.http()).await?;
    if roles.values().any(|role| role.name.eq_ignore_ascii_case(&name)) {
        ctx.say(format!("A role named '{name}' already exists.")).await?;
        return Ok(());
    }

    let audit_reason = format!("Role created by {}", ctx.author().name);
    let mut builder = serenity::EditRole::new()
        .name(&name)
        .audit_log_reason(&audit_reason);
    if let Some(color) = color {
        builder = builder.colour(color);
    }

    let role = match guild_id.create_role(ctx.http(), builder).await {
        Ok(role) => role,
        Err(source) => {
            error!(?source, "role creation failed");
            ctx.say("I couldn't create that role. I may lack 'Manage Roles'.")
                .await?;
            return Ok(());
        }
    };

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new(
            "role_created",
            ModLogTarget::Role {
                id: role.id.get(),
                name: role.name.clone(),
            },
            Some(ctx.author().id.get()),
            "Role created",
        ),
    )
    .await;

    ctx.say(format!("Created role <@&{}>.", role.id.get())).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::split_name_and_color;

    #[test]
    fn trailing_hex_is_the_color() {
        assert_eq!(
            split_name_and_color("Event Team #ff8800"),
            ("Event Team".to_owned(), Some(0xff8800))
        );
        assert_eq!(split_name_and_color("Helpers"), ("Helpers".to_owned(), None));
        assert_eq!(
            split_name_and_color("Team #1"),
            ("Team #1".to_owned(), None)
        );
    }
}
