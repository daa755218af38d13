use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::gate::confirm_action;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::parse::parse_role_id;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "deleterole",
    desc: "Delete a role.",
    category: "management",
    usage: "!deleterole <@role|role id|name>",
};

#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 10)]
pub async fn deleterole(
    ctx: Context<'_>,
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

    let Some(query) = role.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let roles = guild_id.roles(ctx.http()).await?;
    let found = match parse_role_id(query) {
        Some(id) => roles.get(&serenity::RoleId::new(id)),
        None => roles
            .values()
            .find(|role| role.name.eq_ignore_ascii_case(query)),
    };
    let Some(target) = found.cloned() else {
        ctx.say(format!("Role '{query}' not found.")).await?;
        return Ok(());
    };

    if target.id.get() == guild_id.get() || target.managed {
        ctx.say("That role can't be deleted.").await?;
        return Ok(());
    }

    let prompt = format!("Are you sure you want to delete the role **{}**?", target.name);
    let Some(press) = confirm_action(ctx, "role deletion", prompt, None).await? else {
        return Ok(());
    };

    if let Err(source) = guild_id.delete_role(ctx.http(), target.id).await {
        error!(?source, role_id = %target.id, "role deletion failed");
        press
            .edit_response(
                ctx.http(),
                serenity::EditInteractionResponse::new()
                    .content("I couldn't delete that role. Check role hierarchy and my permissions."),
            )
            .await?;
        return Ok(());
    }

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new(
            "role_deleted",
            ModLogTarget::Role {
                id: target.id.get(),
                name: target.name.clone(),
            },
            Some(ctx.author().id.get()),
            "Role deleted",
        ),
    )
    .await;

    press
        .edit_response(
            ctx.http(),
            serenity::EditInteractionResponse::new()
                .content(format!("Deleted role **{}**.", target.name)),
        )
        .await?;
    Ok(())
}
