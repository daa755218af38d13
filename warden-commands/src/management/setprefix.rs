use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{guild_only_message, usage_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_database::impls::prefixes::{clear_prefix, set_prefix};
use warden_utils::permissions::ensure_author_permission;
use warden_utils::{DEFAULT_PREFIX, MAX_PREFIX_LEN};

pub const META: CommandMeta = CommandMeta {
    name: "setprefix",
    desc: "Set the command prefix for this server.",
    category: "management",
    usage: "!setprefix <prefix|reset>",
};

pub(crate) fn validate_prefix(raw: &str) -> Result<&str, String> {
    let prefix = raw.trim();
    if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
        return Err("The prefix can't be empty or contain spaces.".to_owned());
    }
    if prefix.chars().count() > MAX_PREFIX_LEN {
        return Err(format!(
            "The prefix can be at most {MAX_PREFIX_LEN} characters long."
        ));
    }
    Ok(prefix)
}

#[poise::command(prefix_command, slash_command, category = "Management", guild_cooldown = 10)]
pub async fn setprefix(
    ctx: Context<'_>,
    #[description = "New prefix, or 'reset'"] prefix: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::ADMINISTRATOR).await? {
        return Ok(());
    }

    let Some(raw) = prefix else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let db = &ctx.data().db;
    if raw.trim().eq_ignore_ascii_case("reset") {
        clear_prefix(db, guild_id.get()).await?;
        ctx.say(format!("Prefix reset to `{DEFAULT_PREFIX}`.")).await?;
        return Ok(());
    }

    let prefix = match validate_prefix(&raw) {
        Ok(prefix) => prefix,
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };

    set_prefix(db, guild_id.get(), prefix).await?;

    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new(
            "prefix",
            ModLogTarget::Guild,
            Some(ctx.author().id.get()),
            &format!("Prefix set to `{prefix}`"),
        ),
    )
    .await;

    ctx.say(format!("Command prefix set to `{prefix}`.")).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_prefix;

    #[test]
    fn prefix_rules() {
        assert_eq!(validate_prefix(" ? "), Ok("?"));
        assert_eq!(validate_prefix("$$$$$"), Ok("$$$$$"));
        assert!(validate_prefix("toolong").is_err());
        assert!(validate_prefix("a b").is_err());
        assert!(validate_prefix("   ").is_err());
    }
}
