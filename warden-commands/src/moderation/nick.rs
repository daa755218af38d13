use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::checks::guild_owner_id;
use crate::moderation::embeds::{action_failure_message, guild_only_message, usage_message};
use crate::moderation::logging::{ModLogEntry, ModLogTarget, log_action};
use warden_core::{Context, Error};
use warden_utils::formatting::escape_mentions;
use warden_utils::permissions::ensure_author_permission;

pub const META: CommandMeta = CommandMeta {
    name: "nick",
    desc: "Change or reset a member's nickname.",
    category: "moderation",
    usage: "!nick <user> [new nickname]",
};

const MAX_NICKNAME_CHARS: usize = 32;

/// Why a nickname edit must be refused, if anything.
pub(crate) fn nick_refusal(
    author_id: serenity::UserId,
    owner_id: Option<serenity::UserId>,
    target_id: serenity::UserId,
    target_is_bot: bool,
    new_nickname: Option<&str>,
) -> Option<String> {
    if target_is_bot {
        return Some("I can't change a bot's nickname with this command.".to_owned());
    }
    if owner_id == Some(target_id) {
        return Some("I can't change the nickname of the server owner.".to_owned());
    }
    if target_id == author_id && new_nickname.is_none() {
        return Some(
            "You can't reset your own nickname with this command. Use Discord's built-in feature."
                .to_owned(),
        );
    }
    if new_nickname.is_some_and(|nick| nick.chars().count() > MAX_NICKNAME_CHARS) {
        return Some(format!(
            "Nicknames can be at most {MAX_NICKNAME_CHARS} characters."
        ));
    }
    None
}

/// Mod-log action and reason for a nickname edit.
pub(crate) fn nick_log_details(old: &str, new: Option<&str>) -> (&'static str, String) {
    match new {
        Some(new) => ("nickname_change", format!("Changed from '{old}' to '{new}'")),
        None => ("nickname_reset", format!("Reset from '{old}'")),
    }
}

#[poise::command(prefix_command, slash_command, category = "Moderation", user_cooldown = 3)]
pub async fn nick(
    ctx: Context<'_>,
    #[description = "The member to rename"] user: Option<serenity::User>,
    #[description = "New nickname; leave empty to reset"]
    #[rest]
    nickname: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !ensure_author_permission(ctx, guild_id, serenity::Permissions::MANAGE_NICKNAMES).await? {
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let nickname = nickname
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty());

    if let Some(message) = nick_refusal(
        ctx.author().id,
        guild_owner_id(&ctx),
        user.id,
        user.bot,
        nickname.as_deref(),
    ) {
        ctx.say(message).await?;
        return Ok(());
    }

    let member = match guild_id.member(ctx.http(), user.id).await {
        Ok(member) => member,
        Err(_) => {
            ctx.say("That user is not a member of this server.").await?;
            return Ok(());
        }
    };
    let old_nickname = member.nick.clone().unwrap_or_else(|| user.name.clone());

    let audit_reason = format!("Nickname changed by {}", ctx.author().name);
    let builder = serenity::EditMember::new()
        .nickname(nickname.clone().unwrap_or_default())
        .audit_log_reason(&audit_reason);
    if let Err(source) = guild_id.edit_member(ctx.http(), user.id, builder).await {
        error!(?source, user_id = %user.id, "nickname edit failed");
        ctx.say(action_failure_message("rename", &source)).await?;
        return Ok(());
    }

    let (action, reason) = nick_log_details(&old_nickname, nickname.as_deref());
    log_action(
        &ctx,
        guild_id,
        ModLogEntry::new(action, ModLogTarget::User(user.id.get()), Some(ctx.author().id.get()), &reason),
    )
    .await;

    let reply = match nickname.as_deref() {
        Some(new) => format!(
            "Changed {}'s nickname to {}.",
            escape_mentions(&old_nickname),
            escape_mentions(new)
        ),
        None => format!("Reset {}'s nickname.", escape_mentions(&old_nickname)),
    };
    ctx.say(reply).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::{nick_log_details, nick_refusal};

    const AUTHOR: serenity::UserId = serenity::UserId::new(1);
    const OWNER: serenity::UserId = serenity::UserId::new(2);
    const MEMBER: serenity::UserId = serenity::UserId::new(3);

    #[test]
    fn refuses_bots_owner_and_self_reset() {
        assert!(nick_refusal(AUTHOR, Some(OWNER), MEMBER, true, Some("x")).is_some());
        assert!(nick_refusal(AUTHOR, Some(OWNER), OWNER, false, Some("x")).is_some());
        assert!(nick_refusal(AUTHOR, Some(OWNER), AUTHOR, false, None).is_some());
        assert_eq!(nick_refusal(AUTHOR, Some(OWNER), AUTHOR, false, Some("me")), None);
        assert_eq!(nick_refusal(AUTHOR, Some(OWNER), MEMBER, false, None), None);
    }

    #[test]
    fn rejects_overlong_nicknames() {
        let long = "n".repeat(33);
        assert!(nick_refusal(AUTHOR, None, MEMBER, false, Some(&long)).is_some());
        assert_eq!(nick_refusal(AUTHOR, None, MEMBER, false, Some(&long[..32])), None);
    }

    #[test]
    fn log_details_distinguish_change_and_reset() {
        assert_eq!(
            nick_log_details("old", Some("new")),
            ("nickname_change", "Changed from 'old' to 'new'".to_owned())
        );
        assert_eq!(
            nick_log_details("old", None),
            ("nickname_reset", "Reset from 'old'".to_owned())
        );
    }
}
