use tracing::warn;

use poise::serenity_prelude as serenity;

use warden_utils::embed::DEFAULT_EMBED_COLOR;
use warden_utils::formatting::escape_mentions;

pub const NO_REASON: &str = "No reason provided";
pub const MUTED_ROLE_NAME: &str = "Muted";

#[derive(Clone, Debug)]
pub struct TargetProfile {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

pub fn target_profile_from_user(user: &serenity::User) -> TargetProfile {
    TargetProfile {
        display_name: user
            .global_name
            .clone()
            .unwrap_or_else(|| user.name.clone()),
        avatar_url: Some(user.face()),
    }
}

pub async fn fetch_target_profile(
    http: &serenity::Http,
    user_id: serenity::UserId,
) -> TargetProfile {
    match http.get_user(user_id).await {
        Ok(user) => target_profile_from_user(&user),
        Err(_) => TargetProfile {
            display_name: format!("User {}", user_id.get()),
            avatar_url: None,
        },
    }
}

pub fn moderation_action_embed(
    target_profile: &TargetProfile,
    target_user_id: serenity::UserId,
    action_past_tense: &str,
    reason: Option<&str>,
    duration: Option<&str>,
) -> serenity::CreateEmbed {
    let reason = escape_mentions(reason.unwrap_or(NO_REASON));

    let mut description = format!(
        "**Target :** <@{}>\n**Reason :** {}",
        target_user_id.get(),
        reason
    );
    if let Some(duration) = duration {
        description.push_str(&format!("\n**Duration :** {}", duration));
    }

    let heading = format!(
        "{} has been {}",
        target_profile.display_name, action_past_tense
    );
    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .description(description);

    match target_profile.avatar_url.as_deref() {
        Some(url) => embed.author(serenity::CreateEmbedAuthor::new(heading).icon_url(url)),
        None => embed.title(heading),
    }
}

pub fn moderation_target_dm_embed(
    guild_name: &str,
    action_past_tense: &str,
    reason: Option<&str>,
    duration: Option<&str>,
) -> serenity::CreateEmbed {
    let mut details = Vec::new();

    if let Some(reason) = reason {
        details.push(format!("**Reason :** {}", escape_mentions(reason)));
    }

    if let Some(duration) = duration {
        details.push(format!("**Duration :** {}", duration));
    }

    let description = if details.is_empty() {
        "No additional details were provided.".to_owned()
    } else {
        details.join("\n")
    };

    serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(format!(
            "You have been {} in {}",
            action_past_tense, guild_name
        ))
        .description(description)
}

/// DM the target about an action taken against them. Failures are only logged;
/// closed DMs are common and never block the action itself.
pub async fn notify_moderation_target(
    http: &serenity::Http,
    target_user_id: serenity::UserId,
    guild_id: serenity::GuildId,
    action_past_tense: &str,
    reason: Option<&str>,
    duration: Option<&str>,
) {
    let guild_name = match guild_id.to_partial_guild(http).await {
        Ok(guild) => guild.name,
        Err(_) => format!("Server {}", guild_id.get()),
    };

    let result = async {
        let dm_channel = target_user_id.create_dm_channel(http).await?;
        dm_channel
            .send_message(
                http,
                serenity::CreateMessage::new().embed(moderation_target_dm_embed(
                    &guild_name,
                    action_past_tense,
                    reason,
                    duration,
                )),
            )
            .await
    }
    .await;

    if let Err(source) = result {
        warn!(
            ?source,
            user_id = %target_user_id,
            action = action_past_tense,
            "could not DM moderation target"
        );
    }
}

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{usage}`")
}

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn moderation_self_action_message(action: &str) -> String {
    format!("You can't {action} yourself.")
}

pub fn moderation_bot_target_message() -> &'static str {
    "You can't use moderation actions on bots or application accounts."
}

pub fn moderation_owner_target_message(action: &str) -> String {
    format!("I can't {action} the server owner.")
}

pub fn is_missing_permissions_error(source: &serenity::Error) -> bool {
    matches!(
        source,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 403 || response.error.code == 50013
    )
}

/// Reason for a failed Discord call, worded for the moderator.
pub fn action_failure_message(action: &str, source: &serenity::Error) -> String {
    if is_missing_permissions_error(source) {
        format!("I couldn't {action} that user. Check role hierarchy and my permissions.")
    } else {
        format!("Something went wrong while trying to {action}. Please try again.")
    }
}

/// Why `target` can't be acted on, if anything.
pub fn target_refusal(
    action: &str,
    author_id: serenity::UserId,
    owner_id: Option<serenity::UserId>,
    target_id: serenity::UserId,
    target_is_bot: bool,
) -> Option<String> {
    if target_id == author_id {
        return Some(moderation_self_action_message(action));
    }
    if target_is_bot {
        return Some(moderation_bot_target_message().to_owned());
    }
    if owner_id == Some(target_id) {
        return Some(moderation_owner_target_message(action));
    }
    None
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude as serenity;

    use super::{action_failure_message, target_refusal, usage_message};

    fn user(id: u64) -> serenity::UserId {
        serenity::UserId::new(id)
    }

    #[test]
    fn refuses_self_bots_and_owner() {
        let author = serenity::UserId::new(1);
        let owner = Some(serenity::UserId::new(3));

        assert_eq!(
            target_refusal("kick", author, owner, user(1), false).as_deref(),
            Some("You can't kick yourself.")
        );
        assert!(target_refusal("kick", author, owner, user(2), true).is_some());
        assert_eq!(
            target_refusal("ban", author, owner, user(3), false).as_deref(),
            Some("I can't ban the server owner.")
        );
        assert_eq!(target_refusal("ban", author, owner, user(4), false), None);
    }

    #[test]
    fn messages() {
        assert_eq!(usage_message("!kick <user>"), "Usage: `!kick <user>`");
        let generic = action_failure_message("kick", &serenity::Error::Other("boom"));
        assert!(generic.starts_with("Something went wrong"));
    }
}
