use tracing::{debug, error};

use poise::serenity_prelude as serenity;

use warden_core::Context;
use warden_database::Database;
use warden_database::impls::modlog_config::get_modlog_channel_id;
use warden_utils::embed::ALERT_EMBED_COLOR;
use warden_utils::formatting::{action_display_name, escape_mentions, format_compact_duration};
use warden_utils::time::now_unix_secs;

/// What a mod-log entry is about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModLogTarget {
    User(u64),
    Channel(u64),
    Role { id: u64, name: String },
    Guild,
}

/// One moderation action as it appears in the mod-log channel.
///
/// `moderator_id` is `None` for actions the bot takes on its own
/// (AutoMod hits, expired mutes).
#[derive(Clone, Debug)]
pub struct ModLogEntry {
    pub action: String,
    pub target: ModLogTarget,
    pub moderator_id: Option<u64>,
    pub reason: String,
    pub duration_seconds: Option<u64>,
}

impl ModLogEntry {
    pub fn new(action: &str, target: ModLogTarget, moderator_id: Option<u64>, reason: &str) -> Self {
        Self {
            action: action.to_owned(),
            target,
            moderator_id,
            reason: reason.to_owned(),
            duration_seconds: None,
        }
    }

    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }
}

pub fn modlog_description(entry: &ModLogEntry, created_at: u64) -> String {
    let mut fields = vec![format!("**Action :** {}", action_display_name(&entry.action))];

    match &entry.target {
        ModLogTarget::User(id) => fields.push(format!("**Target :** <@{id}> (`{id}`)")),
        ModLogTarget::Channel(id) => fields.push(format!("**Channel :** <#{id}> (`{id}`)")),
        ModLogTarget::Role { id, name } => fields.push(format!(
            "**Role :** {} (`{id}`)",
            escape_mentions(name)
        )),
        ModLogTarget::Guild => {}
    }

    fields.push(format!("**Reason :** {}", escape_mentions(&entry.reason)));

    if let Some(duration_seconds) = entry.duration_seconds {
        fields.push(format!(
            "**Duration :** {}",
            format_compact_duration(duration_seconds)
        ));
    }

    match entry.moderator_id {
        Some(moderator_id) => fields.push(format!("**Moderator :** <@{moderator_id}>")),
        None => fields.push("**Moderator :** Automatic".to_owned()),
    }

    fields.push(format!("**When :** <t:{created_at}:R> • <t:{created_at}:f>"));
    fields.join("\n")
}

/// Send `entry` to the guild's mod-log channel, if one is configured.
pub async fn publish_modlog_entry(
    http: &serenity::Http,
    db: &Database,
    guild_id: serenity::GuildId,
    entry: &ModLogEntry,
) -> Result<(), serenity::Error> {
    let Some(channel_id) = get_modlog_channel_id(db, guild_id.get()).await else {
        debug!(guild_id = %guild_id, action = %entry.action, "no modlog channel configured");
        return Ok(());
    };

    let embed = serenity::CreateEmbed::new()
        .color(ALERT_EMBED_COLOR)
        .title(format!("{} Action", action_display_name(&entry.action)))
        .description(modlog_description(entry, now_unix_secs()));

    serenity::ChannelId::new(channel_id)
        .send_message(http, serenity::CreateMessage::new().embed(embed))
        .await?;

    Ok(())
}

/// Publish from inside a command; failures are logged and never reach the user.
pub async fn log_action(ctx: &Context<'_>, guild_id: serenity::GuildId, entry: ModLogEntry) {
    if let Err(source) = publish_modlog_entry(ctx.http(), &ctx.data().db, guild_id, &entry).await {
        error!(
            ?source,
            guild_id = %guild_id,
            action = %entry.action,
            "failed to publish to configured modlog channel"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{ModLogEntry, ModLogTarget, modlog_description};

    #[test]
    fn user_action_lists_every_field() {
        let entry = ModLogEntry::new("mute", ModLogTarget::User(42), Some(7), "spam @everyone")
            .with_duration(90);
        let text = modlog_description(&entry, 1_000);

        assert!(text.starts_with("**Action :** Mute\n**Target :** <@42>"));
        assert!(text.contains("spam @\u{200B}everyone"));
        assert!(text.contains("**Duration :** 1m 30s"));
        assert!(text.contains("**Moderator :** <@7>"));
        assert!(text.ends_with("<t:1000:R> • <t:1000:f>"));
    }

    #[test]
    fn automatic_actions_have_no_moderator_mention() {
        let entry = ModLogEntry::new("automod_caps", ModLogTarget::Channel(5), None, "caps");
        let text = modlog_description(&entry, 1);

        assert!(text.contains("**Action :** Automod Caps"));
        assert!(text.contains("**Channel :** <#5>"));
        assert!(text.contains("**Moderator :** Automatic"));
        assert!(!text.contains("**Duration"));
    }
}
