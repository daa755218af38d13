use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

use warden_commands::moderation::{
    ModLogEntry, ModLogTarget, is_missing_permissions_error, publish_modlog_entry,
};
use warden_core::Data;
use warden_database::impls::automod::get_automod_config;
use warden_database::model::automod::{AutoModConfig, AutoModFilter};
use warden_utils::formatting::truncate_chars;

pub const MENTION_LIMIT: usize = 5;
pub const CAPS_MIN_LETTERS: usize = 10;
pub const CAPS_MIN_PERCENT: usize = 70;

const NOTICE_LIFETIME: Duration = Duration::from_secs(5);
const INVITE_MARKERS: [&str; 4] = [
    "discord.gg/",
    "discord.com/invite/",
    "discordapp.com/invite/",
    "discord.me/",
];

fn matches_keyword(content_lower: &str, keyword: &str) -> bool {
    if keyword.contains(char::is_whitespace) {
        return content_lower.contains(keyword);
    }

    // Single words only match whole tokens ("ass" must not hit "class").
    content_lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == keyword)
}

fn has_invite(content_lower: &str) -> bool {
    INVITE_MARKERS
        .iter()
        .any(|marker| content_lower.contains(marker))
}

fn has_link(content_lower: &str) -> bool {
    content_lower
        .split_whitespace()
        .any(|token| token.contains("http://") || token.contains("https://") || token.starts_with("www."))
}

fn is_shouting(content: &str) -> bool {
    let (letters, upper) = content
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(letters, upper), c| {
            (letters + 1, upper + usize::from(c.is_uppercase()))
        });

    letters >= CAPS_MIN_LETTERS && upper * 100 >= letters * CAPS_MIN_PERCENT
}

/// First enabled filter the message trips, in evaluation order.
pub fn find_violation(
    config: &AutoModConfig,
    content: &str,
    mention_count: usize,
) -> Option<AutoModFilter> {
    let content_lower = content.to_lowercase();

    AutoModFilter::ALL
        .into_iter()
        .filter(|filter| config.is_enabled(*filter))
        .find(|filter| match filter {
            AutoModFilter::Keywords => config
                .keywords
                .iter()
                .any(|keyword| matches_keyword(&content_lower, keyword)),
            AutoModFilter::Invites => has_invite(&content_lower),
            AutoModFilter::Links => has_link(&content_lower),
            AutoModFilter::Mentions => mention_count >= MENTION_LIMIT,
            AutoModFilter::Caps => is_shouting(content),
        })
}

fn notice_text(filter: AutoModFilter) -> &'static str {
    match filter {
        AutoModFilter::Keywords => "that message contained a blocked word",
        AutoModFilter::Invites => "invite links aren't allowed here",
        AutoModFilter::Links => "links aren't allowed here",
        AutoModFilter::Mentions => "please don't mass-mention members",
        AutoModFilter::Caps => "please turn off caps lock",
    }
}

pub async fn handle_message_automod(
    ctx: &serenity::Context,
    data: &Data,
    message: &serenity::Message,
) {
    if message.author.bot || message.webhook_id.is_some() {
        return;
    }

    let Some(guild_id) = message.guild_id else {
        return;
    };

    let config = get_automod_config(&data.db, guild_id.get()).await;
    if !config.is_active() || config.ignored_channels.contains(&message.channel_id.get()) {
        return;
    }

    let has_ignored_role = message.member.as_ref().is_some_and(|member| {
        member
            .roles
            .iter()
            .any(|role_id| config.ignored_roles.contains(&role_id.get()))
    });
    if has_ignored_role {
        return;
    }

    let Some(filter) = find_violation(&config, &message.content, message.mentions.len()) else {
        return;
    };

    info!(
        guild_id = %guild_id,
        user_id = %message.author.id,
        filter = %filter,
        "automod violation"
    );

    if let Err(source) = message.delete(&ctx.http).await {
        if is_missing_permissions_error(&source) {
            warn!(guild_id = %guild_id, "missing permissions to delete automod violation");
        } else {
            error!(?source, "failed to delete automod violation");
        }
    }

    match message
        .channel_id
        .say(
            &ctx.http,
            format!("<@{}>, {}.", message.author.id.get(), notice_text(filter)),
        )
        .await
    {
        Ok(notice) => {
            let http = ctx.http.clone();
            tokio::spawn(async move {
                tokio::time::sleep(NOTICE_LIFETIME).await;
                let _ = notice.delete(&http).await;
            });
        }
        Err(source) => error!(?source, "failed to post automod notice"),
    }

    let entry = ModLogEntry::new(
        &format!("automod_{}", filter.as_str()),
        ModLogTarget::User(message.author.id.get()),
        None,
        &format!(
            "Message in <#{}>: {}",
            message.channel_id.get(),
            truncate_chars(&message.content, 200)
        ),
    );
    if let Err(source) = publish_modlog_entry(&ctx.http, &data.db, guild_id, &entry).await {
        error!(?source, guild_id = %guild_id, "failed to publish automod entry");
    }
}

#[cfg(test)]
mod tests {
    use warden_database::model::automod::{AutoModConfig, AutoModFilter};

    use super::find_violation;

    fn config_with(filters: &[AutoModFilter], keywords: &[&str]) -> AutoModConfig {
        AutoModConfig {
            enabled_filters: filters.iter().copied().collect(),
            keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
            ..AutoModConfig::default()
        }
    }

    #[test]
    fn disabled_filters_never_fire() {
        let config = config_with(&[], &["spam"]);
        assert_eq!(find_violation(&config, "SPAM https://discord.gg/x", 9), None);
    }

    #[test]
    fn keywords_match_whole_words_and_phrases() {
        let config = config_with(&[AutoModFilter::Keywords], &["heck", "free nitro"]);
        assert_eq!(find_violation(&config, "what the HECK", 0), Some(AutoModFilter::Keywords));
        assert_eq!(find_violation(&config, "checking in", 0), None);
        assert_eq!(
            find_violation(&config, "get Free Nitro here", 0),
            Some(AutoModFilter::Keywords)
        );
    }

    #[test]
    fn evaluation_order_picks_the_first_hit() {
        let config = config_with(&AutoModFilter::ALL, &["join"]);
        assert_eq!(
            find_violation(&config, "join https://discord.gg/abc", 6),
            Some(AutoModFilter::Keywords)
        );

        let config = config_with(
            &[AutoModFilter::Invites, AutoModFilter::Links, AutoModFilter::Mentions],
            &[],
        );
        assert_eq!(
            find_violation(&config, "https://discord.gg/abc", 6),
            Some(AutoModFilter::Invites)
        );
        assert_eq!(
            find_violation(&config, "see https://example.com", 6),
            Some(AutoModFilter::Links)
        );
        assert_eq!(find_violation(&config, "hi all", 5), Some(AutoModFilter::Mentions));
        assert_eq!(find_violation(&config, "hi all", 4), None);
    }

    #[test]
    fn caps_needs_enough_letters_and_ratio() {
        let config = config_with(&[AutoModFilter::Caps], &[]);
        assert_eq!(find_violation(&config, "WHY IS THIS HAPPENING", 0), Some(AutoModFilter::Caps));
        assert_eq!(find_violation(&config, "OK FINE!!", 0), None);
        assert_eq!(find_violation(&config, "WHY is this so", 0), None);
        assert_eq!(find_violation(&config, "STOP SHOUTING ok", 0), Some(AutoModFilter::Caps));
    }
}
