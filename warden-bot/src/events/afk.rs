use poise::serenity_prelude as serenity;
use tracing::{debug, error};

use warden_core::Data;
use warden_database::impls::afk::{get_afk, take_afk};
use warden_database::model::afk::AfkRecord;
use warden_utils::formatting::escape_mentions;
use warden_utils::time::relative_timestamp;

/// A record set at or after the message was sent belongs to that very
/// message (the `afk` command itself), so it must survive.
pub fn is_return_message(record: &AfkRecord, message_unix_secs: i64) -> bool {
    u64::try_from(message_unix_secs).is_ok_and(|sent| record.since < sent)
}

pub fn away_notice(display_name: &str, record: &AfkRecord) -> String {
    format!(
        "💤 **{}** is AFK: {} ({})",
        escape_mentions(display_name),
        escape_mentions(&record.reason),
        relative_timestamp(record.since)
    )
}

pub async fn handle_message_afk(ctx: &serenity::Context, data: &Data, message: &serenity::Message) {
    if message.author.bot || message.guild_id.is_none() {
        return;
    }

    let author_id = message.author.id.get();
    if let Some(record) = get_afk(&data.db, author_id).await
        && is_return_message(&record, message.timestamp.unix_timestamp())
    {
        match take_afk(&data.db, author_id).await {
            Ok(Some(_)) => {
                debug!(user_id = author_id, "cleared afk status");
                if let Err(source) = message
                    .channel_id
                    .say(&ctx.http, format!("Welcome back <@{author_id}>, I removed your AFK status."))
                    .await
                {
                    error!(?source, "failed to post afk welcome back");
                }
            }
            Ok(None) => {}
            Err(source) => error!(?source, user_id = author_id, "failed to clear afk status"),
        }
    }

    let mut notified = Vec::new();
    for user in &message.mentions {
        if user.id == message.author.id || notified.contains(&user.id) {
            continue;
        }
        notified.push(user.id);

        let Some(record) = get_afk(&data.db, user.id.get()).await else {
            continue;
        };

        if let Err(source) = message
            .channel_id
            .say(&ctx.http, away_notice(&user.name, &record))
            .await
        {
            error!(?source, "failed to post afk notice");
        }
    }
}

#[cfg(test)]
mod tests {
    use warden_database::model::afk::AfkRecord;

    use super::{away_notice, is_return_message};

    fn record(since: u64) -> AfkRecord {
        AfkRecord {
            reason: "lunch @everyone".to_owned(),
            since,
        }
    }

    #[test]
    fn the_afk_command_message_does_not_clear_its_own_record() {
        assert!(!is_return_message(&record(100), 100));
        assert!(!is_return_message(&record(100), 99));
        assert!(is_return_message(&record(100), 101));
        assert!(!is_return_message(&record(100), -1));
    }

    #[test]
    fn notice_escapes_mentions() {
        let notice = away_notice("sam", &record(1_700_000_000));
        assert!(notice.contains("<t:1700000000:R>"));
        assert!(!notice.contains("@everyone"));
    }
}
