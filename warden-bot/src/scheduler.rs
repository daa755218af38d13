use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use warden_commands::moderation::{
    ModLogEntry, ModLogTarget, notify_moderation_target, publish_modlog_entry,
};
use warden_database::Database;
use warden_database::impls::scheduled::{complete_task, due_tasks};
use warden_database::model::scheduled::{ScheduledTask, TaskKind};
use warden_utils::formatting::escape_mentions;
use warden_utils::time::{now_unix_secs, relative_timestamp};

const MUTE_EXPIRED_REASON: &str = "Mute expired";

/// How a single firing went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fired {
    Done,
    /// Discord failed in a way worth retrying on the next tick.
    Retry,
}

/// Fire due tasks every `tick` until the process exits.
pub fn spawn_scheduler(http: Arc<serenity::Http>, db: Database, tick: Duration) {
    tokio::spawn(async move {
        let mut ticker = interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(tick_seconds = tick.as_secs(), "scheduler started");

        loop {
            ticker.tick().await;
            run_due_tasks(&http, &db, now_unix_secs()).await;
        }
    });
}

pub async fn run_due_tasks(http: &serenity::Http, db: &Database, now: u64) {
    let tasks = due_tasks(db, now).await;
    if tasks.is_empty() {
        return;
    }
    debug!(count = tasks.len(), "firing scheduled tasks");

    for task in tasks {
        if fire(http, db, &task).await == Fired::Retry {
            continue;
        }

        if let Err(source) = complete_task(db, task.id).await {
            error!(?source, task_id = task.id, "failed to remove fired task");
        }
    }
}

async fn fire(http: &serenity::Http, db: &Database, task: &ScheduledTask) -> Fired {
    match &task.kind {
        TaskKind::Unmute {
            guild_id,
            user_id,
            role_id,
            channel_id,
        } => {
            fire_unmute(
                http,
                db,
                serenity::GuildId::new(*guild_id),
                serenity::UserId::new(*user_id),
                serenity::RoleId::new(*role_id),
                serenity::ChannelId::new(*channel_id),
            )
            .await
        }
        TaskKind::Reminder {
            user_id,
            channel_id,
            message,
            created_at,
        } => {
            fire_reminder(
                http,
                serenity::UserId::new(*user_id),
                serenity::ChannelId::new(*channel_id),
                &reminder_text(*user_id, message, *created_at),
            )
            .await
        }
    }
}

/// Client errors (member left, role deleted, missing access) will not fix themselves.
fn is_permanent_failure(source: &serenity::Error) -> bool {
    matches!(
        source,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.is_client_error()
    )
}

async fn fire_unmute(
    http: &serenity::Http,
    db: &Database,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    role_id: serenity::RoleId,
    channel_id: serenity::ChannelId,
) -> Fired {
    if let Err(source) = http
        .remove_member_role(guild_id, user_id, role_id, Some(MUTE_EXPIRED_REASON))
        .await
    {
        if is_permanent_failure(&source) {
            warn!(?source, guild_id = %guild_id, user_id = %user_id, "dropping automatic unmute");
            return Fired::Done;
        }
        error!(?source, guild_id = %guild_id, user_id = %user_id, "automatic unmute failed; retrying");
        return Fired::Retry;
    }
    info!(guild_id = %guild_id, user_id = %user_id, "automatic unmute");

    if let Err(source) = channel_id.say(http, unmute_notice(user_id.get())).await {
        debug!(?source, channel_id = %channel_id, "could not post unmute notice");
    }

    let entry = ModLogEntry::new(
        "auto_unmute",
        ModLogTarget::User(user_id.get()),
        None,
        MUTE_EXPIRED_REASON,
    );
    if let Err(source) = publish_modlog_entry(http, db, guild_id, &entry).await {
        error!(?source, guild_id = %guild_id, "failed to publish automatic unmute");
    }

    notify_moderation_target(http, user_id, guild_id, "unmuted", Some(MUTE_EXPIRED_REASON), None)
        .await;
    Fired::Done
}

async fn fire_reminder(
    http: &serenity::Http,
    user_id: serenity::UserId,
    channel_id: serenity::ChannelId,
    text: &str,
) -> Fired {
    let message = serenity::CreateMessage::new()
        .content(text)
        .allowed_mentions(serenity::CreateAllowedMentions::new().users(vec![user_id]));

    let Err(source) = channel_id.send_message(http, message.clone()).await else {
        return Fired::Done;
    };
    if !is_permanent_failure(&source) {
        error!(?source, user_id = %user_id, "reminder delivery failed; retrying");
        return Fired::Retry;
    }

    // Channel gone or unreadable: fall back to a DM.
    let dm = async {
        let dm_channel = user_id.create_dm_channel(http).await?;
        dm_channel.send_message(http, message).await
    }
    .await;
    if let Err(source) = dm {
        warn!(?source, user_id = %user_id, "dropping undeliverable reminder");
    }
    Fired::Done
}

pub fn unmute_notice(user_id: u64) -> String {
    format!("<@{user_id}> has been unmuted automatically (mute expired).")
}

pub fn reminder_text(user_id: u64, message: &str, created_at: u64) -> String {
    format!(
        "⏰ <@{user_id}>, you asked me to remind you {}: {}",
        relative_timestamp(created_at),
        escape_mentions(message)
    )
}

#[cfg(test)]
mod tests {
    use warden_database::Database;
    use warden_database::impls::scheduled::{due_tasks, schedule_task};
    use warden_database::model::scheduled::TaskKind;

    use super::{reminder_text, unmute_notice};

    #[test]
    fn reminder_mentions_only_the_owner() {
        let text = reminder_text(7, "ping @everyone about lunch", 1_700_000_000);
        assert!(text.starts_with("⏰ <@7>,"));
        assert!(text.contains("<t:1700000000:R>"));
        assert!(!text.contains("@everyone"));
    }

    #[test]
    fn unmute_notice_names_the_member() {
        assert_eq!(
            unmute_notice(42),
            "<@42> has been unmuted automatically (mute expired)."
        );
    }

    #[tokio::test]
    async fn pending_tasks_survive_a_restart() {
        let dir = tempfile::tempdir().unwrap();

        let db = Database::open(dir.path()).await.unwrap();
        schedule_task(
            &db,
            100,
            TaskKind::Reminder {
                user_id: 1,
                channel_id: 2,
                message: "stretch".to_owned(),
                created_at: 40,
            },
        )
        .await
        .unwrap();
        drop(db);

        let reopened = Database::open(dir.path()).await.unwrap();
        assert!(due_tasks(&reopened, 99).await.is_empty());
        assert_eq!(due_tasks(&reopened, 100).await.len(), 1);
    }
}
