use tracing::info;

use crate::CommandMeta;
use crate::moderation::embeds::usage_message;
use warden_core::{Context, Error};
use warden_database::impls::scheduled::{reminders_for_user, schedule_task};
use warden_database::model::scheduled::TaskKind;
use warden_utils::formatting::truncate_chars;
use warden_utils::parse::parse_duration_seconds;
use warden_utils::time::{now_unix_secs, relative_timestamp};

pub const META: CommandMeta = CommandMeta {
    name: "remind",
    desc: "Get pinged with a message after a delay.",
    category: "utility",
    usage: "!remind <duration> <message>",
};

const MAX_REMINDER_SECONDS: u64 = 365 * 86_400;
const MAX_PENDING_REMINDERS: usize = 25;
const MAX_MESSAGE_CHARS: usize = 1_000;

#[poise::command(prefix_command, slash_command, category = "Utility", user_cooldown = 5)]
pub async fn remind(
    ctx: Context<'_>,
    #[description = "Delay, e.g. 10m, 2h, 1d"] duration: Option<String>,
    #[description = "What to remind you about"]
    #[rest]
    message: Option<String>,
) -> Result<(), Error> {
    let (Some(duration), Some(message)) = (duration, message.filter(|m| !m.trim().is_empty()))
    else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let Some(seconds) =
        parse_duration_seconds(&duration).filter(|secs| *secs <= MAX_REMINDER_SECONDS)
    else {
        ctx.say("Provide a delay between 1s and 365d, e.g. `10m`, `2h` or `1d`.")
            .await?;
        return Ok(());
    };

    let db = &ctx.data().db;
    let user_id = ctx.author().id.get();
    if reminders_for_user(db, user_id).await.len() >= MAX_PENDING_REMINDERS {
        ctx.say(format!(
            "You already have {MAX_PENDING_REMINDERS} pending reminders. Cancel one with `!reminders cancel <id>`."
        ))
        .await?;
        return Ok(());
    }

    let now = now_unix_secs();
    let due_at = now + seconds;
    let id = schedule_task(
        db,
        due_at,
        TaskKind::Reminder {
            user_id,
            channel_id: ctx.channel_id().get(),
            message: truncate_chars(message.trim(), MAX_MESSAGE_CHARS),
            created_at: now,
        },
    )
    .await?;
    info!(task_id = id, user_id, due_at, "reminder scheduled");

    ctx.say(format!(
        "Okay, I'll remind you {} (reminder #{id}).",
        relative_timestamp(due_at)
    ))
    .await?;
    Ok(())
}
