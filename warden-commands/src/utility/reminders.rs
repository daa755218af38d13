use crate::CommandMeta;
use warden_core::{Context, Error};
use warden_database::impls::scheduled::{cancel_reminder, reminders_for_user};
use warden_database::model::scheduled::{ScheduledTask, TaskKind};
use warden_utils::formatting::{escape_mentions, truncate_chars};
use warden_utils::pagination::{page_window, paginate_embed_pages, total_pages};
use warden_utils::time::relative_timestamp;

pub const META: CommandMeta = CommandMeta {
    name: "reminders",
    desc: "List your pending reminders or cancel one.",
    category: "utility",
    usage: "!reminders [cancel <id>]",
};

const REMINDERS_PER_PAGE: usize = 8;

pub(crate) fn reminder_pages(tasks: &[ScheduledTask]) -> Vec<String> {
    let lines: Vec<String> = tasks
        .iter()
        .filter_map(|task| match &task.kind {
            TaskKind::Reminder {
                message,
                channel_id,
                ..
            } => Some(format!(
                "`#{}` {} in <#{}>\n{}",
                task.id,
                relative_timestamp(task.due_at),
                channel_id,
                escape_mentions(&truncate_chars(message, 120))
            )),
            TaskKind::Unmute { .. } => None,
        })
        .collect();

    if lines.is_empty() {
        return vec!["You have no pending reminders.".to_owned()];
    }

    (1..=total_pages(lines.len(), REMINDERS_PER_PAGE))
        .map(|page| {
            let (start, end) = page_window(lines.len(), REMINDERS_PER_PAGE, page);
            lines[start..end].join("\n\n")
        })
        .collect()
}

/// List your pending reminders.
#[poise::command(
    prefix_command,
    slash_command,
    category = "Utility",
    subcommands("cancel"),
    user_cooldown = 5
)]
pub async fn reminders(ctx: Context<'_>) -> Result<(), Error> {
    let tasks = reminders_for_user(&ctx.data().db, ctx.author().id.get()).await;
    paginate_embed_pages(ctx, "Your Reminders", &reminder_pages(&tasks), 1).await?;
    Ok(())
}

/// Cancel one of your reminders by id.
#[poise::command(prefix_command, slash_command, category = "Utility", user_cooldown = 5)]
pub async fn cancel(
    ctx: Context<'_>,
    #[description = "Reminder id from !reminders"] id: Option<u64>,
) -> Result<(), Error> {
    let Some(id) = id else {
        ctx.say("Usage: `!reminders cancel <id>`").await?;
        return Ok(());
    };

    if cancel_reminder(&ctx.data().db, ctx.author().id.get(), id).await? {
        ctx.say(format!("Reminder #{id} cancelled.")).await?;
    } else {
        ctx.say(format!("You have no pending reminder #{id}.")).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use warden_database::model::scheduled::{ScheduledTask, TaskKind};

    use super::reminder_pages;

    fn reminder(id: u64) -> ScheduledTask {
        ScheduledTask {
            id,
            due_at: 1_000 + id,
            kind: TaskKind::Reminder {
                user_id: 1,
                channel_id: 2,
                message: format!("note {id}"),
                created_at: 0,
            },
        }
    }

    #[test]
    fn reminders_paginate() {
        let tasks: Vec<_> = (1..=9).map(reminder).collect();
        let pages = reminder_pages(&tasks);

        assert_eq!(pages.len(), 2);
        assert!(pages[0].starts_with("`#1` <t:1001:R> in <#2>\nnote 1"));
        assert_eq!(pages[1], "`#9` <t:1009:R> in <#2>\nnote 9");
    }

    #[test]
    fn empty_list_has_a_placeholder() {
        assert_eq!(reminder_pages(&[]), vec!["You have no pending reminders."]);
    }
}
