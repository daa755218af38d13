use crate::Database;
use crate::model::scheduled::{ScheduledTask, TaskKind};

/// Persist a task and return its id.
pub async fn schedule_task(db: &Database, due_at: u64, kind: TaskKind) -> anyhow::Result<u64> {
    db.scheduled()
        .update(|book| {
            book.next_id += 1;
            let id = book.next_id;
            book.tasks.push(ScheduledTask { id, due_at, kind });
            id
        })
        .await
}

/// Store the auto-unmute for one member, replacing any older one for them.
pub async fn schedule_unmute(
    db: &Database,
    due_at: u64,
    guild_id: u64,
    user_id: u64,
    role_id: u64,
    channel_id: u64,
) -> anyhow::Result<u64> {
    db.scheduled()
        .update(|book| {
            book.tasks
                .retain(|task| !is_unmute_of(task, guild_id, user_id));
            book.next_id += 1;
            let id = book.next_id;
            book.tasks.push(ScheduledTask {
                id,
                due_at,
                kind: TaskKind::Unmute {
                    guild_id,
                    user_id,
                    role_id,
                    channel_id,
                },
            });
            id
        })
        .await
}

/// Tasks due at or before `now`, oldest first. They stay stored until
/// [`complete_task`] is called.
pub async fn due_tasks(db: &Database, now: u64) -> Vec<ScheduledTask> {
    let mut due: Vec<ScheduledTask> = db
        .scheduled()
        .read(|book| {
            book.tasks
                .iter()
                .filter(|task| task.due_at <= now)
                .cloned()
                .collect()
        })
        .await;
    due.sort_by_key(|task| (task.due_at, task.id));
    due
}

pub async fn complete_task(db: &Database, id: u64) -> anyhow::Result<bool> {
    remove_where(db, |task| task.id == id).await.map(|n| n > 0)
}

/// Drop any pending auto-unmute for this member.
pub async fn cancel_unmute(db: &Database, guild_id: u64, user_id: u64) -> anyhow::Result<usize> {
    remove_where(db, |task| is_unmute_of(task, guild_id, user_id)).await
}

pub async fn pending_unmute(db: &Database, guild_id: u64, user_id: u64) -> Option<ScheduledTask> {
    db.scheduled()
        .read(|book| {
            book.tasks
                .iter()
                .find(|task| is_unmute_of(task, guild_id, user_id))
                .cloned()
        })
        .await
}

pub async fn reminders_for_user(db: &Database, user_id: u64) -> Vec<ScheduledTask> {
    let mut reminders: Vec<ScheduledTask> = db
        .scheduled()
        .read(|book| {
            book.tasks
                .iter()
                .filter(|task| is_reminder_of(task, user_id))
                .cloned()
                .collect()
        })
        .await;
    reminders.sort_by_key(|task| task.due_at);
    reminders
}

/// Only the owner can cancel a reminder.
pub async fn cancel_reminder(db: &Database, user_id: u64, id: u64) -> anyhow::Result<bool> {
    remove_where(db, |task| task.id == id && is_reminder_of(task, user_id))
        .await
        .map(|n| n > 0)
}

fn is_unmute_of(task: &ScheduledTask, guild_id: u64, user_id: u64) -> bool {
    matches!(
        task.kind,
        TaskKind::Unmute { guild_id: g, user_id: u, .. } if g == guild_id && u == user_id
    )
}

fn is_reminder_of(task: &ScheduledTask, user_id: u64) -> bool {
    matches!(task.kind, TaskKind::Reminder { user_id: owner, .. } if owner == user_id)
}

async fn remove_where(
    db: &Database,
    predicate: impl Fn(&ScheduledTask) -> bool,
) -> anyhow::Result<usize> {
    let present = db
        .scheduled()
        .read(|book| book.tasks.iter().any(&predicate))
        .await;
    if !present {
        return Ok(0);
    }

    db.scheduled()
        .update(|book| {
            let before = book.tasks.len();
            book.tasks.retain(|task| !predicate(task));
            before - book.tasks.len()
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::temp_database;

    fn reminder(user_id: u64, message: &str) -> TaskKind {
        TaskKind::Reminder {
            user_id,
            channel_id: 1,
            message: message.to_owned(),
            created_at: 0,
        }
    }

    fn unmute(guild_id: u64, user_id: u64) -> TaskKind {
        TaskKind::Unmute {
            guild_id,
            user_id,
            role_id: 3,
            channel_id: 4,
        }
    }

    #[tokio::test]
    async fn due_tasks_stay_until_completed() {
        let (dir, db) = temp_database().await;

        let late = schedule_task(&db, 500, reminder(1, "late")).await.unwrap();
        let early = schedule_task(&db, 100, reminder(1, "early")).await.unwrap();
        assert_ne!(late, early);

        let due = due_tasks(&db, 100).await;
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, early);

        // Still pending after a restart until completed.
        let reopened = Database::open(dir.path()).await.unwrap();
        assert_eq!(due_tasks(&reopened, 1_000).await.len(), 2);

        assert!(complete_task(&reopened, early).await.unwrap());
        assert!(!complete_task(&reopened, early).await.unwrap());
        let remaining = due_tasks(&reopened, 1_000).await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, late);
    }

    #[tokio::test]
    async fn unmute_cancellation_targets_one_member() {
        let (_dir, db) = temp_database().await;

        schedule_task(&db, 10, unmute(1, 20)).await.unwrap();
        schedule_task(&db, 10, unmute(1, 21)).await.unwrap();
        schedule_task(&db, 10, reminder(20, "keep me")).await.unwrap();

        assert!(pending_unmute(&db, 1, 20).await.is_some());
        assert_eq!(cancel_unmute(&db, 1, 20).await.unwrap(), 1);
        assert!(pending_unmute(&db, 1, 20).await.is_none());
        assert!(pending_unmute(&db, 1, 21).await.is_some());
        assert_eq!(reminders_for_user(&db, 20).await.len(), 1);
    }

    #[tokio::test]
    async fn remuting_replaces_the_pending_unmute() {
        let (_dir, db) = temp_database().await;

        schedule_unmute(&db, 100, 1, 20, 3, 4).await.unwrap();
        schedule_unmute(&db, 100, 1, 21, 3, 4).await.unwrap();
        let latest = schedule_unmute(&db, 900, 1, 20, 3, 5).await.unwrap();

        assert!(due_tasks(&db, 100)
            .await
            .iter()
            .all(|task| !matches!(task.kind, TaskKind::Unmute { user_id: 20, .. })));

        let due = due_tasks(&db, 1_000).await;
        let for_member: Vec<_> = due
            .iter()
            .filter(|task| matches!(task.kind, TaskKind::Unmute { user_id: 20, .. }))
            .collect();
        assert_eq!(for_member.len(), 1);
        assert_eq!(for_member[0].id, latest);
        assert_eq!(pending_unmute(&db, 1, 21).await.map(|task| task.due_at), Some(100));
    }

    #[tokio::test]
    async fn reminders_are_owned() {
        let (_dir, db) = temp_database().await;

        let id = schedule_task(&db, 10, reminder(7, "stretch")).await.unwrap();
        assert!(!cancel_reminder(&db, 8, id).await.unwrap());
        assert!(cancel_reminder(&db, 7, id).await.unwrap());
        assert!(reminders_for_user(&db, 7).await.is_empty());
    }
}
