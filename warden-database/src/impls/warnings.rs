use crate::Database;
use crate::model::warnings::{WarningEntry, WarningRecord};

pub async fn record_warning(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    moderator_id: u64,
    reason: &str,
    warned_at: u64,
) -> anyhow::Result<WarningRecord> {
    let entry = WarningEntry {
        warned_at,
        moderator_id,
        reason: reason.to_owned(),
    };

    db.warnings()
        .update(|book| {
            let list = book
                .entry(guild_id)
                .or_default()
                .entry(user_id)
                .or_default();
            list.push(entry);
            WarningRecord {
                warn_number: list.len(),
            }
        })
        .await
}

pub async fn list_warnings(db: &Database, guild_id: u64, user_id: u64) -> Vec<WarningEntry> {
    db.warnings()
        .read(|book| {
            book.get(&guild_id)
                .and_then(|users| users.get(&user_id))
                .cloned()
                .unwrap_or_default()
        })
        .await
}

/// Returns how many warnings were removed.
pub async fn clear_warnings(db: &Database, guild_id: u64, user_id: u64) -> anyhow::Result<usize> {
    db.warnings()
        .update(|book| {
            let Some(users) = book.get_mut(&guild_id) else {
                return 0;
            };
            let removed = users.remove(&user_id).map_or(0, |list| list.len());
            if users.is_empty() {
                book.remove(&guild_id);
            }
            removed
        })
        .await
}

/// Returns how many warnings were removed across the guild.
pub async fn clear_guild_warnings(db: &Database, guild_id: u64) -> anyhow::Result<usize> {
    db.warnings()
        .update(|book| {
            book.remove(&guild_id)
                .map_or(0, |users| users.values().map(Vec::len).sum())
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::temp_database;

    #[tokio::test]
    async fn warnings_count_up_per_guild() {
        let (_dir, db) = temp_database().await;

        let first = record_warning(&db, 1, 42, 7, "spam", 100).await.unwrap();
        let second = record_warning(&db, 1, 42, 7, "more spam", 200).await.unwrap();
        let other_guild = record_warning(&db, 2, 42, 7, "elsewhere", 300).await.unwrap();

        assert_eq!(first.warn_number, 1);
        assert_eq!(second.warn_number, 2);
        assert_eq!(other_guild.warn_number, 1);

        let listed = list_warnings(&db, 1, 42).await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].reason, "more spam");
    }

    #[tokio::test]
    async fn clearing_is_scoped() {
        let (_dir, db) = temp_database().await;

        record_warning(&db, 1, 10, 7, "a", 1).await.unwrap();
        record_warning(&db, 1, 10, 7, "b", 2).await.unwrap();
        record_warning(&db, 1, 11, 7, "c", 3).await.unwrap();
        record_warning(&db, 2, 10, 7, "d", 4).await.unwrap();

        assert_eq!(clear_warnings(&db, 1, 10).await.unwrap(), 2);
        assert_eq!(clear_warnings(&db, 1, 10).await.unwrap(), 0);
        assert_eq!(list_warnings(&db, 1, 11).await.len(), 1);

        assert_eq!(clear_guild_warnings(&db, 1).await.unwrap(), 1);
        assert!(list_warnings(&db, 1, 11).await.is_empty());
        assert_eq!(list_warnings(&db, 2, 10).await.len(), 1);
    }
}
