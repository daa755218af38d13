use crate::Database;

pub async fn get_prefix(db: &Database, guild_id: u64) -> Option<String> {
    db.prefixes().read(|map| map.get(&guild_id).cloned()).await
}

pub async fn set_prefix(db: &Database, guild_id: u64, prefix: &str) -> anyhow::Result<()> {
    db.prefixes()
        .update(|map| {
            map.insert(guild_id, prefix.to_owned());
        })
        .await
}

/// Returns whether a custom prefix was stored.
pub async fn clear_prefix(db: &Database, guild_id: u64) -> anyhow::Result<bool> {
    db.prefixes()
        .update(|map| map.remove(&guild_id).is_some())
        .await
}

#[cfg(test)]
mod tests {
    use super::{clear_prefix, get_prefix, set_prefix};
    use crate::database::temp_database;

    #[tokio::test]
    async fn prefix_round_trips_and_clears() {
        let (_dir, db) = temp_database().await;

        assert_eq!(get_prefix(&db, 1).await, None);
        set_prefix(&db, 1, "?").await.unwrap();
        set_prefix(&db, 2, "$$").await.unwrap();
        assert_eq!(get_prefix(&db, 1).await.as_deref(), Some("?"));

        assert!(clear_prefix(&db, 1).await.unwrap());
        assert!(!clear_prefix(&db, 1).await.unwrap());
        assert_eq!(get_prefix(&db, 2).await.as_deref(), Some("$$"));
    }
}
