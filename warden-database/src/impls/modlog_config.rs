use crate::Database;

pub async fn get_modlog_channel_id(db: &Database, guild_id: u64) -> Option<u64> {
    db.modlog().read(|map| map.get(&guild_id).copied()).await
}

pub async fn set_modlog_channel_id(
    db: &Database,
    guild_id: u64,
    channel_id: u64,
) -> anyhow::Result<()> {
    db.modlog()
        .update(|map| {
            map.insert(guild_id, channel_id);
        })
        .await
}

pub async fn clear_modlog_channel_id(db: &Database, guild_id: u64) -> anyhow::Result<bool> {
    db.modlog().update(|map| map.remove(&guild_id).is_some()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::temp_database;

    #[tokio::test]
    async fn modlog_channel_survives_reopen() {
        let (dir, db) = temp_database().await;
        set_modlog_channel_id(&db, 10, 99).await.unwrap();

        let reopened = Database::open(dir.path()).await.unwrap();
        assert_eq!(get_modlog_channel_id(&reopened, 10).await, Some(99));
        assert!(clear_modlog_channel_id(&reopened, 10).await.unwrap());
        assert_eq!(get_modlog_channel_id(&reopened, 10).await, None);
    }
}
