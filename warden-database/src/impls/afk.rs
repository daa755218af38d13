use crate::Database;
use crate::model::afk::AfkRecord;

pub async fn set_afk(db: &Database, user_id: u64, reason: &str, since: u64) -> anyhow::Result<()> {
    let record = AfkRecord {
        reason: reason.to_owned(),
        since,
    };
    db.afk()
        .update(|map| {
            map.insert(user_id, record);
        })
        .await
}

pub async fn get_afk(db: &Database, user_id: u64) -> Option<AfkRecord> {
    db.afk().read(|map| map.get(&user_id).cloned()).await
}

/// Remove and return the record, skipping the write when there is none.
pub async fn take_afk(db: &Database, user_id: u64) -> anyhow::Result<Option<AfkRecord>> {
    if get_afk(db, user_id).await.is_none() {
        return Ok(None);
    }

    db.afk().update(|map| map.remove(&user_id)).await
}

#[cfg(test)]
mod tests {
    use super::{get_afk, set_afk, take_afk};
    use crate::database::temp_database;

    #[tokio::test]
    async fn take_clears_the_record() {
        let (_dir, db) = temp_database().await;

        set_afk(&db, 5, "lunch", 1_700_000_000).await.unwrap();
        let record = get_afk(&db, 5).await.unwrap();
        assert_eq!(record.reason, "lunch");

        let taken = take_afk(&db, 5).await.unwrap();
        assert_eq!(taken, Some(record));
        assert_eq!(take_afk(&db, 5).await.unwrap(), None);
    }
}
