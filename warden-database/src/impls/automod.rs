use crate::Database;
use crate::model::automod::{AutoModConfig, AutoModFilter};

pub async fn get_automod_config(db: &Database, guild_id: u64) -> AutoModConfig {
    db.automod()
        .read(|map| map.get(&guild_id).cloned().unwrap_or_default())
        .await
}

/// Returns whether the filter set changed.
pub async fn set_filter_enabled(
    db: &Database,
    guild_id: u64,
    filter: AutoModFilter,
    enabled: bool,
) -> anyhow::Result<bool> {
    db.automod()
        .update(|map| {
            let config = map.entry(guild_id).or_default();
            if enabled {
                config.enabled_filters.insert(filter)
            } else {
                config.enabled_filters.remove(&filter)
            }
        })
        .await
}

/// Keywords are stored trimmed and lower-case. Returns false for duplicates
/// and blank input.
pub async fn add_keyword(db: &Database, guild_id: u64, keyword: &str) -> anyhow::Result<bool> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return Ok(false);
    }

    db.automod()
        .update(|map| map.entry(guild_id).or_default().keywords.insert(keyword))
        .await
}

pub async fn remove_keyword(db: &Database, guild_id: u64, keyword: &str) -> anyhow::Result<bool> {
    let keyword = keyword.trim().to_lowercase();

    db.automod()
        .update(|map| {
            map.get_mut(&guild_id)
                .is_some_and(|config| config.keywords.remove(&keyword))
        })
        .await
}

pub async fn set_channel_ignored(
    db: &Database,
    guild_id: u64,
    channel_id: u64,
    ignored: bool,
) -> anyhow::Result<bool> {
    db.automod()
        .update(|map| {
            let set = &mut map.entry(guild_id).or_default().ignored_channels;
            if ignored {
                set.insert(channel_id)
            } else {
                set.remove(&channel_id)
            }
        })
        .await
}

pub async fn set_role_ignored(
    db: &Database,
    guild_id: u64,
    role_id: u64,
    ignored: bool,
) -> anyhow::Result<bool> {
    db.automod()
        .update(|map| {
            let set = &mut map.entry(guild_id).or_default().ignored_roles;
            if ignored {
                set.insert(role_id)
            } else {
                set.remove(&role_id)
            }
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::temp_database;

    #[tokio::test]
    async fn filters_toggle_and_report_changes() {
        let (_dir, db) = temp_database().await;

        assert!(!get_automod_config(&db, 1).await.is_active());
        assert!(set_filter_enabled(&db, 1, AutoModFilter::Caps, true).await.unwrap());
        assert!(!set_filter_enabled(&db, 1, AutoModFilter::Caps, true).await.unwrap());
        assert!(get_automod_config(&db, 1).await.is_enabled(AutoModFilter::Caps));

        assert!(set_filter_enabled(&db, 1, AutoModFilter::Caps, false).await.unwrap());
        assert!(!get_automod_config(&db, 1).await.is_active());
    }

    #[tokio::test]
    async fn keywords_are_normalised() {
        let (_dir, db) = temp_database().await;

        assert!(add_keyword(&db, 1, "  BadWord ").await.unwrap());
        assert!(!add_keyword(&db, 1, "badword").await.unwrap());
        assert!(!add_keyword(&db, 1, "   ").await.unwrap());
        assert!(get_automod_config(&db, 1).await.keywords.contains("badword"));

        assert!(remove_keyword(&db, 1, "BADWORD").await.unwrap());
        assert!(!remove_keyword(&db, 2, "badword").await.unwrap());
    }

    #[tokio::test]
    async fn ignore_lists_are_per_guild() {
        let (_dir, db) = temp_database().await;

        assert!(set_channel_ignored(&db, 1, 50, true).await.unwrap());
        assert!(set_role_ignored(&db, 1, 60, true).await.unwrap());

        let config = get_automod_config(&db, 1).await;
        assert!(config.ignored_channels.contains(&50));
        assert!(config.ignored_roles.contains(&60));
        assert!(get_automod_config(&db, 2).await.ignored_channels.is_empty());

        assert!(set_channel_ignored(&db, 1, 50, false).await.unwrap());
        assert!(!set_role_ignored(&db, 1, 61, false).await.unwrap());
    }
}
