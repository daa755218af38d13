use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::document::JsonDocument;
use crate::model::afk::AfkRecord;
use crate::model::automod::AutoModConfig;
use crate::model::scheduled::ScheduleBook;
use crate::model::warnings::WarningBook;

#[derive(Debug)]
struct Documents {
    prefixes: JsonDocument<HashMap<u64, String>>,
    warnings: JsonDocument<WarningBook>,
    modlog: JsonDocument<HashMap<u64, u64>>,
    afk: JsonDocument<HashMap<u64, AfkRecord>>,
    automod: JsonDocument<HashMap<u64, AutoModConfig>>,
    scheduled: JsonDocument<ScheduleBook>,
}

/// Shared handle to every persisted document, passed across crates.
#[derive(Clone, Debug)]
pub struct Database {
    data_dir: PathBuf,
    documents: Arc<Documents>,
}

impl Database {
    /// Load every document from `data_dir`.
    pub async fn open(data_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.into();

        let documents = Documents {
            prefixes: JsonDocument::load(data_dir.join("prefixes.json")).await?,
            warnings: JsonDocument::load(data_dir.join("warnings.json")).await?,
            modlog: JsonDocument::load(data_dir.join("modlog.json")).await?,
            afk: JsonDocument::load(data_dir.join("afk.json")).await?,
            automod: JsonDocument::load(data_dir.join("automod.json")).await?,
            scheduled: JsonDocument::load(data_dir.join("scheduled.json")).await?,
        };

        Ok(Self {
            data_dir,
            documents: Arc::new(documents),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub(crate) fn prefixes(&self) -> &JsonDocument<HashMap<u64, String>> {
        &self.documents.prefixes
    }

    pub(crate) fn warnings(&self) -> &JsonDocument<WarningBook> {
        &self.documents.warnings
    }

    pub(crate) fn modlog(&self) -> &JsonDocument<HashMap<u64, u64>> {
        &self.documents.modlog
    }

    pub(crate) fn afk(&self) -> &JsonDocument<HashMap<u64, AfkRecord>> {
        &self.documents.afk
    }

    pub(crate) fn automod(&self) -> &JsonDocument<HashMap<u64, AutoModConfig>> {
        &self.documents.automod
    }

    pub(crate) fn scheduled(&self) -> &JsonDocument<ScheduleBook> {
        &self.documents.scheduled
    }
}

#[cfg(test)]
pub(crate) async fn temp_database() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db = Database::open(dir.path()).await.expect("open database");
    (dir, db)
}
