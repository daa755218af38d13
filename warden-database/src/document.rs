use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// One JSON file mirrored in memory.
///
/// Reads are served from memory. Every update is applied to a copy, the copy
/// is written to disk (temp file + rename), and only then does it replace the
/// in-memory value, so a failed write leaves both sides unchanged.
#[derive(Debug)]
pub struct JsonDocument<T> {
    path: PathBuf,
    state: Mutex<T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    /// Load `path`, starting empty when the file is missing or unreadable JSON.
    pub async fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();

        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<T>(&bytes) {
                Ok(state) => {
                    info!(path = %path.display(), "loaded document");
                    state
                }
                Err(source) => {
                    warn!(?source, path = %path.display(), "document is not valid JSON; starting empty");
                    T::default()
                }
            },
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "document not found; starting empty");
                T::default()
            }
            Err(source) => {
                return Err(source).with_context(|| format!("could not read `{}`", path.display()));
            }
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read<R>(&self, reader: impl FnOnce(&T) -> R) -> R {
        let state = self.state.lock().await;
        reader(&state)
    }

    /// Apply `mutate` and persist the whole document.
    pub async fn update<R>(&self, mutate: impl FnOnce(&mut T) -> R) -> anyhow::Result<R> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let result = mutate(&mut next);

        write_atomically(&self.path, &next).await?;
        *state = next;

        Ok(result)
    }
}

async fn write_atomically<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let payload = serde_json::to_vec_pretty(value)
        .with_context(|| format!("could not serialize `{}`", path.display()))?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("could not create directory `{}`", parent.display()))?;
    }

    let tmp_path = path.with_extension("json.new");
    tokio::fs::write(&tmp_path, payload)
        .await
        .with_context(|| format!("could not write `{}`", tmp_path.display()))?;
    tokio::fs::rename(&tmp_path, path).await.with_context(|| {
        format!(
            "could not rename `{}` to `{}`",
            tmp_path.display(),
            path.display()
        )
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::JsonDocument;

    #[tokio::test]
    async fn missing_file_starts_empty_and_updates_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefixes.json");

        let doc = JsonDocument::<HashMap<u64, String>>::load(&path).await.unwrap();
        assert!(doc.read(|map| map.is_empty()).await);

        doc.update(|map| map.insert(7, "?".to_owned())).await.unwrap();
        assert!(path.exists());

        let reloaded = JsonDocument::<HashMap<u64, String>>::load(&path).await.unwrap();
        assert_eq!(reloaded.read(|map| map.get(&7).cloned()).await, Some("?".to_owned()));
    }

    #[tokio::test]
    async fn malformed_file_is_replaced_on_next_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("afk.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let doc = JsonDocument::<HashMap<u64, u64>>::load(&path).await.unwrap();
        assert!(doc.read(|map| map.is_empty()).await);

        doc.update(|map| map.insert(1, 2)).await.unwrap();
        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: HashMap<u64, u64> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.get(&1), Some(&2));
    }
}
