//! Persistence of finished tournaments.
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use taikai_core::TournamentRecord;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::auth::UserId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Stores the [`TournamentRecord`]s of each user.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Stores a new `record` for `user`.
    async fn insert(&self, user: &UserId, record: &TournamentRecord) -> Result<(), StoreError>;

    /// Returns all records of `user`, the most recent record first.
    async fn list(&self, user: &UserId) -> Result<Vec<TournamentRecord>, StoreError>;
}

/// A [`TournamentRecord`] together with its owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct StoredRecord {
    user_id: UserId,
    #[serde(flatten)]
    record: TournamentRecord,
}

fn records_of(records: &[StoredRecord], user: &UserId) -> Vec<TournamentRecord> {
    let mut records: Vec<TournamentRecord> = records
        .iter()
        .filter(|stored| stored.user_id == *user)
        .map(|stored| stored.record.clone())
        .collect();

    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

/// A [`RecordStore`] that only lives in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<StoredRecord>>,
}

impl MemoryStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, user: &UserId, record: &TournamentRecord) -> Result<(), StoreError> {
        self.records.write().push(StoredRecord {
            user_id: user.clone(),
            record: record.clone(),
        });

        Ok(())
    }

    async fn list(&self, user: &UserId) -> Result<Vec<TournamentRecord>, StoreError> {
        Ok(records_of(&self.records.read(), user))
    }
}

/// A [`RecordStore`] backed by a single JSON document on disk.
///
/// The whole document is rewritten on every insert. Writes go to a temporary file first, which
/// then replaces the document.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<StoredRecord>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(buf) => Ok(serde_json::from_slice(&buf)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, records: &[StoredRecord]) -> Result<(), StoreError> {
        let buf = serde_json::to_vec_pretty(records)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");

        tokio::fs::write(&tmp, buf).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn insert(&self, user: &UserId, record: &TournamentRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let mut records = self.read().await?;
        records.push(StoredRecord {
            user_id: user.clone(),
            record: record.clone(),
        });

        self.write(&records).await?;

        log::debug!(
            "Stored record {:?} in {}",
            record.tournament_name,
            self.path.display()
        );

        Ok(())
    }

    async fn list(&self, user: &UserId) -> Result<Vec<TournamentRecord>, StoreError> {
        let _guard = self.lock.lock().await;

        let records = self.read().await?;
        Ok(records_of(&records, user))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use taikai_core::{Competitor, TournamentRecord};

    use super::{FileStore, MemoryStore, RecordStore, StoreError};
    use crate::auth::UserId;

    fn record(name: &str, offset: i64) -> TournamentRecord {
        TournamentRecord {
            tournament_name: name.to_owned(),
            category: String::from("Kumite"),
            champion: Competitor::new("A", "X"),
            runner_up: Competitor::new("B", "Y"),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(offset),
        }
    }

    async fn check_store<S>(store: S)
    where
        S: RecordStore,
    {
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");

        store.insert(&alice, &record("first", 0)).await.unwrap();
        store.insert(&alice, &record("third", 20)).await.unwrap();
        store.insert(&bob, &record("other", 5)).await.unwrap();
        store.insert(&alice, &record("second", 10)).await.unwrap();

        let names: Vec<String> = store
            .list(&alice)
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.tournament_name)
            .collect();
        assert_eq!(names, ["third", "second", "first"]);

        assert_eq!(store.list(&bob).await.unwrap(), vec![record("other", 5)]);
        assert!(store.list(&UserId::from("carol")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store() {
        check_store(MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tournaments.json");

        check_store(FileStore::new(&path)).await;

        // A fresh store reads the same document.
        let store = FileStore::new(&path);
        assert_eq!(store.list(&UserId::from("alice")).await.unwrap().len(), 3);
        assert!(!dir.path().join("tournaments.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("missing.json"));

        assert!(store.list(&UserId::from("alice")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_corrupt_document() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not json").unwrap();

        let store = FileStore::new(file.path());
        assert!(matches!(
            store.list(&UserId::from("alice")).await,
            Err(StoreError::Json(_))
        ));
    }
}
