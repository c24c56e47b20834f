//! Match history storage
//!
//! [`MatchStore`] is the boundary the completion notifier saves through.
//! History is returned oldest first.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::record::MatchRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("match store unavailable: {0}")]
    Unavailable(String),

    #[error("match history is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("match history I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("match record rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn store_match(&self, record: MatchRecord) -> Result<(), StoreError>;

    async fn match_history(&self) -> Result<Vec<MatchRecord>, StoreError>;

    async fn matches_on(&self, date: &str) -> Result<Vec<MatchRecord>, StoreError> {
        let mut history = self.match_history().await?;
        history.retain(|r| r.date.as_deref() == Some(date));
        Ok(history)
    }

    async fn clear_history(&self) -> Result<(), StoreError>;
}

/// Records without both team names are never stored
fn check_record(record: &MatchRecord) -> Result<(), StoreError> {
    if record.team_a.trim().is_empty() || record.team_b.trim().is_empty() {
        return Err(StoreError::Rejected("team names are required".to_string()));
    }
    if record.winner.trim().is_empty() {
        return Err(StoreError::Rejected("winner is required".to_string()));
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<MatchRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<MatchRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn store_match(&self, record: MatchRecord) -> Result<(), StoreError> {
        check_record(&record)?;
        self.records.write().await.push(record);
        Ok(())
    }

    async fn match_history(&self) -> Result<Vec<MatchRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn clear_history(&self) -> Result<(), StoreError> {
        self.records.write().await.clear();
        Ok(())
    }
}

/// History kept as one JSON array in a file, rewritten on every store
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<MatchRecord>, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn write_all(&self, records: &[MatchRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), records = records.len(), "history written");
        Ok(())
    }
}

#[async_trait]
impl MatchStore for JsonFileStore {
    async fn store_match(&self, record: MatchRecord) -> Result<(), StoreError> {
        check_record(&record)?;
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_all().await?;
        records.push(record);
        self.write_all(&records).await
    }

    async fn match_history(&self) -> Result<Vec<MatchRecord>, StoreError> {
        self.read_all().await
    }

    async fn clear_history(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write_all(&[]).await?;
        info!(path = %self.path.display(), "match history cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ExtrasRecord, InningsRecord, TossRecord};

    fn record(team_a: &str, date: &str) -> MatchRecord {
        let innings = InningsRecord {
            batsmen: Vec::new(),
            bowlers: Vec::new(),
            extras: ExtrasRecord::default(),
            total_score: 100,
            wickets: 5,
            overs: 20,
            balls: 0,
        };
        MatchRecord {
            team_a: team_a.into(),
            team_b: "Tigers".into(),
            overs: 20,
            winner: team_a.into(),
            turns: 2,
            team_a_score: 100,
            team_b_score: 90,
            toss_info: TossRecord {
                winning_team: team_a.into(),
                choice: None,
            },
            date: Some(date.into()),
            innings1: innings.clone(),
            innings2: innings,
        }
    }

    #[tokio::test]
    async fn test_in_memory_store_and_filter() {
        let store = InMemoryStore::new();
        store.store_match(record("Lions", "2024-01-01")).await.unwrap();
        store.store_match(record("Eagles", "2024-01-02")).await.unwrap();

        assert_eq!(store.len().await, 2);
        let on_day = store.matches_on("2024-01-02").await.unwrap();
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].team_a, "Eagles");

        store.clear_history().await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_blank_team_is_rejected() {
        let store = InMemoryStore::new();
        let err = store.store_match(record("  ", "2024-01-01")).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_json_file_store_persists_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let store = JsonFileStore::new(&path);
        assert!(store.match_history().await.unwrap().is_empty());
        store.store_match(record("Lions", "2024-01-01")).await.unwrap();
        store.store_match(record("Eagles", "2024-01-02")).await.unwrap();

        let reopened = JsonFileStore::new(&path);
        let history = reopened.match_history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].team_a, "Lions");
        assert_eq!(history[1].team_a, "Eagles");

        reopened.clear_history().await.unwrap();
        assert!(store.match_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_file_store_reports_corrupt_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let err = JsonFileStore::new(&path).match_history().await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
