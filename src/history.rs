use crate::verdict::{AnalysisOutput, Status};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    /// Milliseconds since the epoch, unique within a history.
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    /// Leading characters of the scanned content.
    pub text: String,
    pub status: Status,
    pub risk_score: u32,
}

impl ScanRecord {
    pub fn new(content: &str, output: &AnalysisOutput, preview_chars: usize) -> Self {
        let timestamp = Utc::now();
        Self {
            id: timestamp.timestamp_millis(),
            timestamp,
            text: content.chars().take(preview_chars).collect(),
            status: output.status,
            risk_score: output.risk_score,
        }
    }
}

/// Persistence for scan records, most recent first.
pub trait HistoryStore {
    fn load(&self) -> Result<Vec<ScanRecord>>;
    fn persist(&self, records: &[ScanRecord]) -> Result<()>;
}

/// Keeps the whole history as one JSON array on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ScanRecord>> {
        if !self.path.exists() {
            log::debug!("No history file at {}", self.path.display());
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history file: {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt history file: {}", self.path.display()))?;
        Ok(records)
    }

    fn persist(&self, records: &[ScanRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create history directory: {}", parent.display())
                })?;
            }
        }

        let content = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ScanRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<ScanRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("history store lock poisoned"))?;
        Ok(records.clone())
    }

    fn persist(&self, records: &[ScanRecord]) -> Result<()> {
        let mut stored = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("history store lock poisoned"))?;
        *stored = records.to_vec();
        Ok(())
    }
}

/// Bounded scan history owned by the caller.
///
/// New records go to the front; once the capacity is exceeded the oldest
/// record is dropped. Every change rewrites the store with the full list.
pub struct ScanHistory<S: HistoryStore> {
    store: S,
    records: VecDeque<ScanRecord>,
    capacity: usize,
}

impl<S: HistoryStore> ScanHistory<S> {
    pub fn open(store: S, capacity: usize) -> Result<Self> {
        let capacity = capacity.max(1);
        let mut records: VecDeque<ScanRecord> = store.load()?.into();
        if records.len() > capacity {
            log::info!(
                "Trimming stored history from {} to {} records",
                records.len(),
                capacity
            );
            records.truncate(capacity);
        }

        Ok(Self {
            store,
            records,
            capacity,
        })
    }

    /// Adds a scan and persists the history.
    ///
    /// When persisting fails the record is still kept in memory and the
    /// error is returned to the caller.
    pub fn record(
        &mut self,
        content: &str,
        output: &AnalysisOutput,
        preview_chars: usize,
    ) -> Result<ScanRecord> {
        self.push(ScanRecord::new(content, output, preview_chars));
        self.persist()?;
        self.records
            .front()
            .cloned()
            .context("history is empty after insert")
    }

    pub fn push(&mut self, mut record: ScanRecord) {
        if let Some(latest) = self.records.front() {
            if record.id <= latest.id {
                record.id = latest.id + 1;
            }
        }

        self.records.push_front(record);
        while self.records.len() > self.capacity {
            if let Some(evicted) = self.records.pop_back() {
                log::debug!("Evicted scan {} from history", evicted.id);
            }
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.persist()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanRecord> {
        self.records.iter()
    }

    pub fn recent(&self, limit: usize) -> Vec<&ScanRecord> {
        self.records.iter().take(limit).collect()
    }

    pub fn records(&self) -> Vec<ScanRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) -> Result<()> {
        self.store.persist(self.records.make_contiguous())
    }
}
