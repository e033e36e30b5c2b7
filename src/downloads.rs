use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::FolioError;
use crate::id::new_id;
use crate::storage::StoreAdapter;

pub const DEFAULT_DOWNLOADS_KEY: &str = "portfolio_downloads";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadEvent {
    pub id: String,
    pub subject_id: String,
    pub subject_title: String,
    pub timestamp: DateTime<Utc>,
}

impl DownloadEvent {
    pub fn new(subject_id: &str, subject_title: &str) -> Self {
        Self {
            id: new_id(),
            subject_id: subject_id.to_string(),
            subject_title: subject_title.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadSummary {
    pub subject_id: String,
    /// Title from the most recent download of this subject.
    pub subject_title: String,
    pub count: usize,
    pub last_downloaded: DateTime<Utc>,
}

/// Append-only log of file downloads, kept under its own storage key.
pub struct DownloadLog<A: StoreAdapter> {
    adapter: A,
    key: String,
    write_lock: Mutex<()>,
}

impl<A: StoreAdapter> DownloadLog<A> {
    pub fn new(adapter: A) -> Self {
        Self::with_key(adapter, DEFAULT_DOWNLOADS_KEY)
    }

    pub fn with_key(adapter: A, key: impl Into<String>) -> Self {
        Self {
            adapter,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> crate::Result<Vec<DownloadEvent>> {
        let Some(raw) = self.adapter.read_raw(&self.key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| {
            FolioError::MalformedDocument(format!("download log {}: {e}", self.key))
        })
    }

    pub fn record(&self, subject_id: &str, subject_title: &str) -> crate::Result<DownloadEvent> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| FolioError::StorageUnavailable(e.to_string()))?;
        let mut events = self.load()?;
        let event = DownloadEvent::new(subject_id, subject_title);
        events.push(event.clone());
        self.adapter
            .write_raw(&self.key, &serde_json::to_string(&events)?)?;
        info!(subject_id, total = events.len(), "download recorded");
        Ok(event)
    }

    /// Every event in the order it was recorded. A log that cannot be parsed
    /// reads as empty; [`DownloadLog::record`] refuses to write over it.
    pub fn read_all(&self) -> crate::Result<Vec<DownloadEvent>> {
        match self.load() {
            Err(FolioError::MalformedDocument(reason)) => {
                warn!(key = %self.key, %reason, "download log unreadable, treating as empty");
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

/// Groups events by subject. Most-downloaded first; ties by subject id.
pub fn summarize(events: &[DownloadEvent]) -> Vec<DownloadSummary> {
    let mut by_subject: HashMap<&str, DownloadSummary> = HashMap::new();
    for event in events {
        let entry = by_subject
            .entry(event.subject_id.as_str())
            .or_insert_with(|| DownloadSummary {
                subject_id: event.subject_id.clone(),
                subject_title: event.subject_title.clone(),
                count: 0,
                last_downloaded: event.timestamp,
            });
        entry.count += 1;
        if event.timestamp >= entry.last_downloaded {
            entry.last_downloaded = event.timestamp;
            entry.subject_title = event.subject_title.clone();
        }
    }

    let mut summaries: Vec<DownloadSummary> = by_subject.into_values().collect();
    summaries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.subject_id.cmp(&b.subject_id))
    });
    summaries
}
