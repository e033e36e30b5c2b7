//! The record store: one JSON document holding every collection, persisted
//! whole under a single storage key.
//!
//! No document is cached between calls. Every operation reads the persisted
//! document, works on that copy and, for mutations, writes the whole document
//! back. Mutations hold the store's lock from read to write, so two threads
//! sharing a store cannot lose each other's updates. Separate processes
//! pointed at the same storage are not coordinated: last writer wins.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::FolioError;
use crate::id::new_id;
use crate::record::{merge_fields, Collection, Fields, Record};
use crate::seed::default_document;
use crate::storage::StoreAdapter;

pub const DEFAULT_STORAGE_KEY: &str = "portfolio_db";

pub struct RecordStore<A: StoreAdapter> {
    adapter: A,
    key: String,
    write_lock: Mutex<()>,
}

/// Structural findings about the persisted document. Produced by
/// [`RecordStore::audit`]; never changes anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentAudit {
    pub root_not_object: bool,
    pub missing: Vec<Collection>,
    pub not_arrays: Vec<Collection>,
    /// Collection and array index of entries without a string `id`.
    pub invalid_entries: Vec<(Collection, usize)>,
    pub duplicate_ids: Vec<(Collection, String)>,
    pub unknown_keys: Vec<String>,
}

impl DocumentAudit {
    pub fn is_clean(&self) -> bool {
        !self.root_not_object
            && self.missing.is_empty()
            && self.not_arrays.is_empty()
            && self.invalid_entries.is_empty()
            && self.duplicate_ids.is_empty()
            && self.unknown_keys.is_empty()
    }
}

fn id_of(value: &Value) -> Option<&str> {
    value.get("id").and_then(Value::as_str)
}

fn records_in(doc: &Value, collection: Collection) -> Vec<Record> {
    let Some(items) = doc.get(collection.as_str()).and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let record = Record::from_value(item);
            if record.is_none() {
                warn!(%collection, index, "skipping entry without a string id");
            }
            record
        })
        .collect()
}

impl<A: StoreAdapter> RecordStore<A> {
    pub fn new(adapter: A) -> Self {
        Self::with_key(adapter, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(adapter: A, key: impl Into<String>) -> Self {
        Self {
            adapter,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn lock(&self) -> crate::Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| FolioError::StorageUnavailable(e.to_string()))
    }

    fn read_document(&self) -> crate::Result<Option<Value>> {
        match self.adapter.read_raw(&self.key)? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                FolioError::MalformedDocument(format!("persisted document is not valid JSON: {e}"))
            }),
            None => Ok(None),
        }
    }

    fn save(&self, doc: &Value) -> crate::Result<()> {
        let raw = serde_json::to_string(doc)?;
        self.adapter.write_raw(&self.key, &raw)?;
        debug!(key = %self.key, bytes = raw.len(), "document saved");
        Ok(())
    }

    /// Caller must hold the write lock.
    fn load_locked(&self) -> crate::Result<Value> {
        if let Some(doc) = self.read_document()? {
            return Ok(doc);
        }
        let doc = default_document();
        self.save(&doc)?;
        info!(key = %self.key, "empty storage seeded with default document");
        Ok(doc)
    }

    // Reads skip the lock unless they have to seed, so a concurrent mutation
    // cannot be overwritten by a late seed.
    fn load(&self) -> crate::Result<Value> {
        if let Some(doc) = self.read_document()? {
            return Ok(doc);
        }
        let _guard = self.lock()?;
        self.load_locked()
    }

    /// Records of `collection` in display order. A collection that is absent
    /// or not an array reads as empty.
    pub fn get_all(&self, collection: Collection) -> crate::Result<Vec<Record>> {
        let doc = self.load()?;
        Ok(records_in(&doc, collection))
    }

    pub fn get_one(&self, collection: Collection, id: &str) -> crate::Result<Option<Record>> {
        Ok(self
            .get_all(collection)?
            .into_iter()
            .find(|record| record.id == id))
    }

    /// Typed view of a collection, e.g. `get_all_as::<Project>(Collection::Projects)`.
    pub fn get_all_as<T: DeserializeOwned>(&self, collection: Collection) -> crate::Result<Vec<T>> {
        self.get_all(collection)?
            .iter()
            .map(|record| serde_json::from_value(record.to_value()).map_err(FolioError::from))
            .collect()
    }

    /// Appends a new record with a freshly generated id. Any `id` in `fields`
    /// is discarded.
    pub fn add(&self, collection: Collection, fields: Fields) -> crate::Result<Record> {
        let _guard = self.lock()?;
        let mut doc = self.load_locked()?;
        let record = Record::new(new_id(), fields);

        let root = doc.as_object_mut().ok_or_else(|| {
            FolioError::MalformedDocument("document root is not an object".to_string())
        })?;
        let slot = root
            .entry(collection.as_str())
            .or_insert_with(|| Value::Array(Vec::new()));
        let items = slot.as_array_mut().ok_or_else(|| {
            FolioError::MalformedDocument(format!("collection {collection} is not an array"))
        })?;
        items.push(record.to_value());

        self.save(&doc)?;
        info!(%collection, id = %record.id, "record added");
        Ok(record)
    }

    /// Shallow-merges `partial` over the record with `id`. Returns `None`,
    /// without writing, when there is no such record.
    pub fn update(
        &self,
        collection: Collection,
        id: &str,
        partial: Fields,
    ) -> crate::Result<Option<Record>> {
        let _guard = self.lock()?;
        let mut doc = self.load_locked()?;

        let Some(items) = doc.get_mut(collection.as_str()).and_then(Value::as_array_mut) else {
            return Ok(None);
        };
        let Some(pos) = items.iter().position(|item| id_of(item) == Some(id)) else {
            return Ok(None);
        };
        if Record::from_value(&items[pos]).is_none() {
            return Ok(None);
        }
        // merged in place so the stored key order, `id` included, survives
        let Some(stored) = items[pos].as_object_mut() else {
            return Ok(None);
        };
        merge_fields(stored, partial);
        let Some(record) = Record::from_value(&items[pos]) else {
            return Ok(None);
        };

        self.save(&doc)?;
        info!(%collection, id, "record updated");
        Ok(Some(record))
    }

    /// Removes the record with `id`, keeping the order of the rest. Returns
    /// `false`, without writing, when there is no such record.
    pub fn delete(&self, collection: Collection, id: &str) -> crate::Result<bool> {
        let _guard = self.lock()?;
        let mut doc = self.load_locked()?;

        let Some(items) = doc.get_mut(collection.as_str()).and_then(Value::as_array_mut) else {
            return Ok(false);
        };
        let Some(pos) = items.iter().position(|item| id_of(item) == Some(id)) else {
            return Ok(false);
        };
        items.remove(pos);

        self.save(&doc)?;
        info!(%collection, id, "record deleted");
        Ok(true)
    }

    /// Drops the persisted document. The next read seeds a fresh one.
    pub fn reset(&self) -> crate::Result<()> {
        let _guard = self.lock()?;
        self.adapter.remove_raw(&self.key)?;
        info!(key = %self.key, "document reset");
        Ok(())
    }

    /// Pretty-printed JSON of the whole document, seeding first if needed.
    pub fn export_all(&self) -> crate::Result<String> {
        let doc = self.load()?;
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Replaces the whole document with `json`. Unparseable input fails with
    /// [`FolioError::MalformedInput`] and leaves storage untouched; the shape
    /// of parseable input is not checked (see [`RecordStore::audit`]).
    pub fn import_all(&self, json: &str) -> crate::Result<()> {
        let doc: Value = serde_json::from_str(json).map_err(FolioError::MalformedInput)?;
        let _guard = self.lock()?;
        self.save(&doc)?;
        info!(key = %self.key, "document imported");
        Ok(())
    }

    /// Record count per known collection, in [`Collection::ALL`] order.
    pub fn counts(&self) -> crate::Result<Vec<(Collection, usize)>> {
        let doc = self.load()?;
        Ok(Collection::ALL
            .into_iter()
            .map(|c| (c, records_in(&doc, c).len()))
            .collect())
    }

    pub fn audit(&self) -> crate::Result<DocumentAudit> {
        let doc = self.load()?;
        let mut audit = DocumentAudit::default();

        let Some(root) = doc.as_object() else {
            audit.root_not_object = true;
            audit.missing = Collection::ALL.to_vec();
            return Ok(audit);
        };

        for collection in Collection::ALL {
            let Some(value) = root.get(collection.as_str()) else {
                audit.missing.push(collection);
                continue;
            };
            let Some(items) = value.as_array() else {
                audit.not_arrays.push(collection);
                continue;
            };
            let mut seen = HashSet::new();
            for (index, item) in items.iter().enumerate() {
                match id_of(item) {
                    Some(id) if item.is_object() => {
                        if !seen.insert(id) {
                            audit.duplicate_ids.push((collection, id.to_string()));
                        }
                    }
                    _ => audit.invalid_entries.push((collection, index)),
                }
            }
        }

        audit.unknown_keys = root
            .keys()
            .filter(|k| !Collection::is_known(k))
            .cloned()
            .collect();
        Ok(audit)
    }
}
