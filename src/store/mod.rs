//! In-memory resource store shared by the item and analysis endpoints.

pub mod id;
pub mod record;

pub use id::IdGenerator;
pub use record::{fields_from_value, Record};

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors from ResourceStore
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Outcome of a delete. Deletes never fail, whether or not the id existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deleted {
    Removed,
    Absent,
}

/// Collection of records in insertion order.
///
/// Cheap to clone: clones share the same collection and id generator.
/// Update and delete locate records by linear scan.
#[derive(Debug, Clone)]
pub struct ResourceStore {
    name: &'static str,
    records: Arc<RwLock<Vec<Record>>>,
    ids: Arc<IdGenerator>,
}

impl ResourceStore {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            records: Arc::new(RwLock::new(Vec::new())),
            ids: Arc::new(IdGenerator::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Create a record from caller-supplied fields. Never fails.
    pub async fn create(&self, fields: Map<String, Value>) -> Record {
        let mut records = self.records.write().await;
        let record = Record::new(self.ids.next(), fields);
        records.push(record.clone());

        tracing::debug!("{}: created record {}", self.name, record.id);
        record
    }

    /// Snapshot of all records in insertion order.
    pub async fn list(&self) -> Vec<Record> {
        self.records.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Record> {
        let id = parse_id(id)?;
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Shallow-merge `partial` into the record with the given id.
    ///
    /// `id` is the raw path segment; anything that does not parse as an
    /// integer cannot match a record and yields `NotFound`.
    pub async fn update(&self, id: &str, partial: Map<String, Value>) -> Result<Record, StoreError> {
        let not_found = || StoreError::NotFound(format!("{} {}", self.name, id));
        let parsed = parse_id(id).ok_or_else(not_found)?;

        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == parsed)
            .ok_or_else(not_found)?;
        record.merge(partial);

        tracing::debug!("{}: updated record {}", self.name, parsed);
        Ok(record.clone())
    }

    /// Remove every record with the given id. Idempotent; unknown or
    /// non-numeric ids are a no-op.
    pub async fn delete(&self, id: &str) -> Deleted {
        let Some(parsed) = parse_id(id) else {
            return Deleted::Absent;
        };

        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != parsed);

        if records.len() < before {
            tracing::debug!("{}: deleted record {}", self.name, parsed);
            Deleted::Removed
        } else {
            Deleted::Absent
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Parse a path id. Surrounding whitespace is ignored.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}
