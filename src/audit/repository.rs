use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use super::domain::{AuditId, AuditRecord, Lead};

/// Storage abstraction over the two backing stores. The implementation is
/// chosen once at process start; callers never branch on it.
pub trait AuditStore: Send + Sync {
    fn put_audit(&self, record: &AuditRecord) -> Result<(), StoreError>;
    fn get_audit(&self, id: &AuditId) -> Result<Option<AuditRecord>, StoreError>;
    fn add_lead(&self, lead: &Lead) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Process-memory store used when no data directory is configured.
#[derive(Default)]
pub struct MemoryStore {
    audits: RwLock<HashMap<AuditId, AuditRecord>>,
    leads: RwLock<Vec<Lead>>,
}

impl MemoryStore {
    pub fn lead_count(&self) -> usize {
        self.leads
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl AuditStore for MemoryStore {
    fn put_audit(&self, record: &AuditRecord) -> Result<(), StoreError> {
        self.audits
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn get_audit(&self, id: &AuditId) -> Result<Option<AuditRecord>, StoreError> {
        Ok(self
            .audits
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned())
    }

    fn add_lead(&self, lead: &Lead) -> Result<(), StoreError> {
        self.leads
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(lead.clone());
        Ok(())
    }
}

/// Document store: one JSON file per audit under `audits/`, leads appended
/// to a JSON-lines file. Ids are timestamp-derived and filesystem-safe.
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(root.join("audits"))?;
        Ok(Self { root })
    }

    fn audit_path(&self, id: &AuditId) -> PathBuf {
        self.root.join("audits").join(format!("{}.json", id.0))
    }

    fn leads_path(&self) -> PathBuf {
        self.root.join("leads.jsonl")
    }
}

impl AuditStore for DocumentStore {
    fn put_audit(&self, record: &AuditRecord) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(record)?;
        fs::write(self.audit_path(&record.id), body)?;
        Ok(())
    }

    fn get_audit(&self, id: &AuditId) -> Result<Option<AuditRecord>, StoreError> {
        match fs::read(self.audit_path(id)) {
            Ok(body) => Ok(Some(serde_json::from_slice(&body)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn add_lead(&self, lead: &Lead) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.leads_path())?;
        let line = serde_json::to_string(lead)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}
