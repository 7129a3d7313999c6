//! Customer record storage.
//!
//! [`CustomerStore`] is the persistence port used by
//! [`CustomerService`](crate::service::CustomerService). Records are opaque JSON documents
//! keyed by [`ClientId`]; the store never interprets them.
//!
//! - [`FsCustomerStore`] keeps one directory per record under a two-level shard:
//!   `customers/<s1>/<s2>/<id>/customer_data.json`.
//! - [`MemoryCustomerStore`] keeps documents in a map and is used by tests and tooling.

use crate::constants::CUSTOMER_JSON_FILENAME;
use crate::{IntakeError, IntakeResult};
use intake_uuid::ClientId;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tempfile::NamedTempFile;

/// Persistence port for customer documents.
pub trait CustomerStore: Send + Sync {
    /// Stores a new document for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::IdentifierCollision`] if a record for `id` already exists. The
    /// existing record is never touched. Any other error leaves no trace of the new record.
    fn write(&self, id: &ClientId, document: &str) -> IntakeResult<()>;

    /// Returns the stored document, or `None` if no record exists for `id`.
    fn read(&self, id: &ClientId) -> IntakeResult<Option<String>>;

    /// Returns every stored document.
    fn list(&self) -> IntakeResult<Vec<(ClientId, String)>>;
}

/// Filesystem-backed store rooted at the `customers` directory.
#[derive(Clone, Debug)]
pub struct FsCustomerStore {
    customers_dir: PathBuf,
}

impl FsCustomerStore {
    pub fn new(customers_dir: impl Into<PathBuf>) -> Self {
        Self {
            customers_dir: customers_dir.into(),
        }
    }

    /// Path of the JSON document for `id`.
    pub fn document_path(&self, id: &ClientId) -> PathBuf {
        id.sharded_dir(&self.customers_dir).join(CUSTOMER_JSON_FILENAME)
    }

    /// Claims the record directory for `id`.
    ///
    /// `create_dir` is atomic, so exactly one writer can own a given identifier.
    fn create_record_dir(&self, id: &ClientId) -> IntakeResult<PathBuf> {
        let record_dir = id.sharded_dir(&self.customers_dir);

        if let Some(parent) = record_dir.parent() {
            fs::create_dir_all(parent).map_err(IntakeError::StorageDirCreation)?;
        }

        match fs::create_dir(&record_dir) {
            Ok(()) => Ok(record_dir),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(IntakeError::IdentifierCollision(*id))
            }
            Err(e) => Err(IntakeError::CustomerDirCreation(e)),
        }
    }
}

/// Writes `document` next to its final path and renames it into place once synced.
fn write_document_atomically(record_dir: &Path, document: &str) -> IntakeResult<()> {
    let mut tmp = NamedTempFile::new_in(record_dir).map_err(IntakeError::FileWrite)?;
    tmp.write_all(document.as_bytes()).map_err(IntakeError::FileWrite)?;
    tmp.as_file().sync_all().map_err(IntakeError::FileWrite)?;
    tmp.persist(record_dir.join(CUSTOMER_JSON_FILENAME))
        .map_err(|e| IntakeError::FileWrite(e.error))?;
    sync_dir(record_dir)
}

/// Flushes directory entries so a completed rename survives a crash.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> IntakeResult<()> {
    fs::File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(IntakeError::FileWrite)
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> IntakeResult<()> {
    Ok(())
}

/// Fills a freshly claimed record directory, removing it again if the write fails.
fn populate_record_dir(record_dir: &Path, document: &str) -> IntakeResult<()> {
    if let Err(write_error) = write_document_atomically(record_dir, document) {
        if let Err(cleanup_error) = fs::remove_dir_all(record_dir) {
            return Err(IntakeError::CleanupAfterCreateFailed {
                path: record_dir.to_path_buf(),
                create_error: Box::new(write_error),
                cleanup_error,
            });
        }
        return Err(write_error);
    }
    Ok(())
}

impl CustomerStore for FsCustomerStore {
    fn write(&self, id: &ClientId, document: &str) -> IntakeResult<()> {
        let record_dir = self.create_record_dir(id)?;
        populate_record_dir(&record_dir, document)?;

        tracing::debug!(client_id = %id, "customer record written");
        Ok(())
    }

    fn read(&self, id: &ClientId) -> IntakeResult<Option<String>> {
        match fs::read_to_string(self.document_path(id)) {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(IntakeError::FileRead(e)),
        }
    }

    fn list(&self) -> IntakeResult<Vec<(ClientId, String)>> {
        let mut records = Vec::new();

        for s1 in read_dir_if_exists(&self.customers_dir)? {
            for s2 in read_dir_if_exists(&s1)? {
                for record_dir in read_dir_if_exists(&s2)? {
                    let Some(name) = record_dir.file_name().and_then(|n| n.to_str()) else {
                        continue;
                    };
                    let id = match ClientId::parse(name) {
                        Ok(id) => id,
                        Err(e) => {
                            tracing::warn!(path = %record_dir.display(), "skipping entry: {}", e);
                            continue;
                        }
                    };
                    // A directory without a document is a create still in flight.
                    if let Some(document) = self.read(&id)? {
                        records.push((id, document));
                    }
                }
            }
        }

        Ok(records)
    }
}

/// Lists subdirectories of `dir`; a missing `dir` has none.
fn read_dir_if_exists(dir: &Path) -> IntakeResult<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(IntakeError::FileRead(e)),
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(IntakeError::FileRead)?;
        if entry.file_type().map_err(IntakeError::FileRead)?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// In-memory store. Collision semantics match [`FsCustomerStore`].
#[derive(Debug, Default)]
pub struct MemoryCustomerStore {
    records: RwLock<BTreeMap<ClientId, String>>,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> IntakeError {
    IntakeError::StoreUnavailable("customer store lock poisoned".into())
}

impl CustomerStore for MemoryCustomerStore {
    fn write(&self, id: &ClientId, document: &str) -> IntakeResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        if records.contains_key(id) {
            return Err(IntakeError::IdentifierCollision(*id));
        }
        records.insert(*id, document.to_owned());
        Ok(())
    }

    fn read(&self, id: &ClientId) -> IntakeResult<Option<String>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.get(id).cloned())
    }

    fn list(&self) -> IntakeResult<Vec<(ClientId, String)>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .map(|(id, document)| (*id, document.clone()))
            .collect())
    }
}
