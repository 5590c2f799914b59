//! AIDOC Storage - Storage Trait and Mock Implementation
//!
//! Defines the storage abstraction for AI document records and an
//! in-memory store. Engines own uniqueness of `uuid`/`id` and per-record
//! atomicity; the [`DocumentRepository`] composes them with validation.

pub mod repository;

pub use repository::DocumentRepository;

use aidoc_core::{
    AiDocument, AidocResult, DeletionStatus, DocumentStatus, RecordId, StorageError, Timestamp,
    MAX_ROW_ID,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

// ============================================================================
// STORAGE TRAIT
// ============================================================================

/// Storage trait for AI document records.
pub trait DocumentStore: Send + Sync {
    /// Persist a new record. A record without `id` gets the next free row
    /// id. Returns the record as stored.
    fn document_insert(&self, doc: AiDocument) -> AidocResult<AiDocument>;

    /// Get a record by UUID.
    fn document_get(&self, uuid: &str) -> AidocResult<Option<AiDocument>>;

    /// Get a record by row id.
    fn document_get_by_id(&self, id: RecordId) -> AidocResult<Option<AiDocument>>;

    /// Replace a stored record, provided its `updatedAt` still equals
    /// `expected_updated_at` (optimistic concurrency).
    fn document_replace(&self, doc: AiDocument, expected_updated_at: Timestamp)
        -> AidocResult<()>;

    /// List records by lifecycle status.
    fn document_list_by_status(&self, status: DocumentStatus) -> AidocResult<Vec<AiDocument>>;

    /// List records by deletion workflow status. Absent counts as `Pending`.
    fn document_list_by_deletion_status(
        &self,
        status: DeletionStatus,
    ) -> AidocResult<Vec<AiDocument>>;

    /// Number of stored records.
    fn document_count(&self) -> AidocResult<usize>;
}

// ============================================================================
// MOCK STORAGE
// ============================================================================

#[derive(Debug)]
struct Tables {
    by_uuid: HashMap<String, AiDocument>,
    by_id: HashMap<RecordId, String>,
    next_id: RecordId,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            by_uuid: HashMap::new(),
            by_id: HashMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory store. Clones share the same tables.
#[derive(Debug, Clone)]
pub struct MockStorage {
    tables: Arc<RwLock<Tables>>,
    max_row_id: RecordId,
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::with_max_row_id(MAX_ROW_ID)
    }
}

impl MockStorage {
    /// Create a new mock storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock storage with a custom row id ceiling.
    pub fn with_max_row_id(max_row_id: RecordId) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            max_row_id,
        }
    }

    /// Clear all stored data.
    pub fn clear(&self) -> AidocResult<()> {
        let mut tables = self.write()?;
        *tables = Tables::default();
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables.write().map_err(|_| StorageError::LockPoisoned)
    }
}

impl DocumentStore for MockStorage {
    fn document_insert(&self, mut doc: AiDocument) -> AidocResult<AiDocument> {
        let mut tables = self.write()?;
        if tables.by_uuid.contains_key(&doc.uuid) {
            return Err(StorageError::DuplicateUuid { uuid: doc.uuid }.into());
        }

        let id = match doc.id {
            Some(id) if tables.by_id.contains_key(&id) => {
                return Err(StorageError::DuplicateId { id }.into());
            }
            Some(id) => id,
            None => {
                let mut candidate = tables.next_id;
                while tables.by_id.contains_key(&candidate) {
                    candidate += 1;
                }
                if candidate > self.max_row_id {
                    return Err(StorageError::IdSpaceExhausted.into());
                }
                candidate
            }
        };
        if id >= tables.next_id {
            tables.next_id = id + 1;
        }

        doc.id = Some(id);
        tables.by_id.insert(id, doc.uuid.clone());
        tables.by_uuid.insert(doc.uuid.clone(), doc.clone());
        Ok(doc)
    }

    fn document_get(&self, uuid: &str) -> AidocResult<Option<AiDocument>> {
        let tables = self.read()?;
        Ok(tables.by_uuid.get(uuid).cloned())
    }

    fn document_get_by_id(&self, id: RecordId) -> AidocResult<Option<AiDocument>> {
        let tables = self.read()?;
        Ok(tables
            .by_id
            .get(&id)
            .and_then(|uuid| tables.by_uuid.get(uuid))
            .cloned())
    }

    fn document_replace(
        &self,
        doc: AiDocument,
        expected_updated_at: Timestamp,
    ) -> AidocResult<()> {
        let mut tables = self.write()?;
        let stored = tables
            .by_uuid
            .get_mut(&doc.uuid)
            .ok_or_else(|| StorageError::NotFound {
                key: doc.uuid.clone(),
            })?;

        if stored.updated_at != expected_updated_at {
            warn!(
                uuid = %doc.uuid,
                expected = %expected_updated_at,
                found = %stored.updated_at,
                "rejecting write from stale snapshot"
            );
            return Err(StorageError::StaleSnapshot {
                uuid: doc.uuid,
                expected: expected_updated_at.to_rfc3339(),
                found: stored.updated_at.to_rfc3339(),
            }
            .into());
        }
        if stored.id != doc.id {
            return Err(StorageError::IdChanged { uuid: doc.uuid }.into());
        }

        *stored = doc;
        Ok(())
    }

    fn document_list_by_status(&self, status: DocumentStatus) -> AidocResult<Vec<AiDocument>> {
        let tables = self.read()?;
        let mut docs: Vec<_> = tables
            .by_uuid
            .values()
            .filter(|d| d.document_status == status)
            .cloned()
            .collect();
        docs.sort_by_key(|d| d.id);
        Ok(docs)
    }

    fn document_list_by_deletion_status(
        &self,
        status: DeletionStatus,
    ) -> AidocResult<Vec<AiDocument>> {
        let tables = self.read()?;
        let mut docs: Vec<_> = tables
            .by_uuid
            .values()
            .filter(|d| d.deletion_status_or_pending() == status)
            .cloned()
            .collect();
        docs.sort_by_key(|d| d.id);
        Ok(docs)
    }

    fn document_count(&self) -> AidocResult<usize> {
        Ok(self.read()?.by_uuid.len())
    }
}

// ============================================================================
// TESTS
// ============================================================================
