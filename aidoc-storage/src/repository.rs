//! Validating repository: every write goes through the validator before it
//! reaches the store, and updates are applied against the stored snapshot.

use crate::DocumentStore;
use aidoc_core::{
    AiDocument, AidocResult, DeletionStatus, FieldMap, StorageError, Timestamp,
};
use aidoc_guard::{Validated, Validator};
use tracing::{debug, info};

/// Composes a [`Validator`] with a [`DocumentStore`].
#[derive(Debug)]
pub struct DocumentRepository<S: DocumentStore> {
    store: S,
    validator: Validator,
}

impl<S: DocumentStore> DocumentRepository<S> {
    pub fn new(store: S, validator: Validator) -> Self {
        Self { store, validator }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn get(&self, uuid: &str) -> AidocResult<Option<AiDocument>> {
        self.store.document_get(uuid)
    }

    fn require(&self, uuid: &str) -> AidocResult<AiDocument> {
        self.store
            .document_get(uuid)?
            .ok_or_else(|| {
                StorageError::NotFound {
                    key: uuid.to_string(),
                }
                .into()
            })
    }

    /// Validate and persist a new record.
    pub fn create(&self, candidate: &FieldMap) -> AidocResult<Validated> {
        let validated = self.validator.validate_insert(candidate)?;
        let stored = self.store.document_insert(validated.record)?;
        info!(uuid = %stored.uuid, id = ?stored.id, "document inserted");
        Ok(Validated {
            record: stored,
            warnings: validated.warnings,
        })
    }

    /// Validate a change against the stored record and write it back if the
    /// record has not moved underneath us.
    pub fn update(&self, uuid: &str, candidate: &FieldMap) -> AidocResult<Validated> {
        let previous = self.require(uuid)?;
        let validated = self.validator.validate_update(&previous, candidate)?;
        if validated.record == previous {
            debug!(uuid = %uuid, "update left record unchanged");
            return Ok(validated);
        }
        self.store
            .document_replace(validated.record.clone(), previous.updated_at)?;
        if validated.record.is_deleted() {
            info!(uuid = %uuid, "document redacted");
        } else {
            info!(uuid = %uuid, "document updated");
        }
        Ok(validated)
    }

    /// Move a record into `Scheduled`. `None` means immediate deletion is
    /// allowed as soon as it is redacted.
    pub fn schedule_deletion(
        &self,
        uuid: &str,
        updated_by: &str,
        scheduled_at: Option<Timestamp>,
        reason: &str,
    ) -> AidocResult<Validated> {
        let candidate = self
            .validator
            .lifecycle()
            .schedule_deletion_candidate(updated_by, scheduled_at, reason);
        self.update(uuid, &candidate)
    }

    /// Retire a record: statuses to `Deleted` and personal content nulled.
    pub fn redact(&self, uuid: &str, updated_by: &str, reason: &str) -> AidocResult<Validated> {
        let candidate = self
            .validator
            .lifecycle()
            .redaction_candidate(updated_by, reason);
        self.update(uuid, &candidate)
    }

    /// Independent inserts; one failure does not affect the others.
    pub fn insert_batch(&self, candidates: &[FieldMap]) -> Vec<AidocResult<Validated>> {
        let results: Vec<_> = candidates.iter().map(|c| self.create(c)).collect();
        let accepted = results.iter().filter(|r| r.is_ok()).count();
        info!(
            total = candidates.len(),
            accepted,
            rejected = candidates.len() - accepted,
            "batch insert finished"
        );
        results
    }

    /// Scheduled records whose deletion time has passed, or that have none.
    pub fn due_for_deletion(&self, now: Timestamp) -> AidocResult<Vec<AiDocument>> {
        Ok(self
            .store
            .document_list_by_deletion_status(DeletionStatus::Scheduled)?
            .into_iter()
            .filter(|d| d.deletion_scheduled_at.map_or(true, |at| at <= now))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockStorage;
    use aidoc_core::{DocumentStatus, ViolationKind};
    use aidoc_test_utils::assertions::{
        assert_accepted, assert_not_found, assert_rejected, assert_stale_snapshot,
        assert_violation,
    };
    use aidoc_test_utils::fixtures::{pipeline_candidate, test_validator};
    use aidoc_test_utils::FixedClock;
    use chrono::Duration;
    use serde_json::Value;
    use std::sync::Arc;

    fn repo() -> (DocumentRepository<MockStorage>, Arc<FixedClock>) {
        let (validator, clock) = test_validator();
        (DocumentRepository::new(MockStorage::new(), validator), clock)
    }

    #[test]
    fn test_create_assigns_id() {
        let (repo, _) = repo();
        let validated = assert_accepted(repo.create(&pipeline_candidate()));
        assert_eq!(validated.record.id, Some(1));
        assert_eq!(repo.get(&validated.record.uuid).unwrap(), Some(validated.record));
    }

    #[test]
    fn test_rejected_create_is_not_persisted() {
        let (repo, _) = repo();
        let mut c = pipeline_candidate();
        c.insert("qualityScore".into(), Value::from(101));
        let report = assert_rejected(repo.create(&c));
        assert_violation(&report, "qualityScore", ViolationKind::OutOfRange);
        assert_eq!(repo.store().document_count().unwrap(), 0);
    }

    #[test]
    fn test_update_unknown_uuid() {
        let (repo, _) = repo();
        assert_not_found(&repo.update("missing", &FieldMap::new()));
    }

    #[test]
    fn test_update_against_stale_store_state() {
        let (repo, clock) = repo();
        let doc = assert_accepted(repo.create(&pipeline_candidate())).record;

        // another writer moves the stored record forward
        clock.advance(Duration::seconds(5));
        let mut moved = doc.clone();
        moved.updated_at = doc.updated_at + Duration::seconds(5);
        repo.store().document_replace(moved, doc.updated_at).unwrap();

        // a write computed from the old snapshot must not land
        let mut change = FieldMap::new();
        change.insert("riskLevel".into(), Value::from("High"));
        let validated = repo.validator().validate_update(&doc, &change).unwrap();
        let result = repo
            .store()
            .document_replace(validated.record, doc.updated_at);
        assert_stale_snapshot(&result);
    }

    #[test]
    fn test_second_writer_loses_on_stalled_clock() {
        let (repo, _clock) = repo();
        let doc = assert_accepted(repo.create(&pipeline_candidate())).record;

        // clock never advances between the two writers
        let mut first = FieldMap::new();
        first.insert("riskLevel".into(), Value::from("High"));
        let mut second = FieldMap::new();
        second.insert("riskLevel".into(), Value::from("Low"));
        let a = repo.validator().validate_update(&doc, &first).unwrap();
        let b = repo.validator().validate_update(&doc, &second).unwrap();
        assert!(a.record.updated_at > doc.updated_at);

        repo.store()
            .document_replace(a.record.clone(), doc.updated_at)
            .unwrap();
        let late = repo.store().document_replace(b.record, doc.updated_at);
        assert_stale_snapshot(&late);
        assert_eq!(repo.get(&doc.uuid).unwrap(), Some(a.record));
    }

    #[test]
    fn test_full_deletion_flow() {
        let (repo, clock) = repo();
        let doc = assert_accepted(repo.create(&pipeline_candidate())).record;

        let due = clock_now(&clock) + Duration::days(30);
        assert_accepted(repo.schedule_deletion(&doc.uuid, "ops", Some(due), "retention"));
        assert!(repo.due_for_deletion(clock_now(&clock)).unwrap().is_empty());

        clock.advance(Duration::days(31));
        assert_eq!(repo.due_for_deletion(clock_now(&clock)).unwrap().len(), 1);

        let deleted = assert_accepted(repo.redact(&doc.uuid, "ops", "erasure request")).record;
        assert_eq!(deleted.document_status, DocumentStatus::Deleted);
        assert!(deleted.chunk_text.is_none());
        assert_eq!(repo.get(&doc.uuid).unwrap(), Some(deleted.clone()));

        // idempotent redaction is a no-op, anything else is refused
        let again = assert_accepted(repo.redact(&doc.uuid, "ops", "erasure request")).record;
        assert_eq!(again, deleted);
        let mut change = FieldMap::new();
        change.insert("chunkText".into(), Value::from("restored"));
        let report = assert_rejected(repo.update(&doc.uuid, &change));
        assert_violation(&report, "documentStatus", ViolationKind::RecordIsDeleted);
    }

    #[test]
    fn test_insert_batch_is_independent() {
        let (repo, _) = repo();
        let mut bad = pipeline_candidate();
        bad.insert("riskLevel".into(), Value::from("Severe"));
        let results = repo.insert_batch(&[pipeline_candidate(), bad, pipeline_candidate()]);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert_eq!(repo.store().document_count().unwrap(), 2);
    }

    fn clock_now(clock: &FixedClock) -> Timestamp {
        aidoc_guard::Clock::now(clock)
    }
}
