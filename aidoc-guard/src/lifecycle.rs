//! Lifecycle Manager
//!
//! Governs the `deletionStatus` state machine, the redaction that must
//! accompany entering `Deleted`, and the `insertedAt`/`updatedAt` stamping
//! discipline. Works on contract-named field maps so it can run before the
//! candidate has been turned into a typed record.

use aidoc_core::{
    AiDocument, DeletionStatus, DocumentStatus, FieldMap, SchemaRegistry, Timestamp, Violation,
    ViolationKind,
};
use chrono::{Duration, SecondsFormat};
use serde_json::Value;

/// Render a timestamp the way records carry it on the wire.
pub fn timestamp_value(ts: Timestamp) -> Value {
    Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

/// Parse a wire timestamp. `None` for non-strings and malformed values.
pub fn parse_timestamp(value: &Value) -> Option<Timestamp> {
    value.as_str().and_then(|s| s.parse::<Timestamp>().ok())
}

fn deletion_status_of(map: &FieldMap) -> Option<DeletionStatus> {
    map.get("deletionStatus")
        .and_then(Value::as_str)
        .and_then(|s| DeletionStatus::from_db_str(s).ok())
}

fn document_status_of(map: &FieldMap) -> Option<DocumentStatus> {
    map.get("documentStatus")
        .and_then(Value::as_str)
        .and_then(|s| DocumentStatus::from_db_str(s).ok())
}

/// Enforces the deletion workflow and timestamp discipline.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleManager {
    registry: &'static SchemaRegistry,
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new(SchemaRegistry::standard())
    }
}

impl LifecycleManager {
    pub fn new(registry: &'static SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Check caller-supplied `insertedAt`/`updatedAt` against the previous
    /// snapshot and against each other. Malformed values are left to the
    /// type check.
    pub fn check_timestamps(
        &self,
        previous: Option<&AiDocument>,
        candidate: &FieldMap,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        let inserted = candidate.get("insertedAt").and_then(parse_timestamp);
        let updated = candidate.get("updatedAt").and_then(parse_timestamp);

        if let Some(prev) = previous {
            if let Some(at) = inserted.filter(|at| *at < prev.inserted_at) {
                violations.push(Violation::error(
                    "insertedAt",
                    ViolationKind::NonMonotonicTimestamp,
                    format!("insertedAt {at} is earlier than existing {}", prev.inserted_at),
                ));
            }
            if let Some(at) = updated.filter(|at| *at < prev.updated_at) {
                violations.push(Violation::error(
                    "updatedAt",
                    ViolationKind::NonMonotonicTimestamp,
                    format!("updatedAt {at} is earlier than existing {}", prev.updated_at),
                ));
            }
        }

        let effective_inserted = inserted.or(previous.map(|p| p.inserted_at));
        if let (Some(ins), Some(upd)) = (effective_inserted, updated) {
            if upd < ins {
                violations.push(Violation::error(
                    "updatedAt",
                    ViolationKind::NonMonotonicTimestamp,
                    format!("updatedAt {upd} is earlier than insertedAt {ins}"),
                ));
            }
        }
        violations
    }

    /// Stamp audit timestamps on a merged record. Insert sets both to `now`;
    /// update keeps `insertedAt` and moves `updatedAt` strictly forward, so
    /// it stays usable as a compare-and-swap token when the clock stalls.
    pub fn stamp(&self, previous: Option<&AiDocument>, merged: &mut FieldMap, now: Timestamp) {
        let (inserted_at, updated_at) = match previous {
            None => (now, now),
            Some(prev) => (
                prev.inserted_at,
                now.max(prev.updated_at + Duration::microseconds(1)),
            ),
        };
        merged.insert("insertedAt".to_string(), timestamp_value(inserted_at));
        merged.insert("updatedAt".to_string(), timestamp_value(updated_at));
    }

    /// Check the `deletionStatus` move from `previous` (or `Pending` on
    /// insert) to the merged candidate, and the redaction that entering
    /// `Deleted` requires.
    pub fn check_transition(
        &self,
        previous: Option<&AiDocument>,
        merged: &FieldMap,
        now: Timestamp,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        let from = previous
            .map(AiDocument::deletion_status_or_pending)
            .unwrap_or(DeletionStatus::Pending);
        let to = match merged.get("deletionStatus") {
            None | Some(Value::Null) => DeletionStatus::Pending,
            Some(_) => match deletion_status_of(merged) {
                Some(status) => status,
                // invalid value, already reported
                None => return violations,
            },
        };

        if !from.can_transition_to(to) {
            violations.push(Violation::error(
                "deletionStatus",
                ViolationKind::InvalidTransition,
                format!("deletionStatus cannot move from {from} to {to}"),
            ));
        }

        let doc_deleted = document_status_of(merged) == Some(DocumentStatus::Deleted);
        let was_deleted = previous.is_some_and(AiDocument::is_deleted);
        let entering_deletion = to == DeletionStatus::Deleted && from != DeletionStatus::Deleted;
        let entering_retirement = doc_deleted && !was_deleted;

        if !(entering_deletion || entering_retirement) {
            return violations;
        }

        if to == DeletionStatus::Deleted {
            let scheduled = merged.get("deletionScheduledAt").and_then(parse_timestamp);
            if let Some(at) = scheduled.filter(|at| *at > now) {
                violations.push(Violation::error(
                    "deletionScheduledAt",
                    ViolationKind::PrematureDeletion,
                    format!("deletion is scheduled for {at}, which has not passed"),
                ));
            }
        } else {
            violations.push(Violation::error(
                "deletionStatus",
                ViolationKind::IncompleteRedaction,
                "documentStatus Deleted requires deletionStatus Deleted in the same operation",
            ));
        }

        if !doc_deleted {
            violations.push(Violation::error(
                "documentStatus",
                ViolationKind::IncompleteRedaction,
                "deletionStatus Deleted requires documentStatus Deleted in the same operation",
            ));
        }

        for spec in self.registry.redacted_fields() {
            if merged.get(spec.name).is_some_and(|v| !v.is_null()) {
                violations.push(Violation::error(
                    spec.name,
                    ViolationKind::IncompleteRedaction,
                    format!("{} must be nulled when the record is deleted", spec.name),
                ));
            }
        }
        violations
    }

    /// Whether a candidate against a deleted record only re-asserts the
    /// redaction: deleted statuses, nulled redacted fields, and optionally
    /// `updatedBy` and `lastModifiedReason`.
    pub fn is_idempotent_redaction(&self, candidate: &FieldMap) -> bool {
        let asserts_status =
            candidate.contains_key("documentStatus") || candidate.contains_key("deletionStatus");
        asserts_status
            && candidate.iter().all(|(name, value)| match name.as_str() {
                "documentStatus" | "deletionStatus" => value.as_str() == Some("Deleted"),
                "updatedBy" => value.as_str().is_some_and(|s| !s.trim().is_empty()),
                "lastModifiedReason" => value.is_null() || value.is_string(),
                other => {
                    value.is_null()
                        && self
                            .registry
                            .describe(other)
                            .is_ok_and(|spec| spec.redact_on_delete)
                }
            })
    }

    /// Candidate moving a record to `Scheduled`.
    pub fn schedule_deletion_candidate(
        &self,
        updated_by: &str,
        scheduled_at: Option<Timestamp>,
        reason: &str,
    ) -> FieldMap {
        let mut candidate = FieldMap::new();
        candidate.insert(
            "deletionStatus".to_string(),
            Value::from(DeletionStatus::Scheduled.as_db_str()),
        );
        candidate.insert(
            "deletionScheduledAt".to_string(),
            scheduled_at.map(timestamp_value).unwrap_or(Value::Null),
        );
        candidate.insert("updatedBy".to_string(), Value::from(updated_by));
        candidate.insert("lastModifiedReason".to_string(), Value::from(reason));
        candidate
    }

    /// Candidate retiring a record: both statuses to `Deleted` and every
    /// redacted field nulled.
    pub fn redaction_candidate(&self, updated_by: &str, reason: &str) -> FieldMap {
        let mut candidate = FieldMap::new();
        candidate.insert(
            "deletionStatus".to_string(),
            Value::from(DeletionStatus::Deleted.as_db_str()),
        );
        candidate.insert(
            "documentStatus".to_string(),
            Value::from(DocumentStatus::Deleted.as_db_str()),
        );
        for spec in self.registry.redacted_fields() {
            candidate.insert(spec.name.to_string(), Value::Null);
        }
        candidate.insert("updatedBy".to_string(), Value::from(updated_by));
        candidate.insert("lastModifiedReason".to_string(), Value::from(reason));
        candidate
    }
}
