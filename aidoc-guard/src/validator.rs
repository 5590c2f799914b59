//! Validator
//!
//! Turns a candidate field map into a validated, defaulted [`AiDocument`] or
//! a [`ValidationReport`] listing every violation found. Nothing is mutated
//! on failure; the caller's previous snapshot is only read.

use crate::clock::{Clock, IdGenerator, SystemClock, UuidV7Generator};
use crate::lifecycle::{parse_timestamp, timestamp_value, LifecycleManager};
use aidoc_core::{
    AidocConfig, AidocError, AidocResult, AiDocument, FieldDefault, FieldMap, FieldSpec,
    FieldType, LegalBasisPolicy, SchemaRegistry, Timestamp, ValidationReport, Violation,
    ViolationKind,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Whether the candidate is a fresh record or a change to an existing one.
#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    Insert,
    Update { previous: &'a AiDocument },
}

/// An accepted record plus the advisory violations it was accepted with.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub record: AiDocument,
    pub warnings: Vec<Violation>,
}

/// Checks candidates against the field schema registry, cross-field rules
/// and the lifecycle state machines.
#[derive(Clone)]
pub struct Validator {
    registry: &'static SchemaRegistry,
    lifecycle: LifecycleManager,
    config: AidocConfig,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("fields", &self.registry.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Create a validator with injected clock and id source.
    pub fn new(
        config: AidocConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> AidocResult<Self> {
        config.validate()?;
        let registry = SchemaRegistry::standard();
        Ok(Self {
            registry,
            lifecycle: LifecycleManager::new(registry),
            config,
            clock,
            ids,
        })
    }

    /// Validator on the wall clock and UUIDv7 ids.
    pub fn with_system_sources(config: AidocConfig) -> AidocResult<Self> {
        Self::new(config, Arc::new(SystemClock), Arc::new(UuidV7Generator))
    }

    pub fn config(&self) -> &AidocConfig {
        &self.config
    }

    pub fn registry(&self) -> &'static SchemaRegistry {
        self.registry
    }

    pub fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    pub fn validate_insert(&self, candidate: &FieldMap) -> AidocResult<Validated> {
        self.validate(candidate, Mode::Insert)
    }

    pub fn validate_update(
        &self,
        previous: &AiDocument,
        candidate: &FieldMap,
    ) -> AidocResult<Validated> {
        self.validate(candidate, Mode::Update { previous })
    }

    /// Validate a candidate. Blocking violations come back as
    /// [`AidocError::Rejected`] carrying the full ordered report.
    pub fn validate(&self, candidate: &FieldMap, mode: Mode<'_>) -> AidocResult<Validated> {
        let previous = match mode {
            Mode::Insert => None,
            Mode::Update { previous } => Some(previous),
        };
        let now = self.clock.now();

        if let Some(prev) = previous.filter(|p| p.is_deleted()) {
            if self.lifecycle.is_idempotent_redaction(candidate) {
                debug!(uuid = %prev.uuid, "redaction re-applied to deleted record");
                return Ok(Validated {
                    record: prev.clone(),
                    warnings: Vec::new(),
                });
            }
            let mut report = ValidationReport::valid();
            report.add(Violation::error(
                "documentStatus",
                ViolationKind::RecordIsDeleted,
                format!("record {} is deleted and cannot be modified", prev.uuid),
            ));
            return Err(self.reject(report));
        }

        let mut report = ValidationReport::valid();
        for (name, value) in candidate {
            self.check_supplied(name, value, &mut report);
        }

        let mut merged = match previous {
            None => self.merge_insert(candidate, now, &mut report),
            Some(prev) => self.merge_update(prev, candidate, &mut report)?,
        };

        report.extend(self.lifecycle.check_timestamps(previous, candidate));
        self.lifecycle.stamp(previous, &mut merged, now);
        self.check_cross_field(&merged, &mut report);
        report.extend(self.lifecycle.check_transition(previous, &merged, now));

        if report.has_errors() {
            return Err(self.reject(report));
        }

        let record = AiDocument::from_field_map(merged)?;
        for w in &report.violations {
            warn!(uuid = %record.uuid, field = %w.field, kind = %w.kind, "{}", w.message);
        }
        Ok(Validated {
            record,
            warnings: report.violations,
        })
    }

    fn reject(&self, report: ValidationReport) -> AidocError {
        for v in &report.violations {
            debug!(field = %v.field, kind = %v.kind, severity = ?v.severity, "{}", v.message);
        }
        AidocError::Rejected(report)
    }

    // ------------------------------------------------------------------------
    // Per-field checks
    // ------------------------------------------------------------------------

    fn check_supplied(&self, name: &str, value: &Value, report: &mut ValidationReport) {
        let spec = match self.registry.describe(name) {
            Ok(spec) => spec,
            Err(e) => {
                report.add(Violation::error(name, ViolationKind::UnknownField, e.to_string()));
                return;
            }
        };
        if value.is_null() {
            if spec.required {
                report.add(Violation::error(
                    name,
                    ViolationKind::MissingRequiredField,
                    format!("{name} is required and cannot be null"),
                ));
            }
            return;
        }
        if let Some(violation) = self.check_value(spec, value) {
            report.add(violation);
        }
    }

    /// Type, membership, range and dimension check for one non-null value.
    fn check_value(&self, spec: &FieldSpec, value: &Value) -> Option<Violation> {
        let name = spec.name;
        match spec.field_type {
            FieldType::Integer => match (value.as_i64(), value.as_u64()) {
                (Some(n), _) => self.check_range(spec, n as f64),
                (None, Some(n)) => self.check_range(spec, n as f64),
                _ => Some(type_mismatch(spec, value)),
            },
            FieldType::Float => match value.as_f64() {
                Some(x) => self.check_range(spec, x),
                None => Some(type_mismatch(spec, value)),
            },
            FieldType::Text => match value.as_str() {
                Some(s) if spec.required && s.trim().is_empty() => Some(Violation::error(
                    name,
                    ViolationKind::MissingRequiredField,
                    format!("{name} must not be blank"),
                )),
                Some(_) => None,
                None => Some(type_mismatch(spec, value)),
            },
            FieldType::Boolean => (!value.is_boolean()).then(|| type_mismatch(spec, value)),
            FieldType::Timestamp => parse_timestamp(value)
                .is_none()
                .then(|| type_mismatch(spec, value)),
            FieldType::TextSet => match value.as_array() {
                Some(items) if items.iter().all(Value::is_string) => None,
                _ => Some(type_mismatch(spec, value)),
            },
            FieldType::Vector => self.check_vector(spec, value),
            FieldType::Json => None,
            FieldType::Enum(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => None,
                Some(s) => Some(Violation::error(
                    name,
                    ViolationKind::InvalidEnumValue,
                    format!("'{s}' is not a valid {name}; allowed: {}", allowed.join(", ")),
                )),
                None => Some(type_mismatch(spec, value)),
            },
        }
    }

    fn check_range(&self, spec: &FieldSpec, value: f64) -> Option<Violation> {
        let mut range = spec.range?;
        if spec.name == "id" {
            range.max = range.max.min(self.config.max_row_id as f64);
        }
        (!range.contains(value)).then(|| {
            Violation::error(
                spec.name,
                ViolationKind::OutOfRange,
                format!(
                    "{} = {value} is outside [{}, {}]",
                    spec.name, range.min, range.max
                ),
            )
        })
    }

    fn check_vector(&self, spec: &FieldSpec, value: &Value) -> Option<Violation> {
        let components = match value.as_array() {
            Some(items) if !items.is_empty() => items,
            _ => return Some(type_mismatch(spec, value)),
        };
        let all_finite = components
            .iter()
            .all(|c| c.as_f64().is_some_and(|x| (x as f32).is_finite()));
        if !all_finite {
            return Some(type_mismatch(spec, value));
        }
        let expected = self.config.vector_dimensions;
        if self.config.checks_vector_dimensions() && components.len() != expected {
            return Some(Violation::error(
                spec.name,
                ViolationKind::VectorDimensionMismatch,
                format!(
                    "{} has {} dimensions, expected {expected}",
                    spec.name,
                    components.len()
                ),
            ));
        }
        None
    }

    // ------------------------------------------------------------------------
    // Merging
    // ------------------------------------------------------------------------

    fn merge_insert(
        &self,
        candidate: &FieldMap,
        now: Timestamp,
        report: &mut ValidationReport,
    ) -> FieldMap {
        let mut merged = FieldMap::new();
        for spec in self.registry.all_fields() {
            if let Some(value) = candidate.get(spec.name) {
                merged.insert(spec.name.to_string(), value.clone());
                continue;
            }
            if !spec.required {
                continue;
            }
            match spec.default {
                Some(default) => {
                    merged.insert(spec.name.to_string(), self.default_value(default, now));
                }
                None => report.add(Violation::error(
                    spec.name,
                    ViolationKind::MissingRequiredField,
                    format!("{} is required", spec.name),
                )),
            }
        }
        merged
    }

    fn merge_update(
        &self,
        previous: &AiDocument,
        candidate: &FieldMap,
        report: &mut ValidationReport,
    ) -> AidocResult<FieldMap> {
        let mut merged = previous.to_field_map()?;
        for spec in self.registry.all_fields() {
            let Some(value) = candidate.get(spec.name) else {
                continue;
            };
            let existing = merged.get(spec.name).unwrap_or(&Value::Null);
            if spec.immutable && existing != value {
                report.add(Violation::error(
                    spec.name,
                    ViolationKind::ImmutableFieldChanged,
                    format!("{} cannot change from {existing} to {value}", spec.name),
                ));
            }
            merged.insert(spec.name.to_string(), value.clone());
        }
        Ok(merged)
    }

    fn default_value(&self, default: FieldDefault, now: Timestamp) -> Value {
        match default {
            FieldDefault::Text(s) => Value::from(s),
            FieldDefault::Bool(b) => Value::Bool(b),
            FieldDefault::SchemaVersion => Value::from(self.config.schema_version.as_str()),
            FieldDefault::GeneratedUuid => Value::from(self.ids.next_uuid()),
            FieldDefault::CurrentTime => timestamp_value(now),
        }
    }

    // ------------------------------------------------------------------------
    // Cross-field rules
    // ------------------------------------------------------------------------

    fn check_cross_field(&self, merged: &FieldMap, report: &mut ValidationReport) {
        let contains_pii = merged.get("containsPII") == Some(&Value::Bool(true));
        let has_legal_basis = merged.get("legalBasis").is_some_and(|v| !v.is_null());
        if contains_pii && !has_legal_basis {
            let message = "containsPII is true but no legalBasis is recorded";
            report.add(match self.config.legal_basis_policy {
                LegalBasisPolicy::Advisory => {
                    Violation::warning("legalBasis", ViolationKind::MissingLegalBasis, message)
                }
                LegalBasisPolicy::Blocking => {
                    Violation::error("legalBasis", ViolationKind::MissingLegalBasis, message)
                }
            });
        }

        let has_chunk_number = merged.get("chunkNumber").is_some_and(|v| !v.is_null());
        let blank_chunk = merged
            .get("chunkText")
            .and_then(Value::as_str)
            .is_some_and(|s| s.trim().is_empty());
        if has_chunk_number && blank_chunk {
            report.add(Violation::error(
                "chunkText",
                ViolationKind::EmptyChunkWithNumber,
                "chunkNumber is set but chunkText is empty",
            ));
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(spec: &FieldSpec, value: &Value) -> Violation {
    Violation::error(
        spec.name,
        ViolationKind::TypeMismatch,
        format!(
            "{} expects {}, got {}",
            spec.name,
            spec.field_type,
            json_kind(value)
        ),
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, SequentialIds};
    use aidoc_core::{AccessLevel, DocumentStatus, Severity};
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn validator_with(config: AidocConfig) -> (Validator, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(t0()));
        let validator =
            Validator::new(config, clock.clone(), Arc::new(SequentialIds::new())).unwrap();
        (validator, clock)
    }

    fn validator() -> (Validator, Arc<FixedClock>) {
        validator_with(AidocConfig {
            vector_dimensions: 3,
            ..AidocConfig::default()
        })
    }

    fn candidate(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("candidate must be an object"),
        }
    }

    fn pipeline() -> FieldMap {
        candidate(json!({
            "insertedBy": "pipeline",
            "updatedBy": "pipeline",
            "chunkText": "hello",
            "containsPII": false
        }))
    }

    fn rejected(result: AidocResult<Validated>) -> ValidationReport {
        match result {
            Err(AidocError::Rejected(report)) => report,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_insert_applies_defaults() {
        let (v, _) = validator();
        let out = v.validate_insert(&pipeline()).unwrap();
        let doc = out.record;
        assert_eq!(doc.document_status, DocumentStatus::Active);
        assert_eq!(doc.access_level, AccessLevel::Internal);
        assert_eq!(doc.uuid, "00000000-0000-0000-0000-000000000001");
        assert_eq!(doc.schema_version, "1.0.0-tier1");
        assert_eq!(doc.inserted_at, t0());
        assert_eq!(doc.updated_at, t0());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_insert_keeps_supplied_uuid() {
        let (v, _) = validator();
        let mut c = pipeline();
        c.insert("uuid".into(), json!("caller-chosen"));
        let doc = v.validate_insert(&c).unwrap().record;
        assert_eq!(doc.uuid, "caller-chosen");
    }

    #[test]
    fn test_missing_required_fields_collected() {
        let (v, _) = validator();
        let report = rejected(v.validate_insert(&candidate(json!({"chunkText": "x"}))));
        assert!(report.contains("insertedBy", ViolationKind::MissingRequiredField));
        assert!(report.contains("updatedBy", ViolationKind::MissingRequiredField));
    }

    #[test]
    fn test_explicit_null_and_blank_required() {
        let (v, _) = validator();
        let mut c = pipeline();
        c.insert("accessLevel".into(), Value::Null);
        c.insert("updatedBy".into(), json!("   "));
        let report = rejected(v.validate_insert(&c));
        assert!(report.contains("accessLevel", ViolationKind::MissingRequiredField));
        assert!(report.contains("updatedBy", ViolationKind::MissingRequiredField));
    }

    #[test]
    fn test_unknown_field() {
        let (v, _) = validator();
        let mut c = pipeline();
        c.insert("colour".into(), json!("blue"));
        let report = rejected(v.validate_insert(&c));
        assert!(report.contains("colour", ViolationKind::UnknownField));
    }

    #[test]
    fn test_type_mismatches() {
        let (v, _) = validator();
        let mut c = pipeline();
        c.insert("chunkNumber".into(), json!("one"));
        c.insert("containsPII".into(), json!("yes"));
        c.insert("piiTypes".into(), json!(["email", 7]));
        c.insert("piiDetectionAt".into(), json!("last tuesday"));
        c.insert("embeddingVector01".into(), json!([]));
        let report = rejected(v.validate_insert(&c));
        for field in ["chunkNumber", "containsPII", "piiTypes", "piiDetectionAt", "embeddingVector01"] {
            assert!(report.contains(field, ViolationKind::TypeMismatch), "{field}");
        }
    }

    #[test]
    fn test_invalid_enum_names_value_and_set() {
        let (v, _) = validator();
        let mut c = pipeline();
        c.insert("riskLevel".into(), json!("Severe"));
        let report = rejected(v.validate_insert(&c));
        let found = report.of_kind(ViolationKind::InvalidEnumValue);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field, "riskLevel");
        assert!(found[0].message.contains("Severe"));
        assert!(found[0].message.contains("Unassessed"));
    }

    #[test]
    fn test_score_bounds() {
        let (v, _) = validator();
        for bad in [-1.0, 101.0] {
            let mut c = pipeline();
            c.insert("qualityScore".into(), json!(bad));
            let report = rejected(v.validate_insert(&c));
            assert!(report.contains("qualityScore", ViolationKind::OutOfRange));
        }
        for good in [0.0, 100.0] {
            let mut c = pipeline();
            c.insert("qualityScore".into(), json!(good));
            assert!(v.validate_insert(&c).is_ok());
        }
    }

    #[test]
    fn test_integer_bounds() {
        let (v, _) = validator();
        let mut c = pipeline();
        c.insert("chunkNumber".into(), json!(0));
        c.insert("retentionDays".into(), json!(i64::from(i32::MAX) + 1));
        c.insert("id".into(), json!(1_i64 << 48));
        let report = rejected(v.validate_insert(&c));
        assert!(report.contains("chunkNumber", ViolationKind::OutOfRange));
        assert!(report.contains("retentionDays", ViolationKind::OutOfRange));
        assert!(report.contains("id", ViolationKind::OutOfRange));
    }

    #[test]
    fn test_integer_beyond_i64_is_out_of_range() {
        let (v, _) = validator();
        let mut c = pipeline();
        c.insert("chunkNumber".into(), json!(u64::MAX));
        let report = rejected(v.validate_insert(&c));
        assert!(report.contains("chunkNumber", ViolationKind::OutOfRange));
        assert!(!report.contains("chunkNumber", ViolationKind::TypeMismatch));
    }

    #[test]
    fn test_configured_row_id_ceiling() {
        let (v, _) = validator_with(AidocConfig {
            vector_dimensions: 0,
            max_row_id: 100,
            ..AidocConfig::default()
        });
        let mut c = pipeline();
        c.insert("id".into(), json!(100));
        assert_eq!(v.validate_insert(&c).unwrap().record.id, Some(100));
        c.insert("id".into(), json!(101));
        let report = rejected(v.validate_insert(&c));
        assert!(report.contains("id", ViolationKind::OutOfRange));
    }

    #[test]
    fn test_vector_dimensions() {
        let (v, _) = validator();
        let mut c = pipeline();
        c.insert("embeddingVector02".into(), json!([0.1, 0.2]));
        let report = rejected(v.validate_insert(&c));
        assert!(report.contains("embeddingVector02", ViolationKind::VectorDimensionMismatch));

        let mut c = pipeline();
        c.insert("embeddingVector02".into(), json!([0.1, 0.2, 0.3]));
        let doc = v.validate_insert(&c).unwrap().record;
        assert_eq!(doc.embedding_vector02, Some(vec![0.1, 0.2, 0.3]));

        let (unchecked, _) = validator_with(AidocConfig {
            vector_dimensions: 0,
            ..AidocConfig::default()
        });
        let mut c = pipeline();
        c.insert("embeddingVector02".into(), json!([0.5]));
        assert!(unchecked.validate_insert(&c).is_ok());
    }

    #[test]
    fn test_empty_chunk_with_number() {
        let (v, _) = validator();
        let mut c = pipeline();
        c.insert("chunkNumber".into(), json!(2));
        c.insert("chunkText".into(), json!(""));
        let report = rejected(v.validate_insert(&c));
        assert!(report.contains("chunkText", ViolationKind::EmptyChunkWithNumber));

        // number without any text is fine
        let mut c = pipeline();
        c.remove("chunkText");
        c.insert("chunkNumber".into(), json!(2));
        assert!(v.validate_insert(&c).is_ok());
    }

    #[test]
    fn test_missing_legal_basis_policy() {
        let (v, _) = validator();
        let mut c = pipeline();
        c.insert("containsPII".into(), json!(true));
        let out = v.validate_insert(&c).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].kind, ViolationKind::MissingLegalBasis);
        assert_eq!(out.warnings[0].severity, Severity::Warning);

        let (strict, _) = validator_with(AidocConfig {
            legal_basis_policy: LegalBasisPolicy::Blocking,
            ..AidocConfig::default()
        });
        let report = rejected(strict.validate_insert(&c));
        assert!(report.contains("legalBasis", ViolationKind::MissingLegalBasis));

        c.insert("legalBasis".into(), json!("Consent"));
        assert!(strict.validate_insert(&c).unwrap().warnings.is_empty());
    }

    #[test]
    fn test_update_merges_and_stamps() {
        let (v, clock) = validator();
        let prev = v.validate_insert(&pipeline()).unwrap().record;
        clock.advance(Duration::minutes(5));

        let change = candidate(json!({"riskLevel": "High", "updatedBy": "reviewer"}));
        let doc = v.validate_update(&prev, &change).unwrap().record;
        assert_eq!(doc.chunk_text.as_deref(), Some("hello"));
        assert_eq!(doc.updated_by, "reviewer");
        assert_eq!(doc.inserted_at, prev.inserted_at);
        assert_eq!(doc.updated_at, t0() + Duration::minutes(5));
        assert_eq!(doc.uuid, prev.uuid);
    }

    #[test]
    fn test_update_rejects_immutable_change() {
        let (v, _) = validator();
        let prev = v.validate_insert(&pipeline()).unwrap().record;
        let change = candidate(json!({"uuid": "someone-else", "id": 42}));
        let report = rejected(v.validate_update(&prev, &change));
        assert!(report.contains("uuid", ViolationKind::ImmutableFieldChanged));
        assert!(report.contains("id", ViolationKind::ImmutableFieldChanged));

        let same = candidate(json!({"uuid": prev.uuid.clone()}));
        assert!(v.validate_update(&prev, &same).is_ok());
    }

    #[test]
    fn test_update_rejects_backdated_timestamp() {
        let (v, _) = validator();
        let prev = v.validate_insert(&pipeline()).unwrap().record;
        let change = candidate(json!({"updatedAt": "2020-01-01T00:00:00Z"}));
        let report = rejected(v.validate_update(&prev, &change));
        assert!(report.contains("updatedAt", ViolationKind::NonMonotonicTimestamp));
    }

    #[test]
    fn test_all_violations_reported_together() {
        let (v, _) = validator();
        let c = candidate(json!({
            "insertedBy": "pipeline",
            "riskLevel": "Severe",
            "qualityScore": 500,
            "bogus": 1
        }));
        let report = rejected(v.validate_insert(&c));
        assert!(report.violations.len() >= 4);
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
