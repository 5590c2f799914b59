//! AIDOC Test Utilities
//!
//! Centralized test infrastructure for the AIDOC workspace:
//! - Proptest generators for candidates, enum values and scores
//! - Test fixtures for validators on a controllable clock
//! - Custom assertions for validation reports and storage errors

// Re-export core types for convenience
pub use aidoc_core::{
    AccessLevel, AiDocument, AidocConfig, AidocError, AidocResult, DeletionStatus,
    DocumentStatus, FieldMap, FieldSpec, LegalBasisPolicy, RiskLevel, SchemaRegistry, Severity,
    StorageError, Timestamp, ValidationReport, Violation, ViolationKind,
};
pub use aidoc_guard::{FixedClock, SequentialIds, Validated, Validator};

use chrono::{TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating AI document candidates.

    use super::*;
    use proptest::prelude::*;

    /// Generate a Timestamp within 2020-2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    /// Generate a non-blank user name.
    pub fn arb_user() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_-]{0,15}"
    }

    /// Generate non-blank chunk text.
    pub fn arb_chunk_text() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 .,]{0,200}"
    }

    /// Generate a score within [0, 100].
    pub fn arb_score() -> impl Strategy<Value = f64> {
        prop_oneof![Just(0.0), Just(100.0), 0.0f64..=100.0]
    }

    /// Generate a score outside [0, 100].
    pub fn arb_out_of_range_score() -> impl Strategy<Value = f64> {
        prop_oneof![-1.0e6f64..-0.001, 100.001f64..1.0e6]
    }

    /// Generate an embedding vector of the given length.
    pub fn arb_vector(dimensions: usize) -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(-1.0f32..1.0, dimensions)
    }

    /// Pick one enumerated field from the standard registry.
    pub fn arb_enum_field() -> impl Strategy<Value = &'static FieldSpec> {
        let fields: Vec<&'static FieldSpec> = SchemaRegistry::standard()
            .all_fields()
            .iter()
            .filter(|f| f.allowed_values().is_some())
            .collect();
        prop::sample::select(fields)
    }

    /// Generate an enumerated field together with one of its allowed values.
    pub fn arb_enum_assignment() -> impl Strategy<Value = (&'static str, &'static str)> {
        arb_enum_field().prop_flat_map(|spec| {
            let allowed = spec.allowed_values().unwrap_or(&[]).to_vec();
            (Just(spec.name), prop::sample::select(allowed))
        })
    }

    /// Generate a DeletionStatus variant.
    pub fn arb_deletion_status() -> impl Strategy<Value = DeletionStatus> {
        prop::sample::select(DeletionStatus::ALL.to_vec())
    }

    /// Generate a DocumentStatus variant.
    pub fn arb_document_status() -> impl Strategy<Value = DocumentStatus> {
        prop::sample::select(DocumentStatus::ALL.to_vec())
    }

    /// Generate a RiskLevel variant.
    pub fn arb_risk_level() -> impl Strategy<Value = RiskLevel> {
        prop::sample::select(RiskLevel::ALL.to_vec())
    }

    /// Generate a valid insert candidate with a random mix of optional fields.
    pub fn arb_pipeline_candidate() -> impl Strategy<Value = FieldMap> {
        (
            arb_user(),
            arb_chunk_text(),
            proptest::option::of(1i32..100_000),
            proptest::option::of(arb_score()),
            proptest::option::of(arb_risk_level()),
        )
            .prop_map(|(user, text, chunk, score, risk)| {
                let mut c = FieldMap::new();
                c.insert("insertedBy".into(), Value::from(user.clone()));
                c.insert("updatedBy".into(), Value::from(user));
                c.insert("chunkText".into(), Value::from(text));
                if let Some(n) = chunk {
                    c.insert("chunkNumber".into(), Value::from(n));
                }
                if let Some(s) = score {
                    c.insert("qualityScore".into(), Value::from(s));
                }
                if let Some(r) = risk {
                    c.insert("riskLevel".into(), Value::from(r.as_db_str()));
                }
                c
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common testing scenarios.

    use super::*;

    /// Fixed instant all fixtures start from: 2025-01-01T00:00:00Z.
    pub fn test_time() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    pub fn fixed_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(test_time()))
    }

    /// Default configuration with the vector dimension check disabled.
    pub fn minimal_config() -> AidocConfig {
        AidocConfig {
            vector_dimensions: 0,
            ..AidocConfig::default()
        }
    }

    /// Validator on a fixed clock and sequential ids.
    pub fn test_validator() -> (Validator, Arc<FixedClock>) {
        test_validator_with(minimal_config())
    }

    pub fn test_validator_with(config: AidocConfig) -> (Validator, Arc<FixedClock>) {
        let clock = fixed_clock();
        let validator = Validator::new(config, clock.clone(), Arc::new(SequentialIds::new()))
            .unwrap_or_else(|e| panic!("test config rejected: {e}"));
        (validator, clock)
    }

    /// Build a candidate from a JSON object literal.
    pub fn candidate(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            other => panic!("candidate must be a JSON object, got {other}"),
        }
    }

    /// The canonical ingestion insert: one non-PII chunk.
    pub fn pipeline_candidate() -> FieldMap {
        candidate(serde_json::json!({
            "insertedBy": "pipeline",
            "updatedBy": "pipeline",
            "chunkText": "hello",
            "containsPII": false
        }))
    }

    /// A PII-bearing chunk with a recorded legal basis.
    pub fn pii_candidate() -> FieldMap {
        candidate(serde_json::json!({
            "insertedBy": "pipeline",
            "updatedBy": "pipeline",
            "chunkText": "Contact jane@example.com",
            "containsPII": true,
            "piiTypes": ["email"],
            "piiDetectionMethod": "automated",
            "legalBasis": "Consent",
            "retentionDays": 365
        }))
    }

    /// Insert the pipeline candidate and return the accepted record.
    pub fn inserted_document(validator: &Validator) -> AiDocument {
        match validator.validate_insert(&pipeline_candidate()) {
            Ok(validated) => validated.record,
            Err(e) => panic!("pipeline candidate rejected: {e}"),
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertions for validation outcomes.

    use super::*;

    /// Assert that validation accepted the candidate and return the result.
    #[track_caller]
    pub fn assert_accepted(result: AidocResult<Validated>) -> Validated {
        match result {
            Ok(validated) => validated,
            Err(e) => panic!("Expected acceptance, got: {e}"),
        }
    }

    /// Assert that validation rejected the candidate and return the report.
    #[track_caller]
    pub fn assert_rejected<T: std::fmt::Debug>(result: AidocResult<T>) -> ValidationReport {
        match result {
            Err(AidocError::Rejected(report)) => report,
            other => panic!("Expected Rejected, got: {:?}", other),
        }
    }

    /// Assert that the report carries a violation of `kind` on `field`.
    #[track_caller]
    pub fn assert_violation(report: &ValidationReport, field: &str, kind: ViolationKind) {
        assert!(
            report.contains(field, kind),
            "Expected {kind} on {field}, got: {report}"
        );
    }

    /// Assert that no violation of `kind` was reported on any field.
    #[track_caller]
    pub fn assert_no_violation(report: &ValidationReport, kind: ViolationKind) {
        assert!(
            report.of_kind(kind).is_empty(),
            "Unexpected {kind} in: {report}"
        );
    }

    /// Assert that the result is a StaleSnapshot storage error.
    #[track_caller]
    pub fn assert_stale_snapshot<T: std::fmt::Debug>(result: &AidocResult<T>) {
        match result {
            Err(AidocError::Storage(StorageError::StaleSnapshot { .. })) => {}
            other => panic!("Expected StaleSnapshot, got: {:?}", other),
        }
    }

    /// Assert that the result is a NotFound storage error.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &AidocResult<T>) {
        match result {
            Err(AidocError::Storage(StorageError::NotFound { .. })) => {}
            other => panic!("Expected NotFound, got: {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::assertions::*;
    use super::fixtures::*;
    use super::generators::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pipeline_fixture_is_accepted() {
        let (validator, _) = test_validator();
        let validated = assert_accepted(validator.validate_insert(&pipeline_candidate()));
        assert_eq!(validated.record.inserted_at, test_time());
    }

    #[test]
    fn test_pii_fixture_has_no_warnings() {
        let (validator, _) = test_validator();
        let validated = assert_accepted(validator.validate_insert(&pii_candidate()));
        assert!(validated.warnings.is_empty());
        assert!(validated.record.contains_pii);
    }

    #[test]
    fn test_assert_violation_on_rejection() {
        let (validator, _) = test_validator();
        let mut c = pipeline_candidate();
        c.insert("riskLevel".into(), Value::from("Severe"));
        let report = assert_rejected(validator.validate_insert(&c));
        assert_violation(&report, "riskLevel", ViolationKind::InvalidEnumValue);
        assert_no_violation(&report, ViolationKind::OutOfRange);
    }

    proptest! {
        #[test]
        fn prop_generated_candidates_are_accepted(c in arb_pipeline_candidate()) {
            let (validator, _) = test_validator();
            prop_assert!(validator.validate_insert(&c).is_ok());
        }

        #[test]
        fn prop_allowed_enum_values_are_accepted((field, value) in arb_enum_assignment()) {
            // deletion states outside the insert transitions are covered elsewhere
            prop_assume!(field != "deletionStatus" && field != "documentStatus");
            let (validator, _) = test_validator();
            let mut c = pipeline_candidate();
            c.insert(field.to_string(), Value::from(value));
            prop_assert!(validator.validate_insert(&c).is_ok());
        }

        #[test]
        fn prop_out_of_range_scores_rejected(score in arb_out_of_range_score()) {
            let (validator, _) = test_validator();
            let mut c = pipeline_candidate();
            c.insert("contentSafetyScore".into(), Value::from(score));
            let report = assert_rejected(validator.validate_insert(&c));
            prop_assert!(report.contains("contentSafetyScore", ViolationKind::OutOfRange));
        }
    }
}
